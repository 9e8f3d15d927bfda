//! Screen geometry used by the motion controller
//!
//! Coordinates are integer pixels with the origin at the top-left corner of
//! the primary display. Intermediate motion points are interpolated in `f64`
//! and rounded back onto the pixel grid.
//!
//! # Example
//!
//! ```rust
//! use ki_autogui::input::geometry::{Point, Size};
//!
//! let start = Point::new(0, 0);
//! let end = Point::new(100, 50);
//! assert_eq!(start.lerp(&end, 0.5), Point::new(50, 25));
//!
//! let screen = Size::new(1920, 1080);
//! assert!(screen.contains(Point::new(1919, 1079)));
//! assert!(!screen.contains(Point::new(1920, 0)));
//! ```

use super::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};

/// A screen coordinate in pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: i32,
    /// Y coordinate
    pub y: i32,
}

impl Point {
    /// Creates a new point
    ///
    /// # Example
    ///
    /// ```rust
    /// use ki_autogui::input::geometry::Point;
    ///
    /// let p = Point::new(10, 20);
    /// assert_eq!(p.x, 10);
    /// assert_eq!(p.y, 20);
    /// ```
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Returns this point shifted by a relative offset
    pub fn offset(&self, dx: i32, dy: i32) -> Point {
        Point {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Interpolates between this point and another, rounding to the pixel grid
    ///
    /// `t` is not clamped: easing functions that overshoot produce points
    /// beyond either end of the segment.
    ///
    /// # Arguments
    ///
    /// * `other` - The other point
    /// * `t` - Interpolation factor (0.0 = this point, 1.0 = other point)
    pub fn lerp(&self, other: &Point, t: f64) -> Point {
        let x = self.x as f64 + (other.x as f64 - self.x as f64) * t;
        let y = self.y as f64 + (other.y as f64 - self.y as f64) * t;
        Point {
            x: x.round() as i32,
            y: y.round() as i32,
        }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Point::new(x, y)
    }
}

impl TryFrom<&[i32]> for Point {
    type Error = EngineError;

    fn try_from(coords: &[i32]) -> EngineResult<Self> {
        match coords {
            [x, y] => Ok(Point::new(*x, *y)),
            _ => Err(EngineError::invalid(format!(
                "a point needs exactly 2 coordinates, got {}",
                coords.len()
            ))),
        }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Dimensions of the primary display in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Width in pixels
    pub width: i32,
    /// Height in pixels
    pub height: i32,
}

impl Size {
    /// Creates a new size
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Returns true if the point lies on the display
    pub fn contains(&self, point: Point) -> bool {
        point.x >= 0 && point.y >= 0 && point.x < self.width && point.y < self.height
    }

    /// Clamps a point onto the display
    pub fn clamp(&self, point: Point) -> Point {
        Point {
            x: point.x.clamp(0, (self.width - 1).max(0)),
            y: point.y.clamp(0, (self.height - 1).max(0)),
        }
    }

    /// The four corner pixels, clockwise from the top-left
    pub fn corners(&self) -> [Point; 4] {
        let right = (self.width - 1).max(0);
        let bottom = (self.height - 1).max(0);
        [
            Point::new(0, 0),
            Point::new(right, 0),
            Point::new(right, bottom),
            Point::new(0, bottom),
        ]
    }

    /// The larger of the two dimensions
    pub fn longest_side(&self) -> i32 {
        self.width.max(self.height)
    }
}

impl std::fmt::Display for Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        let a = Point::new(10, 20);
        let b = Point::new(110, 220);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), Point::new(60, 120));
    }

    #[test]
    fn test_lerp_overshoot() {
        let a = Point::new(0, 0);
        let b = Point::new(100, 0);
        assert_eq!(a.lerp(&b, 1.1), Point::new(110, 0));
        assert_eq!(a.lerp(&b, -0.2), Point::new(-20, 0));
    }

    #[test]
    fn test_lerp_nan_does_not_panic() {
        let p = Point::new(5, 5).lerp(&Point::new(50, 50), f64::NAN);
        assert_eq!(p, Point::new(0, 0));
    }

    #[test]
    fn test_point_from_slice() {
        assert_eq!(Point::try_from(&[3, 4][..]), Ok(Point::new(3, 4)));
        assert!(matches!(
            Point::try_from(&[3][..]),
            Err(EngineError::InvalidArgument(_))
        ));
        assert!(Point::try_from(&[1, 2, 3][..]).is_err());
    }

    #[test]
    fn test_size_contains_and_clamp() {
        let size = Size::new(1920, 1080);
        assert!(size.contains(Point::new(0, 0)));
        assert!(!size.contains(Point::new(-1, 0)));
        assert!(!size.contains(Point::new(0, 1080)));
        assert_eq!(size.clamp(Point::new(-5, 2000)), Point::new(0, 1079));
    }

    #[test]
    fn test_corners() {
        let corners = Size::new(1920, 1080).corners();
        assert!(corners.contains(&Point::new(0, 0)));
        assert!(corners.contains(&Point::new(1919, 0)));
        assert!(corners.contains(&Point::new(1919, 1079)));
        assert!(corners.contains(&Point::new(0, 1079)));
    }
}
