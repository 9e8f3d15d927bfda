//! Fail-safe interlock
//!
//! A human kill switch for runaway automation: slam the mouse into a corner of
//! the screen and the next engine call fails with
//! [`EngineError::SafetyTripped`]. The interlock reads the real cursor from the
//! backend every time it is consulted; it never trusts a planned position.

use super::backend::PlatformBackend;
use super::geometry::{Point, Size};
use super::{EngineError, EngineResult};
use std::collections::HashSet;
use tracing::warn;

/// The set of trip points and the check against them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SafetyInterlock {
    zones: HashSet<Point>,
}

impl SafetyInterlock {
    /// Creates an interlock with an explicit zone set
    pub fn new<I: IntoIterator<Item = Point>>(zones: I) -> Self {
        Self {
            zones: zones.into_iter().collect(),
        }
    }

    /// Creates an interlock tripping on the four corners of `screen`
    pub fn for_screen(screen: Size) -> Self {
        Self::new(screen.corners())
    }

    /// Zone points sorted top-to-bottom, left-to-right
    pub fn zones(&self) -> Vec<Point> {
        let mut zones: Vec<Point> = self.zones.iter().copied().collect();
        zones.sort_by_key(|p| (p.y, p.x));
        zones
    }

    pub fn set_zones<I: IntoIterator<Item = Point>>(&mut self, zones: I) {
        self.zones = zones.into_iter().collect();
    }

    /// Adds a trip point; returns false if it was already present
    pub fn add_zone(&mut self, point: Point) -> bool {
        self.zones.insert(point)
    }

    /// Removes a trip point; returns false if it was not present
    pub fn remove_zone(&mut self, point: Point) -> bool {
        self.zones.remove(&point)
    }

    pub fn clear(&mut self) {
        self.zones.clear();
    }

    pub fn is_trip_point(&self, point: Point) -> bool {
        self.zones.contains(&point)
    }

    /// Fails if the real cursor rests on a trip point
    ///
    /// Does nothing when `enabled` is false.
    pub fn check(&self, backend: &dyn PlatformBackend, enabled: bool) -> EngineResult<()> {
        self.check_excluding(backend, enabled, None)
    }

    /// Like [`check`](Self::check), but a cursor reading equal to
    /// `self_placed` does not trip
    ///
    /// `self_placed` is where the engine itself last put the cursor during a
    /// motion.
    pub fn check_excluding(
        &self,
        backend: &dyn PlatformBackend,
        enabled: bool,
        self_placed: Option<Point>,
    ) -> EngineResult<()> {
        if !enabled || self.zones.is_empty() {
            return Ok(());
        }

        let position = backend.cursor_position()?;
        if Some(position) == self_placed || !self.zones.contains(&position) {
            return Ok(());
        }

        warn!("Fail-safe triggered: cursor at {}", position);
        Err(EngineError::SafetyTripped { position })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::virtual_backend::VirtualBackend;

    fn backend_at(point: Point) -> VirtualBackend {
        let backend = VirtualBackend::new(Size::new(1920, 1080));
        backend.set_cursor(point);
        backend
    }

    #[test]
    fn test_default_zones_are_corners() {
        let interlock = SafetyInterlock::for_screen(Size::new(1920, 1080));
        assert_eq!(
            interlock.zones(),
            vec![
                Point::new(0, 0),
                Point::new(1919, 0),
                Point::new(0, 1079),
                Point::new(1919, 1079),
            ]
        );
    }

    #[test]
    fn test_trips_in_corner() {
        let interlock = SafetyInterlock::for_screen(Size::new(1920, 1080));
        let backend = backend_at(Point::new(1919, 1079));
        assert_eq!(
            interlock.check(&backend, true),
            Err(EngineError::SafetyTripped {
                position: Point::new(1919, 1079)
            })
        );
    }

    #[test]
    fn test_quiet_away_from_zones() {
        let interlock = SafetyInterlock::for_screen(Size::new(1920, 1080));
        let backend = backend_at(Point::new(1, 0));
        assert!(interlock.check(&backend, true).is_ok());
    }

    #[test]
    fn test_disabled_never_trips() {
        let interlock = SafetyInterlock::for_screen(Size::new(1920, 1080));
        let backend = backend_at(Point::new(0, 0));
        assert!(interlock.check(&backend, false).is_ok());
    }

    #[test]
    fn test_self_placed_cursor_does_not_trip() {
        let interlock = SafetyInterlock::for_screen(Size::new(1920, 1080));
        let backend = backend_at(Point::new(0, 0));
        assert!(interlock
            .check_excluding(&backend, true, Some(Point::new(0, 0)))
            .is_ok());
        assert!(interlock
            .check_excluding(&backend, true, Some(Point::new(5, 5)))
            .is_err());
    }

    #[test]
    fn test_zone_mutation() {
        let mut interlock = SafetyInterlock::default();
        let backend = backend_at(Point::new(0, 0));
        assert!(interlock.check(&backend, true).is_ok());

        assert!(interlock.add_zone(Point::new(500, 500)));
        assert!(!interlock.add_zone(Point::new(500, 500)));
        backend.set_cursor(Point::new(500, 500));
        assert!(interlock.check(&backend, true).is_err());

        assert!(interlock.remove_zone(Point::new(500, 500)));
        assert!(interlock.check(&backend, true).is_ok());

        interlock.set_zones([Point::new(500, 500)]);
        assert!(interlock.is_trip_point(Point::new(500, 500)));
        interlock.clear();
        assert!(interlock.zones().is_empty());
    }
}
