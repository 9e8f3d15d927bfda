//! Easing functions for timed motion
//!
//! A tween maps linear progress `n` in `[0, 1]` to adjusted progress. The
//! motion controller only relies on the contract, not on any formula: results
//! may leave `[0, 1]` (overshoot), and the destination is still hit exactly
//! because the final plan point is never interpolated.
//!
//! # Example
//!
//! ```rust
//! use ki_autogui::input::tween;
//!
//! let ease = tween::by_name("easeInQuad").unwrap();
//! assert_eq!(ease(0.5), 0.25);
//! ```

use std::f64::consts::PI;
use std::sync::Arc;

/// Progress-adjusting function applied to each motion step
///
/// Any `Fn(f64) -> f64` qualifies, capturing closures included.
pub type Tween = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Signature of the built-in easing functions
pub type Easing = fn(f64) -> f64;

/// Identity progress
pub fn linear(n: f64) -> f64 {
    n
}

pub fn ease_in_quad(n: f64) -> f64 {
    n * n
}

pub fn ease_out_quad(n: f64) -> f64 {
    -n * (n - 2.0)
}

pub fn ease_in_out_quad(n: f64) -> f64 {
    if n < 0.5 {
        2.0 * n * n
    } else {
        let n = n * 2.0 - 1.0;
        -0.5 * (n * (n - 2.0) - 1.0)
    }
}

pub fn ease_in_cubic(n: f64) -> f64 {
    n * n * n
}

pub fn ease_out_cubic(n: f64) -> f64 {
    let n = n - 1.0;
    n * n * n + 1.0
}

pub fn ease_in_out_cubic(n: f64) -> f64 {
    let n = n * 2.0;
    if n < 1.0 {
        0.5 * n * n * n
    } else {
        let n = n - 2.0;
        0.5 * (n * n * n + 2.0)
    }
}

pub fn ease_in_sine(n: f64) -> f64 {
    1.0 - (n * PI / 2.0).cos()
}

pub fn ease_out_sine(n: f64) -> f64 {
    (n * PI / 2.0).sin()
}

pub fn ease_in_out_sine(n: f64) -> f64 {
    -0.5 * ((PI * n).cos() - 1.0)
}

/// Pulls back below zero before accelerating
pub fn ease_in_back(n: f64) -> f64 {
    const S: f64 = 1.70158;
    n * n * ((S + 1.0) * n - S)
}

/// Overshoots past one before settling
pub fn ease_out_back(n: f64) -> f64 {
    const S: f64 = 1.70158;
    let n = n - 1.0;
    n * n * ((S + 1.0) * n + S) + 1.0
}

/// Oscillates around the destination with decaying amplitude
pub fn ease_out_elastic(n: f64) -> f64 {
    if n <= 0.0 {
        return 0.0;
    }
    if n >= 1.0 {
        return 1.0;
    }
    let period = 0.3;
    let s = period / 4.0;
    2f64.powf(-10.0 * n) * ((n - s) * (2.0 * PI) / period).sin() + 1.0
}

pub fn ease_out_bounce(n: f64) -> f64 {
    if n < 1.0 / 2.75 {
        7.5625 * n * n
    } else if n < 2.0 / 2.75 {
        let n = n - 1.5 / 2.75;
        7.5625 * n * n + 0.75
    } else if n < 2.5 / 2.75 {
        let n = n - 2.25 / 2.75;
        7.5625 * n * n + 0.9375
    } else {
        let n = n - 2.625 / 2.75;
        7.5625 * n * n + 0.984375
    }
}

/// Names accepted by [`by_name`]
pub const NAMES: &[&str] = &[
    "linear",
    "easeInQuad",
    "easeOutQuad",
    "easeInOutQuad",
    "easeInCubic",
    "easeOutCubic",
    "easeInOutCubic",
    "easeInSine",
    "easeOutSine",
    "easeInOutSine",
    "easeInBack",
    "easeOutBack",
    "easeOutElastic",
    "easeOutBounce",
];

/// Looks up a tween by its camel-case or snake-case name
pub fn by_name(name: &str) -> Option<Easing> {
    let key: String = name
        .chars()
        .filter(|c| *c != '_' && *c != '-')
        .collect::<String>()
        .to_lowercase();

    let tween: Easing = match key.as_str() {
        "linear" => linear,
        "easeinquad" => ease_in_quad,
        "easeoutquad" => ease_out_quad,
        "easeinoutquad" => ease_in_out_quad,
        "easeincubic" => ease_in_cubic,
        "easeoutcubic" => ease_out_cubic,
        "easeinoutcubic" => ease_in_out_cubic,
        "easeinsine" => ease_in_sine,
        "easeoutsine" => ease_out_sine,
        "easeinoutsine" => ease_in_out_sine,
        "easeinback" => ease_in_back,
        "easeoutback" => ease_out_back,
        "easeoutelastic" => ease_out_elastic,
        "easeoutbounce" => ease_out_bounce,
        _ => return None,
    };
    Some(tween)
}
