//! Step timing for timed motion and the sleeping seam
//!
//! A timed motion is rendered as a series of discrete cursor updates separated
//! by blocking sleeps. The number of updates starts at one per pixel of the
//! longest screen side and is reduced until each sleep is at least the
//! configured minimum, because shorter sleeps are rounded away by the OS
//! scheduler and a timed motion would silently become instantaneous.
//!
//! # Example
//!
//! ```rust
//! use ki_autogui::input::{Size, StepTiming};
//! use std::time::Duration;
//!
//! let timing = StepTiming::compute(
//!     Duration::from_secs(1),
//!     Size::new(1920, 1080),
//!     Duration::from_millis(50),
//! );
//! assert_eq!(timing.steps, 20);
//! assert_eq!(timing.per_step, Duration::from_millis(50));
//! ```

use super::geometry::Size;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Something that can block the calling thread for a while
///
/// The engine never calls `std::thread::sleep` directly; every pause and
/// motion step goes through this trait so that timing is observable in tests.
pub trait Sleeper {
    /// Blocks for the given duration
    fn sleep(&self, duration: Duration);
}

/// Sleeps on the current thread
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Records requested sleeps instead of blocking
///
/// Clones share the same record, so a test can hand one clone to the engine
/// and inspect the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct RecordingSleeper {
    slept: Arc<Mutex<Vec<Duration>>>,
}

impl RecordingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every duration requested so far, in order
    pub fn sleeps(&self) -> Vec<Duration> {
        self.slept.lock().clone()
    }

    /// Sum of all requested durations
    pub fn total(&self) -> Duration {
        self.slept.lock().iter().sum()
    }

    pub fn clear(&self) {
        self.slept.lock().clear();
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, duration: Duration) {
        self.slept.lock().push(duration);
    }
}

/// Number of motion steps and the sleep between them
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepTiming {
    /// Interpolated steps before the final destination point
    pub steps: usize,
    /// Sleep issued before each cursor update
    pub per_step: Duration,
}

impl StepTiming {
    /// Derives step count and per-step sleep for a motion of `duration`
    ///
    /// # Arguments
    ///
    /// * `duration` - Target length of the whole motion
    /// * `screen` - Current display size; its longest side is the initial step count
    /// * `minimum_sleep` - Shortest sleep worth issuing
    pub fn compute(duration: Duration, screen: Size, minimum_sleep: Duration) -> Self {
        let mut steps = screen.longest_side().max(1) as usize;
        let mut per_step = duration / steps as u32;

        if per_step < minimum_sleep {
            steps = (duration.as_nanos() / minimum_sleep.as_nanos()).max(1) as usize;
            per_step = duration / steps as u32;
        }

        Self { steps, per_step }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_steps_shrink_to_respect_minimum_sleep() {
        let timing = StepTiming::compute(
            Duration::from_millis(200),
            Size::new(1920, 1080),
            Duration::from_millis(50),
        );
        assert_eq!(timing.steps, 4);
        assert_eq!(timing.per_step, Duration::from_millis(50));
    }

    #[test]
    fn test_long_motion_keeps_resolution_steps() {
        let timing = StepTiming::compute(
            Duration::from_secs(200),
            Size::new(1920, 1080),
            Duration::from_millis(50),
        );
        assert_eq!(timing.steps, 1920);
        assert!(timing.per_step >= Duration::from_millis(50));
    }

    #[test]
    fn test_never_zero_steps() {
        let timing = StepTiming::compute(
            Duration::from_millis(10),
            Size::new(800, 600),
            Duration::from_millis(50),
        );
        assert_eq!(timing.steps, 1);
        assert_eq!(timing.per_step, Duration::from_millis(10));
    }

    #[test]
    fn test_recording_sleeper_shares_record() {
        let sleeper = RecordingSleeper::new();
        let handle = sleeper.clone();
        sleeper.sleep(Duration::from_millis(5));
        sleeper.sleep(Duration::from_millis(7));
        assert_eq!(
            handle.sleeps(),
            vec![Duration::from_millis(5), Duration::from_millis(7)]
        );
        assert_eq!(handle.total(), Duration::from_millis(12));
        handle.clear();
        assert!(sleeper.sleeps().is_empty());
    }
}
