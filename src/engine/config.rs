//! Runtime engine configuration

use std::time::Duration;

/// Default pause applied after every public engine call
pub const DEFAULT_PAUSE: Duration = Duration::from_millis(100);

/// Motions at or below this duration are performed in a single step
pub const DEFAULT_MINIMUM_DURATION: Duration = Duration::from_millis(100);

/// Shortest sleep issued between motion steps
pub const DEFAULT_MINIMUM_SLEEP: Duration = Duration::from_millis(50);

/// Live settings of an [`Engine`](super::Engine)
///
/// Changes made through [`Engine::config_mut`](super::Engine::config_mut)
/// take effect on the next call. Nothing here is persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Whether the corner-of-screen interlock is consulted
    pub failsafe: bool,
    /// Pacing delay after each public call
    pub pause: Duration,
    /// Threshold below which timed motion becomes atomic
    pub minimum_duration: Duration,
    /// Lower bound for the per-step motion sleep
    pub minimum_sleep: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            failsafe: true,
            pause: DEFAULT_PAUSE,
            minimum_duration: DEFAULT_MINIMUM_DURATION,
            minimum_sleep: DEFAULT_MINIMUM_SLEEP,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failsafe(mut self, enabled: bool) -> Self {
        self.failsafe = enabled;
        self
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn with_minimum_duration(mut self, minimum: Duration) -> Self {
        self.minimum_duration = minimum;
        self
    }

    pub fn with_minimum_sleep(mut self, minimum: Duration) -> Self {
        self.minimum_sleep = minimum;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert!(config.failsafe);
        assert_eq!(config.pause, Duration::from_millis(100));
        assert_eq!(config.minimum_duration, Duration::from_millis(100));
        assert_eq!(config.minimum_sleep, Duration::from_millis(50));
    }

    #[test]
    fn test_builder_methods() {
        let config = EngineConfig::new()
            .with_failsafe(false)
            .with_pause(Duration::ZERO)
            .with_minimum_duration(Duration::from_millis(10))
            .with_minimum_sleep(Duration::from_millis(1));
        assert!(!config.failsafe);
        assert!(config.pause.is_zero());
        assert_eq!(config.minimum_duration, Duration::from_millis(10));
        assert_eq!(config.minimum_sleep, Duration::from_millis(1));
    }
}
