//! Input synthesis facade
//!
//! [`Engine`] is the public face of the crate. It owns the platform backend,
//! the live [`EngineConfig`] and the safety-zone set, and exposes pointer and
//! keyboard operations built from backend primitives.
//!
//! Every public operation runs the same pipeline:
//!
//! 1. Validate and normalize arguments (no backend call has happened yet)
//! 2. Consult the fail-safe interlock
//! 3. Run the motion controller for positional operations
//! 4. Issue the backend primitives
//! 5. Sleep for the configured pause, once
//!
//! Composite operations such as [`Engine::click`] use internal helpers that
//! do not pause, so the pause is applied exactly once per public call. A
//! failed operation does not pause.
//!
//! # Example
//!
//! ```rust
//! use ki_autogui::engine::{Engine, EngineConfig, Motion};
//! use ki_autogui::input::{Point, Size, VirtualBackend};
//!
//! let desktop = VirtualBackend::new(Size::new(1920, 1080));
//! let mut engine = Engine::new(Box::new(desktop.clone()), EngineConfig::default()).unwrap();
//!
//! engine.move_to((100, 200), Motion::instant()).unwrap();
//! assert_eq!(engine.position().unwrap(), Point::new(100, 200));
//!
//! engine.hotkey(&["ctrl", "c"]).unwrap();
//! ```

pub mod config;
mod keyboard;
mod mouse;

pub use config::EngineConfig;
pub use mouse::{ClickOptions, Motion};

use crate::input::motion::MotionController;
use crate::input::mouse::{normalize_button, ButtonArg, ButtonId};
use crate::input::{
    EngineResult, PlatformBackend, Point, SafetyInterlock, Size, Sleeper, ThreadSleeper,
};
use tracing::info;

/// Hook deciding whether primary and secondary buttons are swapped
pub type ButtonSwapHook = Box<dyn Fn() -> bool>;

/// Synthesizes mouse and keyboard input through a platform backend
///
/// An engine is single-threaded: every call blocks until its motion, its
/// primitives and its pause have completed.
pub struct Engine {
    backend: Box<dyn PlatformBackend>,
    config: EngineConfig,
    interlock: SafetyInterlock,
    sleeper: Box<dyn Sleeper>,
    swap_hook: ButtonSwapHook,
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .field("safety_zones", &self.interlock.zones())
            .finish()
    }
}

impl Engine {
    /// Creates an engine over `backend`
    ///
    /// The safety zones default to the four corners of the display as
    /// reported by the backend at this moment.
    ///
    /// # Errors
    ///
    /// Propagates a failure to read the screen size.
    pub fn new(backend: Box<dyn PlatformBackend>, config: EngineConfig) -> EngineResult<Self> {
        let screen = backend.screen_size()?;
        let interlock = SafetyInterlock::for_screen(screen);

        info!(
            "Input engine ready: backend={}, screen={}, failsafe={}, pause={:?}",
            backend.name(),
            screen,
            config.failsafe,
            config.pause
        );

        Ok(Self {
            backend,
            config,
            interlock,
            sleeper: Box::new(ThreadSleeper),
            swap_hook: Box::new(|| false),
        })
    }

    /// Replaces the sleeper used for pauses and motion steps
    pub fn with_sleeper<S: Sleeper + 'static>(mut self, sleeper: S) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    /// Replaces the default corner safety zones
    pub fn with_safety_zones<I: IntoIterator<Item = Point>>(mut self, zones: I) -> Self {
        self.interlock.set_zones(zones);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Mutable access to the live configuration
    pub fn config_mut(&mut self) -> &mut EngineConfig {
        &mut self.config
    }

    pub fn set_config(&mut self, config: EngineConfig) {
        self.config = config;
    }

    /// The backend this engine drives
    pub fn backend(&self) -> &dyn PlatformBackend {
        self.backend.as_ref()
    }

    /// Installs the handedness hook consulted for `primary`/`secondary`
    pub fn set_button_swap_hook<F>(&mut self, hook: F)
    where
        F: Fn() -> bool + 'static,
    {
        self.swap_hook = Box::new(hook);
    }

    /// Current safety-zone points
    pub fn safety_zones(&self) -> Vec<Point> {
        self.interlock.zones()
    }

    pub fn set_safety_zones<I: IntoIterator<Item = Point>>(&mut self, zones: I) {
        self.interlock.set_zones(zones);
    }

    pub fn add_safety_zone(&mut self, point: Point) -> bool {
        self.interlock.add_zone(point)
    }

    pub fn remove_safety_zone(&mut self, point: Point) -> bool {
        self.interlock.remove_zone(point)
    }

    /// Empties the zone set; the interlock then never trips
    pub fn clear_safety_zones(&mut self) {
        self.interlock.clear();
    }

    /// Current cursor position, read from the backend
    pub fn position(&self) -> EngineResult<Point> {
        Ok(self.backend.cursor_position()?)
    }

    /// Current display size, read from the backend on every call
    pub fn size(&self) -> EngineResult<Size> {
        Ok(self.backend.screen_size()?)
    }

    /// Returns true if the point lies on the display
    pub fn on_screen(&self, point: impl Into<Point>) -> EngineResult<bool> {
        Ok(self.size()?.contains(point.into()))
    }

    /// Fails if the real cursor rests on a safety-zone point
    pub fn failsafe_check(&self) -> EngineResult<()> {
        self.interlock.check(self.backend.as_ref(), self.config.failsafe)
    }

    /// Like [`failsafe_check`](Self::failsafe_check), ignoring a cursor left at
    /// `placed` by the current call
    fn failsafe_check_excluding(&self, placed: Point) -> EngineResult<()> {
        self.interlock
            .check_excluding(self.backend.as_ref(), self.config.failsafe, Some(placed))
    }

    fn resolve_button(&self, button: &ButtonArg) -> EngineResult<ButtonId> {
        let swapped = (self.swap_hook)();
        let extended = self.backend.capabilities().wheel_buttons;
        normalize_button(button, swapped, extended)
    }

    fn motion(&mut self) -> MotionController<'_> {
        MotionController::new(
            self.backend.as_mut(),
            &self.interlock,
            self.sleeper.as_ref(),
            &self.config,
        )
    }

    fn sleep(&self, duration: std::time::Duration) {
        if !duration.is_zero() {
            self.sleeper.sleep(duration);
        }
    }

    /// Pacing delay applied at the end of every public call
    fn pace(&self) {
        self.sleep(self.config.pause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{BackendEvent, EngineError, RecordingSleeper, VirtualBackend};
    use std::time::Duration;

    fn engine() -> (Engine, VirtualBackend, RecordingSleeper) {
        let desktop = VirtualBackend::new(Size::new(1920, 1080));
        let sleeper = RecordingSleeper::new();
        let engine = Engine::new(Box::new(desktop.clone()), EngineConfig::default())
            .unwrap()
            .with_sleeper(sleeper.clone());
        (engine, desktop, sleeper)
    }

    #[test]
    fn test_default_zones_follow_screen() {
        let (engine, _, _) = engine();
        let zones = engine.safety_zones();
        assert_eq!(zones.len(), 4);
        assert!(zones.contains(&Point::new(1919, 1079)));
    }

    #[test]
    fn test_queries_do_not_touch_backend_or_pause() {
        let (engine, desktop, sleeper) = engine();
        assert_eq!(engine.position().unwrap(), Point::new(960, 540));
        assert_eq!(engine.size().unwrap(), Size::new(1920, 1080));
        assert!(engine.on_screen((1919, 1079)).unwrap());
        assert!(!engine.on_screen((1920, 0)).unwrap());
        assert!(desktop.events().is_empty());
        assert!(sleeper.sleeps().is_empty());
    }

    #[test]
    fn test_config_changes_apply_to_next_call() {
        let (mut engine, desktop, sleeper) = engine();
        engine.config_mut().pause = Duration::from_millis(250);
        engine.move_to((10, 10), Motion::instant()).unwrap();
        assert_eq!(sleeper.sleeps(), vec![Duration::from_millis(250)]);

        engine.set_config(EngineConfig::default().with_failsafe(false));
        desktop.set_cursor(Point::new(0, 0));
        assert!(engine.press("a").is_ok());
    }

    #[test]
    fn test_swap_hook() {
        let (mut engine, desktop, _) = engine();
        engine.set_button_swap_hook(|| true);
        engine.click(ClickOptions::new()).unwrap();
        assert!(desktop.events().contains(&BackendEvent::ButtonDown {
            at: Point::new(960, 540),
            button: ButtonId::Right
        }));
    }

    #[test]
    fn test_custom_safety_zone() {
        let (mut engine, desktop, _) = engine();
        engine.add_safety_zone(Point::new(960, 540));
        assert!(matches!(
            engine.press("a"),
            Err(EngineError::SafetyTripped { .. })
        ));
        assert!(desktop.events().is_empty());

        engine.clear_safety_zones();
        desktop.set_cursor(Point::new(0, 0));
        assert!(engine.press("a").is_ok());
    }

    #[test]
    fn test_debug_output_names_backend() {
        let (engine, _, _) = engine();
        assert!(format!("{:?}", engine).contains("virtual"));
    }
}
