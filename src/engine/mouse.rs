//! Pointer operations of the [`Engine`]

use super::Engine;
use crate::input::backend::pointer_result;
use crate::input::mouse::{ButtonArg, ButtonId};
use crate::input::tween::{self, Tween};
use crate::input::{EngineResult, MotionKind, Point};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// How the cursor travels to a destination
#[derive(Clone)]
pub struct Motion {
    /// Target length of the motion; at or below the configured minimum it is instant
    pub duration: Duration,
    /// Easing applied to each intermediate step
    pub tween: Tween,
}

impl Default for Motion {
    fn default() -> Self {
        Self::instant()
    }
}

impl fmt::Debug for Motion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Motion")
            .field("duration", &self.duration)
            .finish_non_exhaustive()
    }
}

impl Motion {
    /// A single jump to the destination
    pub fn instant() -> Self {
        Self {
            duration: Duration::ZERO,
            tween: Arc::new(tween::linear),
        }
    }

    /// A linear motion lasting `duration`
    pub fn over(duration: Duration) -> Self {
        Self {
            duration,
            tween: Arc::new(tween::linear),
        }
    }

    /// Eases intermediate steps with `tween`, which may capture state
    pub fn with_tween<F>(mut self, tween: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.tween = Arc::new(tween);
        self
    }
}

/// Parameters for [`Engine::click`]
#[derive(Debug, Clone)]
pub struct ClickOptions {
    /// Where to click; the current position when `None`
    pub target: Option<Point>,
    pub button: ButtonArg,
    /// Number of press/release pairs
    pub clicks: u32,
    /// Sleep between consecutive clicks
    pub interval: Duration,
    /// Approach motion to `target`
    pub motion: Motion,
}

impl Default for ClickOptions {
    fn default() -> Self {
        Self {
            target: None,
            button: ButtonArg::default(),
            clicks: 1,
            interval: Duration::ZERO,
            motion: Motion::instant(),
        }
    }
}

impl ClickOptions {
    /// A single primary click at the current position
    pub fn new() -> Self {
        Self::default()
    }

    pub fn at(mut self, target: impl Into<Point>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn button(mut self, button: impl Into<ButtonArg>) -> Self {
        self.button = button.into();
        self
    }

    pub fn clicks(mut self, clicks: u32) -> Self {
        self.clicks = clicks;
        self
    }

    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn motion(mut self, motion: Motion) -> Self {
        self.motion = motion;
        self
    }
}

impl Engine {
    /// Moves the cursor to an absolute position
    ///
    /// Moving to the current position issues no backend call.
    pub fn move_to(&mut self, target: impl Into<Point>, motion: Motion) -> EngineResult<()> {
        let target = target.into();
        debug!("move_to {} over {:?}", target, motion.duration);

        self.failsafe_check()?;
        self.travel(MotionKind::Move, target, motion, None)?;
        self.pace();
        Ok(())
    }

    /// Moves the cursor relative to its current position
    pub fn move_rel(&mut self, dx: i32, dy: i32, motion: Motion) -> EngineResult<()> {
        debug!("move_rel ({}, {})", dx, dy);

        self.failsafe_check()?;
        let target = self.position()?.offset(dx, dy);
        self.travel(MotionKind::Move, target, motion, None)?;
        self.pace();
        Ok(())
    }

    /// Presses `button` at the current position, travels to `target`, releases
    pub fn drag_to(
        &mut self,
        target: impl Into<Point>,
        button: impl Into<ButtonArg>,
        motion: Motion,
    ) -> EngineResult<()> {
        let target = target.into();
        let button = self.resolve_button(&button.into())?;
        debug!("drag_to {} with {}", target, button);

        self.failsafe_check()?;
        self.drag(target, button, motion)?;
        self.pace();
        Ok(())
    }

    /// Like [`drag_to`](Self::drag_to) with a relative destination
    pub fn drag_rel(
        &mut self,
        dx: i32,
        dy: i32,
        button: impl Into<ButtonArg>,
        motion: Motion,
    ) -> EngineResult<()> {
        let button = self.resolve_button(&button.into())?;
        debug!("drag_rel ({}, {}) with {}", dx, dy, button);

        self.failsafe_check()?;
        let target = self.position()?.offset(dx, dy);
        self.drag(target, button, motion)?;
        self.pace();
        Ok(())
    }

    /// Presses a button, optionally after jumping to `at`
    pub fn mouse_down(&mut self, button: impl Into<ButtonArg>, at: Option<Point>) -> EngineResult<()> {
        let button = self.resolve_button(&button.into())?;
        debug!("mouse_down {}", button);

        self.failsafe_check()?;
        let at = self.approach(at)?;
        pointer_result(self.backend.button_down(at, button), "button_down")?;
        self.pace();
        Ok(())
    }

    /// Releases a button, optionally after jumping to `at`
    pub fn mouse_up(&mut self, button: impl Into<ButtonArg>, at: Option<Point>) -> EngineResult<()> {
        let button = self.resolve_button(&button.into())?;
        debug!("mouse_up {}", button);

        self.failsafe_check()?;
        let at = self.approach(at)?;
        pointer_result(self.backend.button_up(at, button), "button_up")?;
        self.pace();
        Ok(())
    }

    /// Moves to the click target, then clicks `clicks` times
    ///
    /// The button is validated before anything else happens; an interlock
    /// trip during the approach aborts before the button is pressed. The
    /// interlock is consulted again before every repeated click.
    pub fn click(&mut self, options: ClickOptions) -> EngineResult<()> {
        let button = self.resolve_button(&options.button)?;
        debug!(
            "click {} x{} at {:?}",
            button, options.clicks, options.target
        );

        self.failsafe_check()?;
        let target = match options.target {
            Some(target) => target,
            None => self.position()?,
        };
        self.travel(MotionKind::Move, target, options.motion, None)?;
        pointer_result(self.backend.move_cursor(target), "move_cursor")?;

        let placed = self.size()?.clamp(target);
        for i in 0..options.clicks {
            if i > 0 {
                self.sleep(options.interval);
                self.failsafe_check_excluding(placed)?;
            }
            self.press_button(target, button)?;
        }

        self.pace();
        Ok(())
    }

    /// Two primary clicks
    pub fn double_click(&mut self, at: Option<Point>, button: impl Into<ButtonArg>) -> EngineResult<()> {
        self.click(ClickOptions {
            target: at,
            button: button.into(),
            clicks: 2,
            ..ClickOptions::default()
        })
    }

    /// Three clicks, as used to select a paragraph
    pub fn triple_click(&mut self, at: Option<Point>, button: impl Into<ButtonArg>) -> EngineResult<()> {
        self.click(ClickOptions {
            target: at,
            button: button.into(),
            clicks: 3,
            ..ClickOptions::default()
        })
    }

    pub fn right_click(&mut self, at: Option<Point>) -> EngineResult<()> {
        self.click(ClickOptions {
            target: at,
            button: ButtonId::Right.into(),
            ..ClickOptions::default()
        })
    }

    pub fn middle_click(&mut self, at: Option<Point>) -> EngineResult<()> {
        self.click(ClickOptions {
            target: at,
            button: ButtonId::Middle.into(),
            ..ClickOptions::default()
        })
    }

    /// Scrolls vertically; positive amounts scroll up
    ///
    /// A zero amount issues no scroll event.
    pub fn scroll(&mut self, amount: i32, at: Option<Point>) -> EngineResult<()> {
        debug!("scroll {}", amount);

        self.failsafe_check()?;
        let at = self.approach(at)?;
        if amount != 0 {
            pointer_result(self.backend.scroll_vertical(amount, at), "scroll_vertical")?;
        }
        self.pace();
        Ok(())
    }

    /// Scrolls horizontally; positive amounts scroll right
    pub fn hscroll(&mut self, amount: i32, at: Option<Point>) -> EngineResult<()> {
        debug!("hscroll {}", amount);

        self.failsafe_check()?;
        let at = self.approach(at)?;
        if amount != 0 {
            pointer_result(self.backend.scroll_horizontal(amount, at), "scroll_horizontal")?;
        }
        self.pace();
        Ok(())
    }

    /// Same as [`scroll`](Self::scroll)
    pub fn vscroll(&mut self, amount: i32, at: Option<Point>) -> EngineResult<()> {
        self.scroll(amount, at)
    }

    /// Runs the motion controller from the current position to `target`
    fn travel(
        &mut self,
        kind: MotionKind,
        target: Point,
        motion: Motion,
        button: Option<ButtonId>,
    ) -> EngineResult<()> {
        let start = self.position()?;
        self.motion()
            .plan_and_execute(kind, start, target, motion.duration, &*motion.tween, button)
    }

    /// Jumps to `at` if given and returns where the cursor now is
    fn approach(&mut self, at: Option<Point>) -> EngineResult<Point> {
        match at {
            Some(point) => {
                self.travel(MotionKind::Move, point, Motion::instant(), None)?;
                Ok(point)
            }
            None => self.position(),
        }
    }

    fn drag(&mut self, target: Point, button: ButtonId, motion: Motion) -> EngineResult<()> {
        let start = self.position()?;
        pointer_result(self.backend.button_down(start, button), "button_down")?;
        self.travel(MotionKind::Drag, target, motion, Some(button))?;
        pointer_result(self.backend.button_up(target, button), "button_up")
    }

    fn press_button(&mut self, at: Point, button: ButtonId) -> EngineResult<()> {
        if button.is_extended() {
            return pointer_result(self.backend.click(at, button), "click");
        }
        pointer_result(self.backend.button_down(at, button), "button_down")?;
        pointer_result(self.backend.button_up(at, button), "button_up")
    }
}
