//! Motion planning and execution
//!
//! A motion turns a destination and a duration into discrete cursor updates.
//! Very short motions collapse into one atomic update. Longer ones are
//! rendered as `steps` eased, interpolated points separated by blocking
//! sleeps, followed by the exact destination.
//!
//! The interlock is consulted before every update whose target is not itself
//! a trip point, and once more after the last update, so a runaway script can
//! be stopped mid-motion.
//!
//! # Example
//!
//! ```rust
//! use ki_autogui::input::{MotionPlan, Point, StepTiming, tween};
//! use std::time::Duration;
//!
//! let timing = StepTiming { steps: 4, per_step: Duration::from_millis(50) };
//! let plan = MotionPlan::stepped(Point::new(0, 0), Point::new(100, 0), &tween::linear, timing);
//!
//! assert_eq!(plan.points().len(), 5);
//! assert_eq!(plan.destination(), Point::new(100, 0));
//! ```

use super::backend::{pointer_result, PlatformBackend};
use super::failsafe::SafetyInterlock;
use super::geometry::Point;
use super::mouse::ButtonId;
use super::timing::{Sleeper, StepTiming};
use super::{EngineError, EngineResult};
use crate::engine::EngineConfig;
use std::time::Duration;
use tracing::trace;

/// Whether a motion moves the cursor or drags with a button held
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionKind {
    Move,
    Drag,
}

/// Points a single motion will visit, computed once per call
///
/// Never empty; the last point is always the requested destination.
#[derive(Debug, Clone, PartialEq)]
pub struct MotionPlan {
    points: Vec<Point>,
    step_pause: Duration,
}

impl MotionPlan {
    /// A single jump to `end` with no sleeping
    pub fn atomic(end: Point) -> Self {
        Self {
            points: vec![end],
            step_pause: Duration::ZERO,
        }
    }

    /// `timing.steps` eased points from `start`, then `end` exactly
    pub fn stepped(start: Point, end: Point, tween: &dyn Fn(f64) -> f64, timing: StepTiming) -> Self {
        let steps = timing.steps.max(1);
        let mut points = Vec::with_capacity(steps + 1);
        for i in 0..steps {
            let progress = tween(i as f64 / steps as f64);
            points.push(start.lerp(&end, progress));
        }
        points.push(end);

        Self {
            points,
            step_pause: timing.per_step,
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Sleep issued before each update; zero for atomic plans
    pub fn step_pause(&self) -> Duration {
        self.step_pause
    }

    pub fn destination(&self) -> Point {
        self.points[self.points.len() - 1]
    }

    pub fn is_atomic(&self) -> bool {
        self.points.len() == 1 && self.step_pause.is_zero()
    }
}

/// Drives a backend through motion plans
///
/// Borrowed from the engine for the span of one call.
pub struct MotionController<'a> {
    backend: &'a mut dyn PlatformBackend,
    interlock: &'a SafetyInterlock,
    sleeper: &'a dyn Sleeper,
    config: &'a EngineConfig,
}

impl<'a> MotionController<'a> {
    pub fn new(
        backend: &'a mut dyn PlatformBackend,
        interlock: &'a SafetyInterlock,
        sleeper: &'a dyn Sleeper,
        config: &'a EngineConfig,
    ) -> Self {
        Self {
            backend,
            interlock,
            sleeper,
            config,
        }
    }

    /// Builds the plan for a motion, or `None` if there is nothing to do
    pub fn plan(
        &self,
        start: Point,
        end: Point,
        duration: Duration,
        tween: &dyn Fn(f64) -> f64,
    ) -> EngineResult<Option<MotionPlan>> {
        if start == end {
            return Ok(None);
        }
        if duration <= self.config.minimum_duration {
            return Ok(Some(MotionPlan::atomic(end)));
        }

        let screen = self.backend.screen_size()?;
        let timing = StepTiming::compute(duration, screen, self.config.minimum_sleep);
        Ok(Some(MotionPlan::stepped(start, end, tween, timing)))
    }

    /// Plans a motion from `start` to `end` and performs it
    ///
    /// # Errors
    ///
    /// * [`EngineError::InvalidArgument`] for a drag without a button
    /// * [`EngineError::SafetyTripped`] if the interlock fires mid-motion
    /// * [`EngineError::Backend`] for non-transient backend failures
    pub fn plan_and_execute(
        &mut self,
        kind: MotionKind,
        start: Point,
        end: Point,
        duration: Duration,
        tween: &dyn Fn(f64) -> f64,
        button: Option<ButtonId>,
    ) -> EngineResult<()> {
        if kind == MotionKind::Drag && button.is_none() {
            return Err(EngineError::invalid("a drag needs a button"));
        }

        match self.plan(start, end, duration, tween)? {
            Some(plan) => self.execute(kind, &plan, button),
            None => Ok(()),
        }
    }

    /// Performs an already computed plan
    pub fn execute(
        &mut self,
        kind: MotionKind,
        plan: &MotionPlan,
        button: Option<ButtonId>,
    ) -> EngineResult<()> {
        let screen = self.backend.screen_size()?;
        let failsafe = self.config.failsafe;
        let mut self_placed: Option<Point> = None;

        for (i, &point) in plan.points().iter().enumerate() {
            if !plan.is_atomic() {
                self.sleeper.sleep(plan.step_pause());
            }
            if !self.interlock.is_trip_point(point) {
                self.interlock
                    .check_excluding(&*self.backend, failsafe, self_placed)?;
            }

            trace!("Motion step {}/{} to {}", i + 1, plan.points().len(), point);
            self.emit(kind, point, button)?;
            // The OS clamps off-screen targets, so compare against the clamped point
            self_placed = Some(screen.clamp(point));
        }

        if !self.interlock.is_trip_point(plan.destination()) {
            self.interlock
                .check_excluding(&*self.backend, failsafe, self_placed)?;
        }
        Ok(())
    }

    fn emit(&mut self, kind: MotionKind, point: Point, button: Option<ButtonId>) -> EngineResult<()> {
        match (kind, button) {
            (MotionKind::Drag, Some(button)) if self.backend.capabilities().dedicated_drag_event => {
                pointer_result(self.backend.drag_cursor(point, button), "drag_cursor")
            }
            _ => pointer_result(self.backend.move_cursor(point), "move_cursor"),
        }
    }
}
