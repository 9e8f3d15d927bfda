//! Input synthesis core for ki-autogui
//!
//! This module holds everything the [`Engine`](crate::engine::Engine) facade is
//! built from: screen geometry, easing functions, step timing, the platform
//! backend contract, button and key normalization, the fail-safe interlock and
//! the motion controller.
//!
//! # Submodules
//!
//! - [`geometry`] - Screen points and display sizes
//! - [`tween`] - Easing functions that bias intermediate motion points
//! - [`timing`] - Step-count math and the injectable [`Sleeper`]
//! - [`backend`] - The [`PlatformBackend`] contract and backend selection
//! - [`virtual_backend`] - In-memory desktop used for tests and dry runs
//! - [`mouse`] - Button token normalization
//! - [`keyboard`] - Key token normalization and the named-key vocabulary
//! - [`failsafe`] - The corner-of-screen kill switch
//! - [`motion`] - Motion planning and execution
//!
//! # Example
//!
//! ```rust
//! use ki_autogui::input::{keyboard, mouse::{self, ButtonArg}, ButtonId};
//!
//! let button = mouse::normalize_button(&ButtonArg::from("PRIMARY"), false, false).unwrap();
//! assert_eq!(button, ButtonId::Left);
//!
//! let key = keyboard::normalize_key("Enter").unwrap();
//! assert_eq!(key.as_str(), "enter");
//! ```

pub mod backend;
pub mod failsafe;
pub mod geometry;
pub mod keyboard;
pub mod motion;
pub mod mouse;
pub mod timing;
pub mod tween;
pub mod virtual_backend;

// Re-export commonly used types for convenience
pub use backend::{
    open_backend, BackendCapabilities, BackendError, BackendKind, BackendResult, KeyTable,
    NativeKeyCode, PlatformBackend,
};
pub use failsafe::SafetyInterlock;
pub use geometry::{Point, Size};
pub use keyboard::KeyToken;
pub use motion::{MotionController, MotionKind, MotionPlan};
pub use mouse::{ButtonArg, ButtonId};
pub use timing::{RecordingSleeper, Sleeper, StepTiming, ThreadSleeper};
pub use tween::{Easing, Tween};
pub use virtual_backend::{BackendEvent, VirtualBackend};

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors surfaced to callers of the input engine
///
/// Validation failures and interlock trips are reported synchronously and are
/// never retried. Transient backend errors do not appear here: they are
/// swallowed at the pointer primitives that are known to produce them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A malformed button or key token, or a coordinate of the wrong arity
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The fail-safe fired because the real cursor rests on a safety-zone point
    #[error(
        "Fail-safe triggered: cursor is at ({}, {}), a safety-zone point. \
         Move the cursor away or disable the fail-safe to continue",
        position.x,
        position.y
    )]
    SafetyTripped {
        /// Where the cursor was observed when the interlock fired
        position: Point,
    },

    /// The native input capability could not be initialized
    #[error("Input backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The backend reported a failure outside the tolerated transient category
    #[error("Input backend error: {0}")]
    Backend(String),
}

impl EngineError {
    /// Returns true if this error is the fail-safe kill switch
    pub fn is_safety_trip(&self) -> bool {
        matches!(self, EngineError::SafetyTripped { .. })
    }

    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        EngineError::InvalidArgument(message.into())
    }
}

impl From<BackendError> for EngineError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Unavailable(msg) => EngineError::BackendUnavailable(msg),
            BackendError::Transient(msg) | BackendError::Failed(msg) => EngineError::Backend(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::SafetyTripped {
            position: Point::new(0, 1079),
        };
        assert!(err.to_string().contains("0, 1079"));
        assert!(err.is_safety_trip());

        let err = EngineError::InvalidArgument("button 'thumb'".to_string());
        assert!(err.to_string().contains("thumb"));
        assert!(!err.is_safety_trip());
    }

    #[test]
    fn test_backend_error_conversion() {
        assert_eq!(
            EngineError::from(BackendError::Unavailable("no display".into())),
            EngineError::BackendUnavailable("no display".into())
        );
        assert_eq!(
            EngineError::from(BackendError::Failed("xtest".into())),
            EngineError::Backend("xtest".into())
        );
        assert_eq!(
            EngineError::from(BackendError::Transient("access denied".into())),
            EngineError::Backend("access denied".into())
        );
    }
}
