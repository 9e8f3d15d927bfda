//! Platform backend contract
//!
//! The engine never talks to the operating system directly. Everything that
//! reads or mutates real input state goes through [`PlatformBackend`], which is
//! selected once at startup with [`open_backend`] and then held as a trait
//! object for the lifetime of the engine.

use super::geometry::{Point, Size};
use super::keyboard::KeyToken;
use super::mouse::ButtonId;
use super::virtual_backend::VirtualBackend;
use super::{EngineError, EngineResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type for backend primitives
pub type BackendResult<T> = Result<T, BackendError>;

/// Failures reported by a platform backend
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// A benign OS-level race seen during high-frequency pointer events
    #[error("transient backend error: {0}")]
    Transient(String),
    /// The native capability is missing (no display, no permission, ...)
    #[error("backend unavailable: {0}")]
    Unavailable(String),
    /// Any other failure
    #[error("backend failure: {0}")]
    Failed(String),
}

/// OS-specific key code stored in a backend key table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeKeyCode(pub u32);

/// Key table of a backend: normalized token to native code
///
/// A `None` entry means the name is part of the shared vocabulary but the
/// backend has no way to produce it.
pub type KeyTable = HashMap<String, Option<NativeKeyCode>>;

/// Static capabilities a backend advertises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendCapabilities {
    /// Dragging needs its own event type instead of moving with a button held
    pub dedicated_drag_event: bool,
    /// Buttons 4-7 are exposed as wheel-as-button events
    pub wheel_buttons: bool,
}

/// Primitive operations a platform must expose
///
/// Queries take `&self`; anything that injects input takes `&mut self`.
pub trait PlatformBackend {
    /// Human-readable backend name for logs
    fn name(&self) -> &str;

    fn capabilities(&self) -> BackendCapabilities;

    /// Where the real cursor is right now
    fn cursor_position(&self) -> BackendResult<Point>;

    /// Size of the primary display, read fresh on every call
    fn screen_size(&self) -> BackendResult<Size>;

    fn move_cursor(&mut self, to: Point) -> BackendResult<()>;

    /// Moves with `button` held; only called when `dedicated_drag_event` is set
    fn drag_cursor(&mut self, to: Point, button: ButtonId) -> BackendResult<()> {
        let _ = button;
        self.move_cursor(to)
    }

    fn button_down(&mut self, at: Point, button: ButtonId) -> BackendResult<()>;

    fn button_up(&mut self, at: Point, button: ButtonId) -> BackendResult<()>;

    /// A momentary press and release
    fn click(&mut self, at: Point, button: ButtonId) -> BackendResult<()> {
        self.button_down(at, button)?;
        self.button_up(at, button)
    }

    /// Positive amounts scroll up
    fn scroll_vertical(&mut self, amount: i32, at: Point) -> BackendResult<()>;

    /// Positive amounts scroll right
    fn scroll_horizontal(&mut self, amount: i32, at: Point) -> BackendResult<()>;

    fn key_down(&mut self, key: &KeyToken) -> BackendResult<()>;

    fn key_up(&mut self, key: &KeyToken) -> BackendResult<()>;

    fn key_table(&self) -> &KeyTable;

    /// Whether producing this literal requires an implicit shift chord
    fn needs_shift(&self, key: &KeyToken) -> bool;
}

/// Converts the result of a pointer primitive, swallowing transient errors
///
/// Only pointer primitives go through here. Keyboard primitives propagate
/// every failure.
pub(crate) fn pointer_result(result: BackendResult<()>, primitive: &str) -> EngineResult<()> {
    match result {
        Ok(()) => Ok(()),
        Err(BackendError::Transient(msg)) => {
            tracing::debug!("Ignoring transient {} failure: {}", primitive, msg);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

/// Which backend implementation to open at startup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// In-memory desktop; records every primitive
    #[default]
    Virtual,
    /// The operating system's input injection API
    Native,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Virtual => write!(f, "virtual"),
            BackendKind::Native => write!(f, "native"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "virtual" | "mock" => Ok(BackendKind::Virtual),
            "native" | "os" => Ok(BackendKind::Native),
            _ => Err(EngineError::invalid(format!(
                "Unknown backend: {}. Valid backends are: virtual, native",
                s
            ))),
        }
    }
}

/// Opens the backend for this process
///
/// # Arguments
///
/// * `kind` - Which implementation to use
/// * `screen` - Display size for the virtual backend; ignored otherwise
///
/// # Errors
///
/// Returns [`EngineError::BackendUnavailable`] if the requested backend cannot
/// be initialized on this build or platform.
pub fn open_backend(kind: BackendKind, screen: Size) -> EngineResult<Box<dyn PlatformBackend>> {
    match kind {
        BackendKind::Virtual => {
            tracing::debug!("Opening virtual input backend ({})", screen);
            Ok(Box::new(VirtualBackend::new(screen)))
        }
        BackendKind::Native => Err(EngineError::BackendUnavailable(format!(
            "no native input backend is compiled into this build ({})",
            std::env::consts::OS
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_kind_parsing() {
        assert_eq!("virtual".parse::<BackendKind>().unwrap(), BackendKind::Virtual);
        assert_eq!("NATIVE".parse::<BackendKind>().unwrap(), BackendKind::Native);
        assert!("wayland".parse::<BackendKind>().is_err());
    }

    #[test]
    fn test_open_virtual_backend() {
        let backend = open_backend(BackendKind::Virtual, Size::new(800, 600)).unwrap();
        assert_eq!(backend.screen_size().unwrap(), Size::new(800, 600));
        assert_eq!(backend.name(), "virtual");
    }

    #[test]
    fn test_pointer_result_swallows_only_transient() {
        assert!(pointer_result(Err(BackendError::Transient("denied".into())), "move").is_ok());
        assert_eq!(
            pointer_result(Err(BackendError::Failed("gone".into())), "move"),
            Err(EngineError::Backend("gone".into()))
        );
        assert_eq!(
            pointer_result(Err(BackendError::Unavailable("x".into())), "move"),
            Err(EngineError::BackendUnavailable("x".into()))
        );
    }

    #[test]
    fn test_open_native_backend_is_unavailable() {
        let result = open_backend(BackendKind::Native, Size::new(800, 600));
        assert!(matches!(result, Err(EngineError::BackendUnavailable(_))));
    }
}
