//! # KI-Autogui
//!
//! Synthesizes mouse and keyboard input so a program can drive GUI
//! applications the way a human at the desk would.
//!
//! ## Features
//!
//! - **Timed Motion**: Eased, stepped cursor motion with exact destinations
//! - **Fail-Safe**: Slam the mouse into a screen corner to abort a runaway script
//! - **Loose Vocabulary**: `"primary"`, `"RIGHT"`, `3`, `"Enter"` are all resolved up front
//! - **Pluggable Backends**: A [`PlatformBackend`](input::PlatformBackend) trait with an
//!   in-memory [`VirtualBackend`](input::VirtualBackend) for tests and dry runs
//! - **Flexible Configuration**: TOML/JSON files, environment variables, CLI arguments
//!
//! ## Quick Start
//!
//! ```rust
//! use ki_autogui::prelude::*;
//! use std::time::Duration;
//!
//! fn main() -> Result<(), EngineError> {
//!     let desktop = VirtualBackend::new(Size::new(1920, 1080));
//!     let config = EngineConfig::default().with_pause(Duration::ZERO);
//!     let mut engine = Engine::new(Box::new(desktop.clone()), config)?;
//!
//!     engine.move_to((400, 300), Motion::instant())?;
//!     engine.click(ClickOptions::new().button("right"))?;
//!     engine.hotkey(&["ctrl", "s"])?;
//!
//!     assert_eq!(engine.position()?, Point::new(400, 300));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`input`]: Geometry, easing, backends, normalization, fail-safe and motion
//! - [`engine`]: The [`Engine`](engine::Engine) facade with pointer and keyboard operations
//! - [`config`]: Configuration loading and management
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                         Engine                           │
//! │   normalize ─▶ fail-safe ─▶ motion ─▶ primitives ─▶ pause │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌────────────┐             │
//! │  │ Normalizer│  │ Interlock │  │   Motion   │             │
//! │  └─────┬─────┘  └─────┬─────┘  └─────┬──────┘             │
//! │        └──────────────┴──────────────┘                    │
//! │                       │                                   │
//! │              ┌────────┴────────┐                          │
//! │              │ PlatformBackend │                          │
//! │              └─────────────────┘                          │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//!
//! Configuration follows a precedence chain:
//! 1. Default values
//! 2. Configuration file (TOML/JSON)
//! 3. Environment variables (`KI_AUTOGUI_*`)
//! 4. CLI arguments
//!
//! See [`config::AutomationSettings`] for all available options.

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Full version string with name
pub const FULL_VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Module Exports
// ============================================================================

/// Geometry, easing, backends, normalization, fail-safe and motion control.
pub mod input;

/// The input synthesis facade.
pub mod engine;

/// Configuration management for loading settings from files, env, and CLI.
pub mod config;

// ============================================================================
// Re-exports for Convenience
// ============================================================================

// Input types
pub use input::{
    open_backend, BackendCapabilities, BackendError, BackendEvent, BackendKind, ButtonArg,
    ButtonId, EngineError, EngineResult, KeyToken, PlatformBackend, Point, RecordingSleeper,
    SafetyInterlock, Size, Sleeper, Tween, VirtualBackend,
};

// Engine types
pub use engine::{ClickOptions, Engine, EngineConfig, Motion};

// Config types
pub use config::{AutomationSettings, CliArgs, ConfigError};

// ============================================================================
// Prelude Module
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust
/// use ki_autogui::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{AutomationSettings, CliArgs};
    pub use crate::engine::{ClickOptions, Engine, EngineConfig, Motion};
    pub use crate::input::{
        tween, ButtonId, EngineError, EngineResult, Point, Size, VirtualBackend,
    };
    pub use crate::{FULL_VERSION, NAME, VERSION};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constants() {
        assert!(!VERSION.is_empty());
        assert!(!NAME.is_empty());
        assert!(FULL_VERSION.contains(VERSION));
        assert!(FULL_VERSION.contains(NAME));
    }

    #[test]
    fn test_prelude_imports() {
        use crate::prelude::*;
        let _ = VERSION;
        let _ = Point::new(0, 0);
        let _ = EngineConfig::default();
    }
}
