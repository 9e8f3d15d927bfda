//! Mouse button normalization
//!
//! Callers name buttons loosely: `"left"`, `"RIGHT"`, `"primary"`, `3`. This
//! module resolves those tokens into the closed [`ButtonId`] set before any
//! backend call is made. `primary` and `secondary` are input aliases only and
//! never survive past normalization.
//!
//! # Example
//!
//! ```rust
//! use ki_autogui::input::mouse::{normalize_button, ButtonArg, ButtonId};
//!
//! assert_eq!(normalize_button(&ButtonArg::from("Middle"), false, false), Ok(ButtonId::Middle));
//! assert_eq!(normalize_button(&ButtonArg::from(3), false, false), Ok(ButtonId::Right));
//!
//! // With a left-handed button swap, primary becomes the right button
//! assert_eq!(normalize_button(&ButtonArg::from("primary"), true, false), Ok(ButtonId::Right));
//! ```

use super::{EngineError, EngineResult};

/// A resolved mouse button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonId {
    /// Left mouse button
    Left,
    /// Middle mouse button (scroll wheel click)
    Middle,
    /// Right mouse button
    Right,
    /// Backend-specific button 4-7, wheel-as-button on X11-style backends
    Extended(u8),
}

impl ButtonId {
    /// Returns the conventional X11 button number
    pub fn button_number(&self) -> u8 {
        match self {
            ButtonId::Left => 1,
            ButtonId::Middle => 2,
            ButtonId::Right => 3,
            ButtonId::Extended(n) => *n,
        }
    }

    /// Returns true for buttons 4-7
    pub fn is_extended(&self) -> bool {
        matches!(self, ButtonId::Extended(_))
    }
}

impl std::fmt::Display for ButtonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ButtonId::Left => write!(f, "left"),
            ButtonId::Middle => write!(f, "middle"),
            ButtonId::Right => write!(f, "right"),
            ButtonId::Extended(n) => write!(f, "button{}", n),
        }
    }
}

/// A button as supplied by a caller, before validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonArg {
    /// A button name such as `"left"` or `"primary"`
    Name(String),
    /// A button number such as `1` or `3`
    Number(i64),
}

impl Default for ButtonArg {
    fn default() -> Self {
        ButtonArg::Name("primary".to_string())
    }
}

impl From<&str> for ButtonArg {
    fn from(name: &str) -> Self {
        ButtonArg::Name(name.to_string())
    }
}

impl From<String> for ButtonArg {
    fn from(name: String) -> Self {
        ButtonArg::Name(name)
    }
}

impl From<i64> for ButtonArg {
    fn from(number: i64) -> Self {
        ButtonArg::Number(number)
    }
}

impl From<i32> for ButtonArg {
    fn from(number: i32) -> Self {
        ButtonArg::Number(number as i64)
    }
}

impl From<u8> for ButtonArg {
    fn from(number: u8) -> Self {
        ButtonArg::Number(number as i64)
    }
}

impl From<ButtonId> for ButtonArg {
    fn from(button: ButtonId) -> Self {
        ButtonArg::Number(button.button_number() as i64)
    }
}

impl std::fmt::Display for ButtonArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ButtonArg::Name(name) => write!(f, "'{}'", name),
            ButtonArg::Number(number) => write!(f, "{}", number),
        }
    }
}

/// Resolves a caller-supplied button token
///
/// # Arguments
///
/// * `arg` - The token to resolve; names match case-insensitively
/// * `swapped` - Result of the handedness hook; swaps `primary` and `secondary`
/// * `extended` - Whether the backend accepts buttons 4-7
///
/// # Errors
///
/// Returns [`EngineError::InvalidArgument`] for anything outside the
/// vocabulary.
pub fn normalize_button(arg: &ButtonArg, swapped: bool, extended: bool) -> EngineResult<ButtonId> {
    let resolved = match arg {
        ButtonArg::Name(name) => match name.to_lowercase().as_str() {
            "left" => Some(ButtonId::Left),
            "middle" => Some(ButtonId::Middle),
            "right" => Some(ButtonId::Right),
            "primary" if swapped => Some(ButtonId::Right),
            "primary" => Some(ButtonId::Left),
            "secondary" if swapped => Some(ButtonId::Left),
            "secondary" => Some(ButtonId::Right),
            _ => None,
        },
        ButtonArg::Number(1) => Some(ButtonId::Left),
        ButtonArg::Number(2) => Some(ButtonId::Middle),
        ButtonArg::Number(3) => Some(ButtonId::Right),
        ButtonArg::Number(n @ 4..=7) if extended => Some(ButtonId::Extended(*n as u8)),
        ButtonArg::Number(_) => None,
    };

    resolved.ok_or_else(|| {
        let valid = if extended {
            "left, middle, right, primary, secondary, 1-7"
        } else {
            "left, middle, right, primary, secondary, 1, 2, 3"
        };
        EngineError::invalid(format!(
            "button {} is not one of ({})",
            arg, valid
        ))
    })
}
