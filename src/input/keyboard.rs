//! Key token normalization
//!
//! A key token is either a single printable character, kept exactly as given
//! (`"A"` and `"a"` are different keys), or a named key, case-folded to
//! lowercase (`"Enter"`, `"ENTER"` and `"enter"` are the same key). Validity is
//! decided by the active backend's key table, so callers can ask ahead of time
//! whether a key can be produced.
//!
//! # Example
//!
//! ```rust
//! use ki_autogui::input::keyboard::{normalize_key, is_shift_character};
//!
//! assert_eq!(normalize_key("A").unwrap().as_str(), "A");
//! assert_eq!(normalize_key("ENTER").unwrap().as_str(), "enter");
//! assert!(is_shift_character("?"));
//! ```

use super::backend::KeyTable;
use super::{EngineError, EngineResult};

/// A normalized key, ready to be looked up in a backend key table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyToken(String);

impl KeyToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for a single-character literal
    pub fn is_literal(&self) -> bool {
        self.0.chars().count() == 1
    }
}

impl std::fmt::Display for KeyToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for KeyToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Named keys shared by every backend's key table
///
/// Single printable characters are valid tokens on their own and are not
/// listed here.
pub const NAMED_KEYS: &[&str] = &[
    "accept", "add", "alt", "altleft", "altright", "apps", "backspace",
    "browserback", "browserfavorites", "browserforward", "browserhome",
    "browserrefresh", "browsersearch", "browserstop", "capslock", "clear",
    "command", "convert", "ctrl", "ctrlleft", "ctrlright", "decimal", "del",
    "delete", "divide", "down", "end", "enter", "esc", "escape", "execute",
    "f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9", "f10", "f11", "f12",
    "f13", "f14", "f15", "f16", "f17", "f18", "f19", "f20", "f21", "f22",
    "f23", "f24", "final", "fn", "hanguel", "hangul", "hanja", "help", "home",
    "insert", "junja", "kana", "kanji", "launchapp1", "launchapp2",
    "launchmail", "launchmediaselect", "left", "modechange", "multiply",
    "nexttrack", "nonconvert", "num0", "num1", "num2", "num3", "num4", "num5",
    "num6", "num7", "num8", "num9", "numlock", "option", "optionleft",
    "optionright", "pagedown", "pageup", "pause", "pgdn", "pgup", "playpause",
    "prevtrack", "print", "printscreen", "prntscrn", "prtsc", "prtscr",
    "return", "right", "scrolllock", "select", "separator", "shift",
    "shiftleft", "shiftright", "sleep", "space", "stop", "subtract", "tab",
    "up", "volumedown", "volumemute", "volumeup", "win", "winleft", "winright",
    "yen",
];

/// Characters that need shift on a US keyboard besides uppercase letters
const SHIFTED_SYMBOLS: &str = "~!@#$%^&*()_+{}|:\"<>?";

/// Normalizes a raw key token without consulting any key table
///
/// # Errors
///
/// Returns [`EngineError::InvalidArgument`] for an empty token.
pub fn normalize_key(raw: &str) -> EngineResult<KeyToken> {
    match raw.chars().count() {
        0 => Err(EngineError::invalid("key token is empty")),
        1 => Ok(KeyToken(raw.to_string())),
        _ => Ok(KeyToken(raw.to_lowercase())),
    }
}

/// Normalizes a token and checks it against a backend key table
///
/// # Errors
///
/// Returns [`EngineError::InvalidArgument`] if the token is empty, absent from
/// the table, or mapped to a null entry.
pub fn resolve_key(raw: &str, table: &KeyTable) -> EngineResult<KeyToken> {
    let token = normalize_key(raw)?;
    match table.get(token.as_str()) {
        Some(Some(_)) => Ok(token),
        Some(None) => Err(EngineError::invalid(format!(
            "key '{}' is not supported by this backend",
            token
        ))),
        None => Err(EngineError::invalid(format!("'{}' is not a valid key", raw))),
    }
}

/// Resolves every token up front, failing on the first invalid one
pub fn resolve_keys<S: AsRef<str>>(raw: &[S], table: &KeyTable) -> EngineResult<Vec<KeyToken>> {
    raw.iter().map(|k| resolve_key(k.as_ref(), table)).collect()
}

/// Returns true if the token can be pressed with the given key table
pub fn is_valid_key(raw: &str, table: &KeyTable) -> bool {
    resolve_key(raw, table).is_ok()
}

/// Returns true if typing this literal on a US layout needs shift held
pub fn is_shift_character(raw: &str) -> bool {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.is_uppercase() || SHIFTED_SYMBOLS.contains(c),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::backend::NativeKeyCode;

    fn table() -> KeyTable {
        let mut table = KeyTable::new();
        table.insert("a".to_string(), Some(NativeKeyCode(0x61)));
        table.insert("A".to_string(), Some(NativeKeyCode(0x41)));
        table.insert("enter".to_string(), Some(NativeKeyCode(0xff0d)));
        table.insert("volumemute".to_string(), None);
        table
    }

    #[test]
    fn test_single_characters_keep_case() {
        assert_eq!(normalize_key("A").unwrap().as_str(), "A");
        assert_eq!(normalize_key("a").unwrap().as_str(), "a");
        assert_eq!(normalize_key("é").unwrap().as_str(), "é");
    }

    #[test]
    fn test_named_keys_fold_case() {
        assert_eq!(normalize_key("ENTER").unwrap().as_str(), "enter");
        assert_eq!(normalize_key("Enter").unwrap().as_str(), "enter");
        assert_eq!(normalize_key("F11").unwrap().as_str(), "f11");
    }

    #[test]
    fn test_empty_token_is_invalid() {
        assert!(matches!(
            normalize_key(""),
            Err(EngineError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_resolve_against_table() {
        let table = table();
        assert_eq!(resolve_key("Enter", &table).unwrap().as_str(), "enter");
        assert_eq!(resolve_key("A", &table).unwrap().as_str(), "A");
        assert!(resolve_key("volumemute", &table).is_err());
        assert!(resolve_key("notakey", &table).is_err());
        assert!(is_valid_key("a", &table));
        assert!(!is_valid_key("b", &table));
    }

    #[test]
    fn test_resolve_keys_fails_on_first_invalid() {
        let table = table();
        assert_eq!(resolve_keys(&["a", "ENTER"], &table).unwrap().len(), 2);
        assert!(resolve_keys(&["a", "bogus", "enter"], &table).is_err());
    }

    #[test]
    fn test_is_shift_character() {
        for c in "ABCDEFGHIJKLMNOPQRSTUVWXYZ~!@#$%^&*()_+{}|:\"<>?".chars() {
            assert!(is_shift_character(&c.to_string()), "{}", c);
        }
        for c in "abcdefghijklmnopqrstuvwxyz `1234567890-=,./;'[]\\".chars() {
            assert!(!is_shift_character(&c.to_string()), "{}", c);
        }
        assert!(!is_shift_character("shift"));
    }

    #[test]
    fn test_named_key_vocabulary_is_lowercase() {
        for name in NAMED_KEYS {
            assert_eq!(name.to_lowercase(), *name);
            assert!(name.chars().count() > 1);
        }
    }
}
