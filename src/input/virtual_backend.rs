//! In-memory desktop backend
//!
//! [`VirtualBackend`] keeps a cursor, a display size and a US-layout key table
//! in memory and records every mutating primitive it receives. It is the
//! default backend of the CLI and the backend every test drives.
//!
//! Clones share state: hand one clone to the [`Engine`](crate::engine::Engine)
//! and keep the other to inspect events or to move the cursor the way a human
//! would.
//!
//! # Example
//!
//! ```rust
//! use ki_autogui::input::{BackendEvent, PlatformBackend, Point, Size, VirtualBackend};
//!
//! let observer = VirtualBackend::new(Size::new(1920, 1080));
//! let mut backend = observer.clone();
//! backend.move_cursor(Point::new(10, 20)).unwrap();
//!
//! assert_eq!(observer.cursor(), Point::new(10, 20));
//! assert_eq!(observer.events(), vec![BackendEvent::MoveCursor(Point::new(10, 20))]);
//! ```

use super::backend::{
    BackendCapabilities, BackendError, BackendResult, KeyTable, NativeKeyCode, PlatformBackend,
};
use super::geometry::{Point, Size};
use super::keyboard::{is_shift_character, KeyToken, NAMED_KEYS};
use super::mouse::ButtonId;
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;

/// A primitive call recorded by the virtual backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendEvent {
    MoveCursor(Point),
    DragCursor { to: Point, button: ButtonId },
    ButtonDown { at: Point, button: ButtonId },
    ButtonUp { at: Point, button: ButtonId },
    Click { at: Point, button: ButtonId },
    ScrollVertical { amount: i32, at: Point },
    ScrollHorizontal { amount: i32, at: Point },
    KeyDown(String),
    KeyUp(String),
}

impl BackendEvent {
    /// Returns true for key down/up events
    pub fn is_key_event(&self) -> bool {
        matches!(self, BackendEvent::KeyDown(_) | BackendEvent::KeyUp(_))
    }

    /// The point a pointer event was issued at, if any
    pub fn point(&self) -> Option<Point> {
        match self {
            BackendEvent::MoveCursor(p) => Some(*p),
            BackendEvent::DragCursor { to, .. } => Some(*to),
            BackendEvent::ButtonDown { at, .. }
            | BackendEvent::ButtonUp { at, .. }
            | BackendEvent::Click { at, .. }
            | BackendEvent::ScrollVertical { at, .. }
            | BackendEvent::ScrollHorizontal { at, .. } => Some(*at),
            BackendEvent::KeyDown(_) | BackendEvent::KeyUp(_) => None,
        }
    }
}

impl std::fmt::Display for BackendEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendEvent::MoveCursor(p) => write!(f, "move_cursor {}", p),
            BackendEvent::DragCursor { to, button } => write!(f, "drag_cursor {} {}", to, button),
            BackendEvent::ButtonDown { at, button } => write!(f, "button_down {} {}", at, button),
            BackendEvent::ButtonUp { at, button } => write!(f, "button_up {} {}", at, button),
            BackendEvent::Click { at, button } => write!(f, "click {} {}", at, button),
            BackendEvent::ScrollVertical { amount, at } => {
                write!(f, "scroll_vertical {} at {}", amount, at)
            }
            BackendEvent::ScrollHorizontal { amount, at } => {
                write!(f, "scroll_horizontal {} at {}", amount, at)
            }
            BackendEvent::KeyDown(key) => write!(f, "key_down {:?}", key),
            BackendEvent::KeyUp(key) => write!(f, "key_up {:?}", key),
        }
    }
}

/// X11 keysym for a named key, `None` where no keysym is mapped
fn named_keysym(name: &str) -> Option<u32> {
    let code = match name {
        "backspace" => 0xff08,
        "tab" => 0xff09,
        "clear" => 0xff0b,
        "enter" | "return" => 0xff0d,
        "pause" => 0xff13,
        "scrolllock" => 0xff14,
        "esc" | "escape" => 0xff1b,
        "kanji" => 0xff21,
        "nonconvert" => 0xff22,
        "convert" => 0xff23,
        "kana" => 0xff2e,
        "hangul" | "hanguel" => 0xff31,
        "hanja" => 0xff34,
        "home" => 0xff50,
        "left" => 0xff51,
        "up" => 0xff52,
        "right" => 0xff53,
        "down" => 0xff54,
        "pageup" | "pgup" => 0xff55,
        "pagedown" | "pgdn" => 0xff56,
        "end" => 0xff57,
        "select" => 0xff60,
        "print" | "printscreen" | "prntscrn" | "prtsc" | "prtscr" => 0xff61,
        "execute" => 0xff62,
        "insert" => 0xff63,
        "apps" => 0xff67,
        "help" => 0xff6a,
        "modechange" => 0xff7e,
        "numlock" => 0xff7f,
        "multiply" => 0xffaa,
        "add" => 0xffab,
        "separator" => 0xffac,
        "subtract" => 0xffad,
        "decimal" => 0xffae,
        "divide" => 0xffaf,
        "shift" | "shiftleft" => 0xffe1,
        "shiftright" => 0xffe2,
        "ctrl" | "ctrlleft" => 0xffe3,
        "ctrlright" => 0xffe4,
        "capslock" => 0xffe5,
        "alt" | "altleft" | "option" | "optionleft" => 0xffe9,
        "altright" | "optionright" => 0xffea,
        "win" | "winleft" | "command" => 0xffeb,
        "winright" => 0xffec,
        "delete" | "del" => 0xffff,
        "space" => 0x20,
        "yen" => 0xa5,
        "volumedown" => 0x1008_ff11,
        "volumemute" => 0x1008_ff12,
        "volumeup" => 0x1008_ff13,
        "playpause" => 0x1008_ff14,
        "stop" => 0x1008_ff15,
        "prevtrack" => 0x1008_ff16,
        "nexttrack" => 0x1008_ff17,
        _ => {
            if let Some(n) = name.strip_prefix("num").and_then(|d| d.parse::<u32>().ok()) {
                return (n <= 9).then_some(0xffb0 + n);
            }
            if let Some(n) = name.strip_prefix('f').and_then(|d| d.parse::<u32>().ok()) {
                return (1..=24).contains(&n).then_some(0xffbe + n - 1);
            }
            return None;
        }
    };
    Some(code)
}

/// US-layout key table shared by every virtual backend
static US_KEY_TABLE: Lazy<KeyTable> = Lazy::new(|| {
    let mut table = KeyTable::new();

    for name in NAMED_KEYS {
        table.insert((*name).to_string(), named_keysym(name).map(NativeKeyCode));
    }

    for c in (0x20u8..=0x7e).map(char::from) {
        table.insert(c.to_string(), Some(NativeKeyCode(c as u32)));
    }
    table.insert("\t".to_string(), Some(NativeKeyCode(0xff09)));
    table.insert("\n".to_string(), Some(NativeKeyCode(0xff0d)));
    table.insert("\r".to_string(), Some(NativeKeyCode(0xff0d)));

    table
});

#[derive(Debug)]
struct VirtualState {
    cursor: Point,
    screen: Size,
    events: Vec<BackendEvent>,
    held_keys: Vec<String>,
    held_buttons: HashSet<ButtonId>,
    transient_failures: usize,
    hard_failure: Option<String>,
}

/// Simulated desktop that records every primitive
#[derive(Debug, Clone)]
pub struct VirtualBackend {
    state: Arc<Mutex<VirtualState>>,
    capabilities: BackendCapabilities,
}

impl VirtualBackend {
    /// Creates a desktop of the given size with the cursor at the center
    pub fn new(screen: Size) -> Self {
        let cursor = Point::new(screen.width / 2, screen.height / 2);
        Self {
            state: Arc::new(Mutex::new(VirtualState {
                cursor,
                screen,
                events: Vec::new(),
                held_keys: Vec::new(),
                held_buttons: HashSet::new(),
                transient_failures: 0,
                hard_failure: None,
            })),
            capabilities: BackendCapabilities::default(),
        }
    }

    /// Advertises a different capability set
    pub fn with_capabilities(mut self, capabilities: BackendCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Current cursor position
    pub fn cursor(&self) -> Point {
        self.state.lock().cursor
    }

    /// Puts the cursor somewhere without recording an event
    ///
    /// This is how tests stand in for a human grabbing the mouse.
    pub fn set_cursor(&self, point: Point) {
        let mut state = self.state.lock();
        state.cursor = state.screen.clamp(point);
    }

    /// Changes the display size, as a resolution switch would
    pub fn set_screen_size(&self, screen: Size) {
        let mut state = self.state.lock();
        state.screen = screen;
        state.cursor = screen.clamp(state.cursor);
    }

    /// Every recorded primitive, oldest first
    pub fn events(&self) -> Vec<BackendEvent> {
        self.state.lock().events.clone()
    }

    /// Returns and clears the recorded primitives
    pub fn take_events(&self) -> Vec<BackendEvent> {
        std::mem::take(&mut self.state.lock().events)
    }

    pub fn clear_events(&self) {
        self.state.lock().events.clear();
    }

    /// Keys currently held down, in press order
    pub fn held_keys(&self) -> Vec<String> {
        self.state.lock().held_keys.clone()
    }

    /// Returns true if the button is currently held down
    pub fn is_button_held(&self, button: ButtonId) -> bool {
        self.state.lock().held_buttons.contains(&button)
    }

    /// Makes the next `count` mutating primitives fail with a transient error
    pub fn inject_transient_failures(&self, count: usize) {
        self.state.lock().transient_failures = count;
    }

    /// Makes every mutating primitive fail until [`clear_failures`](Self::clear_failures)
    pub fn inject_failure(&self, message: impl Into<String>) {
        self.state.lock().hard_failure = Some(message.into());
    }

    pub fn clear_failures(&self) {
        let mut state = self.state.lock();
        state.transient_failures = 0;
        state.hard_failure = None;
    }

    /// Runs a mutating primitive after applying injected faults
    fn apply<F>(&self, op: F) -> BackendResult<()>
    where
        F: FnOnce(&mut VirtualState) -> BackendEvent,
    {
        let mut state = self.state.lock();
        if let Some(message) = &state.hard_failure {
            return Err(BackendError::Failed(message.clone()));
        }
        if state.transient_failures > 0 {
            state.transient_failures -= 1;
            return Err(BackendError::Transient("simulated access denied".to_string()));
        }
        let event = op(&mut state);
        state.events.push(event);
        Ok(())
    }
}

impl PlatformBackend for VirtualBackend {
    fn name(&self) -> &str {
        "virtual"
    }

    fn capabilities(&self) -> BackendCapabilities {
        self.capabilities
    }

    fn cursor_position(&self) -> BackendResult<Point> {
        Ok(self.state.lock().cursor)
    }

    fn screen_size(&self) -> BackendResult<Size> {
        Ok(self.state.lock().screen)
    }

    fn move_cursor(&mut self, to: Point) -> BackendResult<()> {
        self.apply(|state| {
            state.cursor = state.screen.clamp(to);
            BackendEvent::MoveCursor(to)
        })
    }

    fn drag_cursor(&mut self, to: Point, button: ButtonId) -> BackendResult<()> {
        self.apply(|state| {
            state.cursor = state.screen.clamp(to);
            BackendEvent::DragCursor { to, button }
        })
    }

    fn button_down(&mut self, at: Point, button: ButtonId) -> BackendResult<()> {
        self.apply(|state| {
            state.cursor = state.screen.clamp(at);
            state.held_buttons.insert(button);
            BackendEvent::ButtonDown { at, button }
        })
    }

    fn button_up(&mut self, at: Point, button: ButtonId) -> BackendResult<()> {
        self.apply(|state| {
            state.cursor = state.screen.clamp(at);
            state.held_buttons.remove(&button);
            BackendEvent::ButtonUp { at, button }
        })
    }

    fn click(&mut self, at: Point, button: ButtonId) -> BackendResult<()> {
        self.apply(|state| {
            state.cursor = state.screen.clamp(at);
            BackendEvent::Click { at, button }
        })
    }

    fn scroll_vertical(&mut self, amount: i32, at: Point) -> BackendResult<()> {
        self.apply(|state| {
            state.cursor = state.screen.clamp(at);
            BackendEvent::ScrollVertical { amount, at }
        })
    }

    fn scroll_horizontal(&mut self, amount: i32, at: Point) -> BackendResult<()> {
        self.apply(|state| {
            state.cursor = state.screen.clamp(at);
            BackendEvent::ScrollHorizontal { amount, at }
        })
    }

    fn key_down(&mut self, key: &KeyToken) -> BackendResult<()> {
        self.apply(|state| {
            state.held_keys.push(key.as_str().to_string());
            BackendEvent::KeyDown(key.as_str().to_string())
        })
    }

    fn key_up(&mut self, key: &KeyToken) -> BackendResult<()> {
        self.apply(|state| {
            if let Some(idx) = state.held_keys.iter().rposition(|k| k == key.as_str()) {
                state.held_keys.remove(idx);
            }
            BackendEvent::KeyUp(key.as_str().to_string())
        })
    }

    fn key_table(&self) -> &KeyTable {
        &US_KEY_TABLE
    }

    fn needs_shift(&self, key: &KeyToken) -> bool {
        is_shift_character(key.as_str())
    }
}
