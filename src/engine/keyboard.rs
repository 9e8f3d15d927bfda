//! Keyboard operations of the [`Engine`]
//!
//! Every operation resolves all of its key tokens against the backend's key
//! table before touching the keyboard, so an invalid token never leaves a
//! chord half pressed.

use super::Engine;
use crate::input::keyboard::{self, KeyToken};
use crate::input::EngineResult;
use std::time::Duration;
use tracing::{debug, warn};

impl Engine {
    /// Presses a key without releasing it
    pub fn key_down(&mut self, key: &str) -> EngineResult<()> {
        let token = self.resolve_key(key)?;
        debug!("key_down {}", token);

        self.failsafe_check()?;
        self.backend.key_down(&token)?;
        self.pace();
        Ok(())
    }

    /// Releases a key
    pub fn key_up(&mut self, key: &str) -> EngineResult<()> {
        let token = self.resolve_key(key)?;
        debug!("key_up {}", token);

        self.failsafe_check()?;
        self.backend.key_up(&token)?;
        self.pace();
        Ok(())
    }

    /// Presses and releases a single key
    pub fn press(&mut self, key: &str) -> EngineResult<()> {
        self.press_many(&[key], 1, Duration::ZERO)
    }

    /// Presses and releases each key in turn, `presses` times over
    ///
    /// `interval` is slept between consecutive key strokes.
    pub fn press_many<S: AsRef<str>>(
        &mut self,
        keys: &[S],
        presses: u32,
        interval: Duration,
    ) -> EngineResult<()> {
        let tokens = keyboard::resolve_keys(keys, self.backend.key_table())?;
        debug!("press {:?} x{}", tokens, presses);

        self.stroke_all((0..presses).flat_map(|_| tokens.iter()), interval)?;
        self.pace();
        Ok(())
    }

    /// Presses keys down in order, then releases them in reverse order
    ///
    /// # Example
    ///
    /// ```rust
    /// use ki_autogui::engine::{Engine, EngineConfig};
    /// use ki_autogui::input::{BackendEvent, Size, VirtualBackend};
    ///
    /// let desktop = VirtualBackend::new(Size::new(1920, 1080));
    /// let config = EngineConfig::default().with_pause(std::time::Duration::ZERO);
    /// let mut engine = Engine::new(Box::new(desktop.clone()), config).unwrap();
    ///
    /// engine.hotkey(&["ctrl", "shift", "c"]).unwrap();
    /// assert_eq!(desktop.events().last(), Some(&BackendEvent::KeyUp("ctrl".into())));
    /// ```
    pub fn hotkey<S: AsRef<str>>(&mut self, keys: &[S]) -> EngineResult<()> {
        self.hotkey_with_interval(keys, Duration::ZERO)
    }

    /// [`hotkey`](Self::hotkey) with a sleep between each press and release
    pub fn hotkey_with_interval<S: AsRef<str>>(
        &mut self,
        keys: &[S],
        interval: Duration,
    ) -> EngineResult<()> {
        let tokens = keyboard::resolve_keys(keys, self.backend.key_table())?;
        debug!("hotkey {:?}", tokens);

        self.failsafe_check()?;
        for (i, token) in tokens.iter().enumerate() {
            if i > 0 {
                self.sleep(interval);
            }
            self.backend.key_down(token)?;
        }
        for token in tokens.iter().rev() {
            self.sleep(interval);
            self.backend.key_up(token)?;
        }
        self.pace();
        Ok(())
    }

    /// Types `text` one character at a time
    ///
    /// Every character must be a valid key; nothing is typed otherwise.
    pub fn write(&mut self, text: &str, interval: Duration) -> EngineResult<()> {
        let chars: Vec<String> = text.chars().map(String::from).collect();
        let tokens = keyboard::resolve_keys(&chars, self.backend.key_table())?;
        debug!("write {} characters", tokens.len());

        self.stroke_all(&tokens, interval)?;
        self.pace();
        Ok(())
    }

    /// Types a sequence of key tokens, named keys included
    pub fn typewrite_keys<S: AsRef<str>>(&mut self, keys: &[S], interval: Duration) -> EngineResult<()> {
        let tokens = keyboard::resolve_keys(keys, self.backend.key_table())?;
        debug!("typewrite {:?}", tokens);

        self.stroke_all(&tokens, interval)?;
        self.pace();
        Ok(())
    }

    /// Holds `keys` down while `f` runs
    ///
    /// Keys are pressed in order and always released in reverse order, even
    /// when `f` or a later key press fails. That earlier error takes
    /// precedence over a release error.
    pub fn hold<S, T, F>(&mut self, keys: &[S], f: F) -> EngineResult<T>
    where
        S: AsRef<str>,
        F: FnOnce(&mut Engine) -> EngineResult<T>,
    {
        let tokens = keyboard::resolve_keys(keys, self.backend.key_table())?;
        debug!("hold {:?}", tokens);

        self.failsafe_check()?;
        let mut held: Vec<KeyToken> = Vec::with_capacity(tokens.len());
        for token in tokens {
            if let Err(err) = self.backend.key_down(&token) {
                if let Err(release_err) = self.release(&held) {
                    warn!("Releasing held keys after a failed press: {}", release_err);
                }
                return Err(err.into());
            }
            held.push(token);
        }

        let result = f(self);
        let released = self.release(&held);
        let value = result?;
        released?;

        self.pace();
        Ok(value)
    }

    /// Returns true if `key` can be pressed on this backend
    pub fn is_valid_key(&self, key: &str) -> bool {
        keyboard::is_valid_key(key, self.backend.key_table())
    }

    /// Returns true if typing `key` needs shift on a US layout
    pub fn is_shift_character(key: &str) -> bool {
        keyboard::is_shift_character(key)
    }

    fn resolve_key(&self, key: &str) -> EngineResult<KeyToken> {
        keyboard::resolve_key(key, self.backend.key_table())
    }

    /// Down/up for each token, checking the interlock before each stroke
    fn stroke_all<'t, I>(&mut self, tokens: I, interval: Duration) -> EngineResult<()>
    where
        I: IntoIterator<Item = &'t KeyToken>,
    {
        for (i, token) in tokens.into_iter().enumerate() {
            if i > 0 {
                self.sleep(interval);
            }
            self.failsafe_check()?;
            self.backend.key_down(token)?;
            self.backend.key_up(token)?;
        }
        Ok(())
    }

    /// Releases held keys in reverse order, attempting every key
    fn release(&mut self, held: &[KeyToken]) -> EngineResult<()> {
        let mut first_error = None;
        for token in held.iter().rev() {
            if let Err(err) = self.backend.key_up(token) {
                first_error.get_or_insert(err);
            }
        }
        match first_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::engine::{Engine, EngineConfig};
    use crate::input::backend::{BackendCapabilities, BackendError, BackendResult, KeyTable};
    use crate::input::{
        BackendEvent, ButtonId, EngineError, KeyToken, PlatformBackend, Point, RecordingSleeper,
        Size, VirtualBackend,
    };
    use std::time::Duration;

    /// Keyboard whose `failing_key` cannot be pressed and whose keys cannot
    /// be released
    struct StuckKeyboard {
        inner: VirtualBackend,
        failing_key: &'static str,
    }

    impl PlatformBackend for StuckKeyboard {
        fn name(&self) -> &str {
            "stuck"
        }

        fn capabilities(&self) -> BackendCapabilities {
            self.inner.capabilities()
        }

        fn cursor_position(&self) -> BackendResult<Point> {
            self.inner.cursor_position()
        }

        fn screen_size(&self) -> BackendResult<Size> {
            self.inner.screen_size()
        }

        fn move_cursor(&mut self, to: Point) -> BackendResult<()> {
            self.inner.move_cursor(to)
        }

        fn button_down(&mut self, at: Point, button: ButtonId) -> BackendResult<()> {
            self.inner.button_down(at, button)
        }

        fn button_up(&mut self, at: Point, button: ButtonId) -> BackendResult<()> {
            self.inner.button_up(at, button)
        }

        fn scroll_vertical(&mut self, amount: i32, at: Point) -> BackendResult<()> {
            self.inner.scroll_vertical(amount, at)
        }

        fn scroll_horizontal(&mut self, amount: i32, at: Point) -> BackendResult<()> {
            self.inner.scroll_horizontal(amount, at)
        }

        fn key_down(&mut self, key: &KeyToken) -> BackendResult<()> {
            if key.as_str() == self.failing_key {
                return Err(BackendError::Failed("key_down rejected".to_string()));
            }
            self.inner.key_down(key)
        }

        fn key_up(&mut self, _key: &KeyToken) -> BackendResult<()> {
            Err(BackendError::Failed("key_up rejected".to_string()))
        }

        fn key_table(&self) -> &KeyTable {
            self.inner.key_table()
        }

        fn needs_shift(&self, key: &KeyToken) -> bool {
            self.inner.needs_shift(key)
        }
    }

    fn engine_with(desktop: &VirtualBackend) -> (Engine, RecordingSleeper) {
        let sleeper = RecordingSleeper::new();
        let engine = Engine::new(Box::new(desktop.clone()), EngineConfig::default())
            .unwrap()
            .with_sleeper(sleeper.clone());
        (engine, sleeper)
    }

    fn desktop() -> VirtualBackend {
        VirtualBackend::new(Size::new(1920, 1080))
    }

    fn down(key: &str) -> BackendEvent {
        BackendEvent::KeyDown(key.to_string())
    }

    fn up(key: &str) -> BackendEvent {
        BackendEvent::KeyUp(key.to_string())
    }

    #[test]
    fn test_press_folds_named_keys() {
        let desktop = desktop();
        let (mut engine, sleeper) = engine_with(&desktop);
        engine.press("ENTER").unwrap();
        assert_eq!(desktop.events(), vec![down("enter"), up("enter")]);
        assert_eq!(sleeper.sleeps(), vec![Duration::from_millis(100)]);
    }

    #[test]
    fn test_press_many_repeats() {
        let desktop = desktop();
        let (mut engine, sleeper) = engine_with(&desktop);
        engine
            .press_many(&["left", "a"], 2, Duration::from_millis(10))
            .unwrap();
        assert_eq!(
            desktop.events(),
            vec![
                down("left"),
                up("left"),
                down("a"),
                up("a"),
                down("left"),
                up("left"),
                down("a"),
                up("a"),
            ]
        );
        assert_eq!(sleeper.sleeps().len(), 4);
    }

    #[test]
    fn test_invalid_key_in_chord_presses_nothing() {
        let desktop = desktop();
        let (mut engine, sleeper) = engine_with(&desktop);
        let result = engine.hotkey(&["ctrl", "nosuchkey", "c"]);
        assert!(matches!(result, Err(EngineError::InvalidArgument(_))));
        assert!(desktop.events().is_empty());
        assert!(sleeper.sleeps().is_empty());
    }

    #[test]
    fn test_unsupported_key_is_invalid() {
        let desktop = desktop();
        let (mut engine, _) = engine_with(&desktop);
        assert!(!engine.is_valid_key("browserback"));
        assert!(engine.press("browserback").is_err());
        assert!(engine.is_valid_key("Enter"));
        assert!(Engine::is_shift_character("%"));
    }

    #[test]
    fn test_key_down_up() {
        let desktop = desktop();
        let (mut engine, _) = engine_with(&desktop);
        engine.key_down("Shift").unwrap();
        assert_eq!(desktop.held_keys(), vec!["shift".to_string()]);
        engine.key_up("shift").unwrap();
        assert!(desktop.held_keys().is_empty());
    }

    #[test]
    fn test_hotkey_interval() {
        let desktop = desktop();
        let (mut engine, sleeper) = engine_with(&desktop);
        engine
            .hotkey_with_interval(&["alt", "tab"], Duration::from_millis(30))
            .unwrap();
        assert_eq!(
            desktop.events(),
            vec![down("alt"), down("tab"), up("tab"), up("alt")]
        );
        assert_eq!(
            sleeper.sleeps(),
            vec![
                Duration::from_millis(30),
                Duration::from_millis(30),
                Duration::from_millis(30),
                Duration::from_millis(100),
            ]
        );
    }

    #[test]
    fn test_write_preserves_case() {
        let desktop = desktop();
        let (mut engine, _) = engine_with(&desktop);
        engine.write("Hi!\n", Duration::ZERO).unwrap();
        let downs: Vec<BackendEvent> = desktop
            .events()
            .into_iter()
            .filter(|e| matches!(e, BackendEvent::KeyDown(_)))
            .collect();
        assert_eq!(downs, vec![down("H"), down("i"), down("!"), down("\n")]);
    }

    #[test]
    fn test_write_rejects_untypeable_text() {
        let desktop = desktop();
        let (mut engine, _) = engine_with(&desktop);
        assert!(engine.write("naïve", Duration::ZERO).is_err());
        assert!(desktop.events().is_empty());
    }

    #[test]
    fn test_typewrite_keys() {
        let desktop = desktop();
        let (mut engine, _) = engine_with(&desktop);
        engine
            .typewrite_keys(&["a", "LEFT", "b"], Duration::ZERO)
            .unwrap();
        assert_eq!(desktop.events()[2], down("left"));
    }

    #[test]
    fn test_hold_releases_in_reverse() {
        let desktop = desktop();
        let (mut engine, _) = engine_with(&desktop);
        let value = engine
            .hold(&["ctrl", "shift"], |engine| {
                engine.press("t")?;
                Ok(7)
            })
            .unwrap();
        assert_eq!(value, 7);
        assert_eq!(
            desktop.events(),
            vec![
                down("ctrl"),
                down("shift"),
                down("t"),
                up("t"),
                up("shift"),
                up("ctrl"),
            ]
        );
    }

    #[test]
    fn test_hold_releases_when_body_fails() {
        let desktop = desktop();
        let (mut engine, _) = engine_with(&desktop);
        let result: Result<(), EngineError> = engine.hold(&["alt"], |engine| {
            engine.move_to(Point::new(0, 0), Default::default())?;
            engine.press("f4")
        });
        assert!(matches!(result, Err(EngineError::SafetyTripped { .. })));
        assert!(desktop.held_keys().is_empty());
        assert_eq!(desktop.events().last(), Some(&up("alt")));
    }

    #[test]
    fn test_hold_reports_press_error_over_release_error() {
        let desktop = desktop();
        let backend = StuckKeyboard {
            inner: desktop.clone(),
            failing_key: "c",
        };
        let mut engine = Engine::new(Box::new(backend), EngineConfig::default())
            .unwrap()
            .with_sleeper(RecordingSleeper::new());

        let result: Result<(), EngineError> = engine.hold(&["ctrl", "c"], |_| Ok(()));

        assert_eq!(
            result,
            Err(EngineError::Backend("key_down rejected".to_string()))
        );
        assert_eq!(desktop.events(), vec![down("ctrl")]);
    }

    #[test]
    fn test_key_failures_are_not_swallowed() {
        let desktop = desktop();
        let (mut engine, _) = engine_with(&desktop);
        desktop.inject_transient_failures(1);
        assert!(matches!(engine.press("a"), Err(EngineError::Backend(_))));
    }
}
