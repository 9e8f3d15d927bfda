//! Automation settings and configuration management.
//!
//! This module provides the startup configuration for ki-autogui, supporting
//! multiple configuration sources with proper precedence. The result is turned
//! into the runtime [`EngineConfig`] and used to pick the input backend.

use crate::engine::EngineConfig;
use crate::input::{BackendKind, Point, Size};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Largest accepted screen side in pixels.
const MAX_SCREEN_SIDE: i32 = 16384;

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML configuration: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Failed to serialize TOML configuration.
    #[error("Failed to serialize TOML configuration: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    /// Failed to parse JSON configuration.
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Unsupported file format.
    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

/// Startup settings for the automation engine.
///
/// Timings are plain seconds so that configuration files stay readable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomationSettings {
    /// Consult the corner-of-screen interlock before each operation.
    #[serde(default = "default_failsafe")]
    pub failsafe: bool,

    /// Pause after every public call, in seconds.
    #[serde(default = "default_pause_seconds")]
    pub pause_seconds: f64,

    /// Motions at or below this many seconds are instant.
    #[serde(default = "default_minimum_duration")]
    pub minimum_duration: f64,

    /// Shortest sleep between motion steps, in seconds.
    #[serde(default = "default_minimum_sleep")]
    pub minimum_sleep: f64,

    /// Which input backend to open.
    #[serde(default)]
    pub backend: BackendKind,

    /// Width of the virtual display.
    #[serde(default = "default_screen_width")]
    pub screen_width: i32,

    /// Height of the virtual display.
    #[serde(default = "default_screen_height")]
    pub screen_height: i32,

    /// Custom safety-zone points; the screen corners when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failsafe_points: Option<Vec<Point>>,
}

fn default_failsafe() -> bool {
    true
}

fn default_pause_seconds() -> f64 {
    0.1
}

fn default_minimum_duration() -> f64 {
    0.1
}

fn default_minimum_sleep() -> f64 {
    0.05
}

fn default_screen_width() -> i32 {
    1920
}

fn default_screen_height() -> i32 {
    1080
}

impl Default for AutomationSettings {
    fn default() -> Self {
        Self {
            failsafe: default_failsafe(),
            pause_seconds: default_pause_seconds(),
            minimum_duration: default_minimum_duration(),
            minimum_sleep: default_minimum_sleep(),
            backend: BackendKind::default(),
            screen_width: default_screen_width(),
            screen_height: default_screen_height(),
            failsafe_points: None,
        }
    }
}

impl AutomationSettings {
    /// Creates settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a configuration file.
    ///
    /// Supports both TOML and JSON formats, detected by file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use ki_autogui::config::AutomationSettings;
    ///
    /// let settings = AutomationSettings::from_file("autogui.toml").unwrap();
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        match file_extension(path).as_str() {
            "toml" => Ok(toml::from_str(&content)?),
            "json" => Ok(serde_json::from_str(&content)?),
            ext => Err(ConfigError::UnsupportedFormat(ext.to_string())),
        }
    }

    /// Saves settings to a configuration file.
    ///
    /// The format is determined by the file extension. Settings are only ever
    /// written through this explicit call.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = match file_extension(path).as_str() {
            "toml" => toml::to_string_pretty(self)?,
            "json" => serde_json::to_string_pretty(self)?,
            ext => return Err(ConfigError::UnsupportedFormat(ext.to_string())),
        };

        fs::write(path, content)?;
        Ok(())
    }

    /// Loads settings from environment variables.
    ///
    /// Environment variables are prefixed with `KI_AUTOGUI_`:
    /// - `KI_AUTOGUI_FAILSAFE`
    /// - `KI_AUTOGUI_PAUSE`
    /// - `KI_AUTOGUI_MINIMUM_DURATION`
    /// - `KI_AUTOGUI_MINIMUM_SLEEP`
    /// - `KI_AUTOGUI_BACKEND`
    /// - `KI_AUTOGUI_SCREEN_WIDTH`
    /// - `KI_AUTOGUI_SCREEN_HEIGHT`
    pub fn from_env() -> Self {
        Self::default().merge_with_env()
    }

    /// Merges current settings with environment variable overrides.
    pub fn merge_with_env(mut self) -> Self {
        self.apply_overrides(|name| env::var(name).ok());
        self
    }

    /// Applies overrides from a variable lookup; unparsable values are ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("KI_AUTOGUI_FAILSAFE") {
            self.failsafe = parse_flag(&val);
        }

        if let Some(val) = lookup("KI_AUTOGUI_PAUSE") {
            if let Ok(pause) = val.parse() {
                self.pause_seconds = pause;
            }
        }

        if let Some(val) = lookup("KI_AUTOGUI_MINIMUM_DURATION") {
            if let Ok(minimum) = val.parse() {
                self.minimum_duration = minimum;
            }
        }

        if let Some(val) = lookup("KI_AUTOGUI_MINIMUM_SLEEP") {
            if let Ok(minimum) = val.parse() {
                self.minimum_sleep = minimum;
            }
        }

        if let Some(val) = lookup("KI_AUTOGUI_BACKEND") {
            if let Ok(kind) = val.parse() {
                self.backend = kind;
            }
        }

        if let Some(val) = lookup("KI_AUTOGUI_SCREEN_WIDTH") {
            if let Ok(width) = val.parse() {
                self.screen_width = width;
            }
        }

        if let Some(val) = lookup("KI_AUTOGUI_SCREEN_HEIGHT") {
            if let Ok(height) = val.parse() {
                self.screen_height = height;
            }
        }
    }

    /// Merges settings with CLI arguments.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ki_autogui::config::{AutomationSettings, CliArgs};
    ///
    /// let args = CliArgs {
    ///     failsafe: Some(false),
    ///     pause_seconds: Some(0.0),
    ///     ..Default::default()
    /// };
    ///
    /// let settings = AutomationSettings::default().merge_with_args(&args);
    /// assert!(!settings.failsafe);
    /// ```
    pub fn merge_with_args(mut self, args: &CliArgs) -> Self {
        if let Some(failsafe) = args.failsafe {
            self.failsafe = failsafe;
        }
        if let Some(pause) = args.pause_seconds {
            self.pause_seconds = pause;
        }
        if let Some(backend) = args.backend {
            self.backend = backend;
        }
        if let Some(width) = args.screen_width {
            self.screen_width = width;
        }
        if let Some(height) = args.screen_height {
            self.screen_height = height;
        }
        self
    }

    /// Validates all settings.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ki_autogui::config::AutomationSettings;
    ///
    /// let settings = AutomationSettings::default();
    /// assert!(settings.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("pause_seconds", self.pause_seconds),
            ("minimum_duration", self.minimum_duration),
            ("minimum_sleep", self.minimum_sleep),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be a non-negative number of seconds, got {}",
                    name, value
                )));
            }
        }

        if self.minimum_sleep == 0.0 {
            return Err(ConfigError::ValidationError(
                "minimum_sleep must be greater than zero".to_string(),
            ));
        }

        for (name, value) in [
            ("screen_width", self.screen_width),
            ("screen_height", self.screen_height),
        ] {
            if value < 1 {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be at least 1 pixel",
                    name
                )));
            }
            if value > MAX_SCREEN_SIDE {
                return Err(ConfigError::ValidationError(format!(
                    "{} cannot exceed {} pixels",
                    name, MAX_SCREEN_SIDE
                )));
            }
        }

        Ok(())
    }

    /// Size of the virtual display.
    pub fn screen(&self) -> Size {
        Size::new(self.screen_width, self.screen_height)
    }

    /// Converts the timing settings into a runtime engine configuration.
    pub fn to_engine_config(&self) -> Result<EngineConfig, ConfigError> {
        Ok(EngineConfig {
            failsafe: self.failsafe,
            pause: seconds("pause_seconds", self.pause_seconds)?,
            minimum_duration: seconds("minimum_duration", self.minimum_duration)?,
            minimum_sleep: seconds("minimum_sleep", self.minimum_sleep)?,
        })
    }

    // Builder-style methods for convenient configuration

    /// Enables or disables the fail-safe.
    pub fn with_failsafe(mut self, enabled: bool) -> Self {
        self.failsafe = enabled;
        self
    }

    /// Sets the pause after every call, in seconds.
    pub fn with_pause(mut self, seconds: f64) -> Self {
        self.pause_seconds = seconds;
        self
    }

    /// Sets the backend.
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    /// Sets the virtual display size.
    pub fn with_screen_size(mut self, width: i32, height: i32) -> Self {
        self.screen_width = width;
        self.screen_height = height;
        self
    }

    /// Replaces the default corner safety zones.
    pub fn with_failsafe_points(mut self, points: Vec<Point>) -> Self {
        self.failsafe_points = Some(points);
        self
    }
}

fn file_extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn parse_flag(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

fn seconds(name: &str, value: f64) -> Result<Duration, ConfigError> {
    Duration::try_from_secs_f64(value).map_err(|_| {
        ConfigError::ValidationError(format!("{} is not a valid duration: {}", name, value))
    })
}

/// CLI argument structure for parsing command line options.
///
/// All fields are optional to allow partial overrides.
#[derive(Debug, Default, Clone)]
pub struct CliArgs {
    /// Fail-safe override (`--no-failsafe` sets `Some(false)`).
    pub failsafe: Option<bool>,
    /// Pause after each call, in seconds.
    pub pause_seconds: Option<f64>,
    /// Input backend.
    pub backend: Option<BackendKind>,
    /// Virtual display width.
    pub screen_width: Option<i32>,
    /// Virtual display height.
    pub screen_height: Option<i32>,
    /// Configuration file path.
    pub config_file: Option<PathBuf>,
}

impl CliArgs {
    /// Creates an empty CliArgs instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the final settings by applying the full configuration chain.
    ///
    /// This method handles the complete configuration precedence:
    /// 1. Default values
    /// 2. Configuration file (if specified)
    /// 3. Environment variables
    /// 4. CLI arguments (self)
    pub fn load_settings(&self) -> Result<AutomationSettings, ConfigError> {
        let mut settings = if let Some(ref config_file) = self.config_file {
            AutomationSettings::from_file(config_file)?
        } else {
            AutomationSettings::default()
        };

        settings = settings.merge_with_env();
        settings = settings.merge_with_args(self);
        settings.validate()?;

        Ok(settings)
    }
}
