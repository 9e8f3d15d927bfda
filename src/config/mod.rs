//! Configuration module for ki-autogui.
//!
//! This module provides startup configuration for the input engine, including:
//! - Loading settings from files (TOML/JSON)
//! - Environment variable overrides
//! - CLI argument overrides
//! - Validation and defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use ki_autogui::config::AutomationSettings;
//!
//! // Load from a specific file
//! let settings = AutomationSettings::from_file("autogui.toml").unwrap();
//!
//! // Override with environment variables
//! let settings = settings.merge_with_env();
//!
//! let engine_config = settings.to_engine_config().unwrap();
//! ```

mod settings;

pub use settings::{AutomationSettings, CliArgs, ConfigError};
