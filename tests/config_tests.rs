//! Integration tests for configuration loading
//!
//! Covers file round-trips in both supported formats, the precedence of CLI
//! arguments over file values, and building a working engine from settings.

use ki_autogui::config::{AutomationSettings, CliArgs, ConfigError};
use ki_autogui::engine::Engine;
use ki_autogui::input::{open_backend, BackendKind, EngineError, Point};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn test_toml_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("autogui.toml");
    let settings = AutomationSettings::default()
        .with_pause(0.25)
        .with_screen_size(1280, 720)
        .with_failsafe_points(vec![Point::new(0, 0), Point::new(640, 360)]);

    settings.to_file(&path).unwrap();
    let loaded = AutomationSettings::from_file(&path).unwrap();

    assert_eq!(loaded, settings);
}

#[test]
fn test_json_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("autogui.json");
    let settings = AutomationSettings::default().with_failsafe(false);

    settings.to_file(&path).unwrap();
    let loaded = AutomationSettings::from_file(&path).unwrap();

    assert_eq!(loaded, settings);
}

#[test]
fn test_partial_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.toml");
    fs::write(&path, "pause_seconds = 0.0\n").unwrap();

    let loaded = AutomationSettings::from_file(&path).unwrap();

    assert_eq!(loaded.pause_seconds, 0.0);
    assert!(loaded.failsafe);
    assert_eq!(loaded.backend, BackendKind::Virtual);
    assert_eq!(loaded.screen_width, 1920);
}

#[test]
fn test_unsupported_extension() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("autogui.yaml");
    fs::write(&path, "failsafe: true\n").unwrap();

    assert!(matches!(
        AutomationSettings::from_file(&path),
        Err(ConfigError::UnsupportedFormat(_))
    ));
}

#[test]
fn test_cli_overrides_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("autogui.toml");
    fs::write(&path, "failsafe = true\npause_seconds = 0.5\nscreen_width = 800\n").unwrap();

    let args = CliArgs {
        failsafe: Some(false),
        screen_height: Some(600),
        config_file: Some(path),
        ..Default::default()
    };
    let settings = args.load_settings().unwrap();

    assert!(!settings.failsafe);
    assert_eq!(settings.pause_seconds, 0.5);
    assert_eq!(settings.screen_width, 800);
    assert_eq!(settings.screen_height, 600);
}

#[test]
fn test_invalid_file_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("autogui.json");
    fs::write(&path, r#"{ "minimum_sleep": 0.0 }"#).unwrap();

    let args = CliArgs {
        config_file: Some(path),
        ..Default::default()
    };

    assert!(matches!(
        args.load_settings(),
        Err(ConfigError::ValidationError(_))
    ));
}

#[test]
fn test_engine_from_settings() {
    let settings = AutomationSettings::default()
        .with_pause(0.0)
        .with_screen_size(640, 480);
    let config = settings.to_engine_config().unwrap();
    assert_eq!(config.pause, Duration::ZERO);

    let backend = open_backend(settings.backend, settings.screen()).unwrap();
    let engine = Engine::new(backend, config).unwrap();

    assert_eq!(engine.size().unwrap().width, 640);
    assert_eq!(engine.safety_zones().len(), 4);
}

#[test]
fn test_native_backend_is_unavailable() {
    let settings = AutomationSettings::default().with_backend(BackendKind::Native);

    assert!(matches!(
        open_backend(settings.backend, settings.screen()),
        Err(EngineError::BackendUnavailable(_))
    ));
}
