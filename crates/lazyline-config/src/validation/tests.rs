//! Tests for the full validation pipeline.

use super::*;

#[test]
fn default_config_validates() {
    let config = LazylineConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_zero_max_lines() {
    let mut config = LazylineConfig::default();
    config.window.max_lines = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.max_lines"));
}

#[test]
fn catches_max_lines_too_large() {
    let mut config = LazylineConfig::default();
    config.window.max_lines = 1_000_000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.max_lines"));
}

#[test]
fn catches_zero_steps() {
    let mut config = LazylineConfig::default();
    config.window.small_step = 0;
    config.window.large_step = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.small_step"));
    assert!(err.contains("window.large_step"));
}

#[test]
fn collects_all_errors_joined() {
    let mut config = LazylineConfig::default();
    config.window.max_lines = 0;
    config.window.small_step = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("; "));
}

#[test]
fn boundary_values_are_accepted() {
    let mut config = LazylineConfig::default();
    config.window.max_lines = 1;
    config.window.small_step = MAX_LINE_COUNT;
    assert!(validate(&config).is_ok());
}
