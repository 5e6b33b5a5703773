//! Full configuration validation.
//!
//! Validates all numeric ranges and collects errors into a single
//! `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::LazylineConfig;
use lazyline_common::ConfigError;

use helpers::validate_range;

/// Upper bound for any line count in the config.
const MAX_LINE_COUNT: u32 = 100_000;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &LazylineConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_window(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

/// Validate window sizing constraints.
fn validate_window(errors: &mut Vec<String>, config: &LazylineConfig) {
    validate_range(
        errors,
        "window.max_lines",
        config.window.max_lines,
        1,
        MAX_LINE_COUNT,
    );
    validate_range(
        errors,
        "window.small_step",
        config.window.small_step,
        1,
        MAX_LINE_COUNT,
    );
    validate_range(
        errors,
        "window.large_step",
        config.window.large_step,
        1,
        MAX_LINE_COUNT,
    );
}
