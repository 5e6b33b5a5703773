//! Configuration schema types for lazyline.
//!
//! All structs use `serde(default)` so partial configs work correctly.
//! Missing fields are filled with the defaults of the interactive viewer.

mod system;
mod window;

pub use system::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for lazyline.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct LazylineConfig {
    pub window: WindowConfig,
    pub search: SearchConfig,
    pub logging: LoggingConfig,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_correct_window() {
        let config = LazylineConfig::default();
        assert_eq!(config.window.max_lines, 20);
        assert_eq!(config.window.small_step, 4);
        assert_eq!(config.window.large_step, 20);
    }

    #[test]
    fn default_config_confirms_read_ahead() {
        let config = LazylineConfig::default();
        assert!(config.search.confirm_read_ahead);
    }

    #[test]
    fn default_log_level_is_info() {
        let config = LazylineConfig::default();
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.logging.level.directive(), "lazyline=info");
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[window]
max_lines = 50
"#;
        let config: LazylineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.window.max_lines, 50);
        assert_eq!(config.window.small_step, 4);
        assert!(config.search.confirm_read_ahead);
    }

    #[test]
    fn empty_toml_gives_defaults() {
        let config: LazylineConfig = toml::from_str("").unwrap();
        assert_eq!(config.window.max_lines, DEFAULT_MAX_LINES);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn log_level_parses_lowercase() {
        let toml_str = r#"
[logging]
level = "debug"
"#;
        let config: LazylineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let toml_str = r#"
[logging]
level = "verbose"
"#;
        let result: Result<LazylineConfig, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn search_section_parses() {
        let toml_str = r#"
[search]
confirm_read_ahead = false
"#;
        let config: LazylineConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.search.confirm_read_ahead);
    }
}
