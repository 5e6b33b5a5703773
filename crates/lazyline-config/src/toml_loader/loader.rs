//! Reading a config file into [`LazylineConfig`].

use std::io::ErrorKind;
use std::path::Path;

use lazyline_common::ConfigError;
use tracing::{info, warn};

use crate::schema::LazylineConfig;
use crate::validation;

use super::paths::{create_default_config, default_config_path};

/// Parse the file at `path`. Missing keys take their defaults.
///
/// A missing file is [`ConfigError::FileNotFound`]; any other read or
/// syntax problem is [`ConfigError::ParseError`] naming the file. Values
/// out of range only produce a warning here; [`crate::load_config`] is the
/// strict entry point.
pub fn load_from_path(path: &Path) -> Result<LazylineConfig, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ConfigError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => {
            return Err(ConfigError::ParseError(format!(
                "{}: unreadable: {e}",
                path.display()
            )))
        }
    };

    let config = parse(&content, path)?;
    if let Err(e) = validation::validate(&config) {
        warn!(path = %path.display(), "out-of-range settings: {e}");
    }

    info!(path = %path.display(), "config loaded");
    Ok(config)
}

/// Load `<config dir>/lazyline/config.toml`, writing the commented
/// template there on first run.
pub fn load_default() -> Result<LazylineConfig, ConfigError> {
    let path = default_config_path()?;

    match load_from_path(&path) {
        Err(ConfigError::FileNotFound(_)) => {
            create_default_config(&path)?;
            Ok(LazylineConfig::default())
        }
        loaded => loaded,
    }
}

fn parse(content: &str, path: &Path) -> Result<LazylineConfig, ConfigError> {
    toml::from_str(content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))
}
