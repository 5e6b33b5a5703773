//! Where lazyline keeps its config file, and first-run creation of it.

use std::fs::OpenOptions;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use lazyline_common::ConfigError;
use tracing::{debug, info};

use super::template::default_config_toml;

const APP_DIR: &str = "lazyline";
const FILE_NAME: &str = "config.toml";

/// `<platform config dir>/lazyline/config.toml`.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR).join(FILE_NAME))
        .ok_or_else(|| {
            ConfigError::ParseError("no platform config directory; pass --config <PATH>".into())
        })
}

/// Write the commented template to `path`, creating parent directories.
///
/// An existing file is left alone, so a file written between the failed
/// read and this call is never clobbered.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    let io_error = |what: &str, e: std::io::Error| {
        ConfigError::ParseError(format!("cannot {what} {}: {e}", path.display()))
    };

    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| io_error("create directory for", e))?;
    }

    let mut file = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::AlreadyExists => {
            debug!("{} appeared meanwhile, keeping it", path.display());
            return Ok(());
        }
        Err(e) => return Err(io_error("create", e)),
    };
    file.write_all(default_config_toml().as_bytes())
        .map_err(|e| io_error("write", e))?;

    info!(path = %path.display(), "wrote default config");
    Ok(())
}
