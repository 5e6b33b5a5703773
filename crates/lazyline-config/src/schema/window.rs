//! Sliding window configuration types.

use serde::{Deserialize, Serialize};

/// Default number of lines held in memory at once.
pub const DEFAULT_MAX_LINES: u32 = 20;

/// Sliding window settings.
///
/// `max_lines` fixes the ring capacity for the whole session; the step
/// sizes drive the "read a few more" / "read a page more" commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Lines kept in the window (valid range: 1-100000).
    pub max_lines: u32,
    /// Lines appended by the short read command (valid range: 1-100000).
    pub small_step: u32,
    /// Lines appended by the long read command (valid range: 1-100000).
    pub large_step: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            max_lines: DEFAULT_MAX_LINES,
            small_step: 4,
            large_step: 20,
        }
    }
}

/// Search behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Ask before reading ahead when the window has no (further) match.
    pub confirm_read_ahead: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            confirm_read_ahead: true,
        }
    }
}
