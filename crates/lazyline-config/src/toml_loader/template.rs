//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# lazyline configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[window]
# max_lines = 20         # lines held in memory, 1-100000
# small_step = 4         # lines read by `+`
# large_step = 20        # lines read by `++`

[search]
# confirm_read_ahead = true   # ask before reading further on a miss

[logging]
# level = "info"         # trace, debug, info, warn, error
"##
    .to_string()
}
