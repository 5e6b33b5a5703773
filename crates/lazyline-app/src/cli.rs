use std::path::PathBuf;

use clap::Parser;

/// lazyline: page through large or compressed logs a window at a time and
/// search ahead without loading the whole file.
#[derive(Parser, Debug)]
#[command(name = "lazyline", version, about)]
pub struct Args {
    /// File to open on startup (`.gz` files are decompressed on the fly).
    pub file: Option<PathBuf>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Number of lines held in the window.
    #[arg(long)]
    pub max_lines: Option<u32>,

    /// Print the effective configuration as JSON and exit.
    #[arg(long)]
    pub print_config: bool,
}

pub fn parse() -> Args {
    Args::parse()
}
