mod cli;
mod commands;
mod repl;
mod session;

use lazyline_config::LazylineConfig;
use tracing_subscriber::EnvFilter;

fn main() {
    // Parse CLI arguments
    let args = cli::parse();

    // Load config before logging so its level can seed the filter
    let loaded = lazyline_config::load_config(args.config.as_deref());
    let level = loaded
        .as_ref()
        .map(|c| c.logging.level)
        .unwrap_or_default();

    // Initialize logging (stderr keeps stdout for the window)
    let log_directive = args
        .log_level
        .as_deref()
        .map(|l| format!("lazyline={l}"))
        .unwrap_or_else(|| level.directive());
    let directive = log_directive
        .parse()
        .or_else(|_| level.directive().parse());
    let mut filter = EnvFilter::from_default_env();
    if let Ok(directive) = directive {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("lazyline v{} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = loaded.unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        LazylineConfig::default()
    });
    if let Some(max_lines) = args.max_lines {
        config.window.max_lines = max_lines;
    }
    if let Err(e) = lazyline_config::validation::validate(&config) {
        eprintln!("invalid settings: {e}");
        std::process::exit(2);
    }

    if args.print_config {
        println!("{}", lazyline_config::config_to_json(&config));
        return;
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("Failed to create tokio runtime: {e}");
            std::process::exit(1);
        }
    };

    let session = session::Session::new(config);
    if let Err(e) = runtime.block_on(repl::run(session, args.file)) {
        tracing::error!("Session error: {e}");
        std::process::exit(1);
    }
    tracing::info!("Shutdown complete");
}
