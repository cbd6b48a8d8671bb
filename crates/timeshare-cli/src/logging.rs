//! Tracing subscriber setup. Logs go to stderr; stdout carries only JSON.

use timeshare_core::Config;
use tracing_subscriber::EnvFilter;

/// Filter precedence: `--verbose`, then `TIMESHARE_LOG`, then the configured level.
pub fn init(verbose: bool, config: &Config) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("TIMESHARE_LOG")
            .unwrap_or_else(|_| EnvFilter::new(&config.logging.level))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
