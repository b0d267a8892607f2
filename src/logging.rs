//! Tracing subscriber setup.
//!
//! Everything goes to stderr so stdout stays clean for crumb files and
//! JSON output. `RUST_LOG` wins over the verbosity flag when set.

use clap::ValueEnum;
use tracing_subscriber::EnvFilter;

/// Output shape for log lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_level(verbose: bool) -> &'static str {
    if verbose { "debug" } else { "warn" }
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(verbose: bool, format: LogFormat) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level(verbose)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    // try_init fails only when a subscriber is already installed
    let _ = match format {
        LogFormat::Pretty => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
}
