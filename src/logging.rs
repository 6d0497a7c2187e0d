//! Tracing subscriber setup for the command line.
//!
//! Logs go to stderr so stdout stays free for holdings output. `RUST_LOG`
//! overrides the level chosen on the command line.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

/// Map `-v` occurrences to a base level.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

pub fn init(verbosity: u8) {
    let level = level_for(verbosity);
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);
    let installed = tracing_subscriber::registry()
        .with(build_filter(level))
        .with(fmt_layer)
        .try_init();
    match installed {
        Ok(()) => tracing::debug!(level, "logging initialized"),
        Err(e) => tracing::debug!(error = %e, "subscriber already installed, keeping it"),
    }
}
