//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! Log lines go to stderr so that card and JSON output on stdout stay clean.
//!
//! # Log Levels
//!
//! - `warn`: datasets that failed to load (default)
//! - `info`: datasets loaded, workbooks written
//! - `debug`: skipped sheets, per-file details (`--verbose`)
//!
//! `RUST_LOG` overrides the level chosen from the command line.

use std::io;

use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub level: Level,
    pub with_target: bool,
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_target: false,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// `--verbose` raises the level from warn to debug.
    pub fn from_verbose(verbose: bool) -> Self {
        let level = if verbose { Level::DEBUG } else { Level::WARN };
        Self {
            level,
            ..Default::default()
        }
    }
}

/// Install the global subscriber. Call once at startup.
pub fn init_logging(config: &LogConfig) {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target)
        .without_time();

    // A second call (tests) leaves the first subscriber in place.
    let _ = tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .try_init();
}

fn build_env_filter(level: Level) -> EnvFilter {
    let level_str = level.as_str().to_lowercase();

    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        // Dependencies stay at warn
        EnvFilter::new(format!(
            "warn,encuesta={level},encuesta_cli={level}",
            level = level_str
        ))
    })
}
