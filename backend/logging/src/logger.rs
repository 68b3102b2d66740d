//! Structured Logger
//!
//! Wraps `tracing` with environment-based level control (a valid `RUST_LOG`
//! wins over the configured level, which wins over `info`), console output,
//! and an optional rolling file.

use std::path::PathBuf;

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// File name prefix for the rolling log, e.g. `exfil-sink.log.2026-10-19`.
const LOG_FILE_PREFIX: &str = "exfil-sink.log";

/// Directive used when neither `RUST_LOG` nor the configured level parses.
const FALLBACK_DIRECTIVE: &str = "info";

#[derive(Debug, Clone)]
pub struct LogOptions {
    /// Filter directive used when `RUST_LOG` is unset or invalid.
    pub level: String,
    /// Emit console lines as JSON instead of human-readable text.
    pub json: bool,
    /// When set, also write NDJSON to a daily-rotated file in this directory.
    pub log_dir: Option<PathBuf>,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            log_dir: None,
        }
    }
}

impl LogOptions {
    fn env_filter(&self) -> EnvFilter {
        let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
        EnvFilter::new(filter_directive(from_env.as_deref(), &self.level))
    }
}

/// First of `RUST_LOG`, the configured level and `info` that parses as a filter.
fn filter_directive<'a>(from_env: Option<&'a str>, level: &'a str) -> &'a str {
    [from_env, Some(level)]
        .into_iter()
        .flatten()
        .find(|directive| !directive.trim().is_empty() && EnvFilter::try_new(directive).is_ok())
        .unwrap_or(FALLBACK_DIRECTIVE)
}

/// Initialize the global subscriber. Later calls are no-ops.
pub fn init_logger(options: &LogOptions) {
    let console_layer = if options.json {
        fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .boxed()
    };

    let file_layer = options.log_dir.as_ref().map(|dir| {
        let appender = RollingFileAppender::new(Rotation::DAILY, dir, LOG_FILE_PREFIX);
        fmt::layer()
            .json()
            .with_writer(appender)
            .with_ansi(false)
    });

    let _ = tracing_subscriber::registry()
        .with(options.env_filter())
        .with(console_layer)
        .with(file_layer)
        .try_init();
}
