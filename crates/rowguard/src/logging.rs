//! Subscriber setup for programs that validate through rowguard
//!
//! The library crates only emit `tracing` events: schema builds at `debug`,
//! every uniqueness query and skipped predicate at `trace`, and each rejected
//! input at `debug` with its bucket sizes. This module decides where they go.

use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "rowguard.log";

/// How events are rendered, picked with `LOG_FORMAT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, with thread ids and targets
    Pretty,
    /// One JSON object per event; rejection counts land as fields
    Json,
    /// One line per event
    Compact,
}

impl LogFormat {
    /// Unknown or missing names fall back to `Pretty`
    pub fn parse(name: &str) -> Self {
        match name {
            "json" => LogFormat::Json,
            "compact" => LogFormat::Compact,
            _ => LogFormat::Pretty,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::var("LOG_FORMAT").as_deref().unwrap_or_default())
    }
}

/// Where events are written, picked with `LOG_OUTPUT`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    /// Daily files under `LOG_DIR`, without colour codes
    File,
    /// Stdout in the chosen format plus the daily files
    Both,
}

impl LogOutput {
    /// Unknown or missing names fall back to `Stdout`
    pub fn parse(name: &str) -> Self {
        match name {
            "file" => LogOutput::File,
            "both" => LogOutput::Both,
            _ => LogOutput::Stdout,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::var("LOG_OUTPUT").as_deref().unwrap_or_default())
    }
}

fn env_filter() -> EnvFilter {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match "duckdb=warn".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

fn file_appender() -> RollingFileAppender {
    let log_dir = std::env::var("LOG_DIR").unwrap_or_else(|_| "./logs".to_string());
    std::fs::create_dir_all(&log_dir).ok();
    RollingFileAppender::new(Rotation::DAILY, &log_dir, LOG_FILE_PREFIX)
}

/// Install the global subscriber from `RUST_LOG`, `LOG_FORMAT`, `LOG_OUTPUT`
/// and `LOG_DIR` (default `./logs`).
///
/// `RUST_LOG` defaults to `info`; DuckDB's own events are held at `warn`.
/// `RUST_LOG=rowguard_schema=trace` shows every store round trip.
/// A subscriber that is already installed is left alone.
pub fn init() {
    let format = LogFormat::from_env();
    let output = LogOutput::from_env();

    let result = match (output, format) {
        (LogOutput::Stdout, LogFormat::Pretty) => tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt::layer().pretty().with_thread_ids(true).with_target(true))
            .try_init(),
        (LogOutput::Stdout, LogFormat::Json) => tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt::layer().json().with_current_span(true))
            .try_init(),
        (LogOutput::Stdout, LogFormat::Compact) => tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt::layer().compact())
            .try_init(),
        (LogOutput::File, _) => tracing_subscriber::registry()
            .with(env_filter())
            .with(fmt::layer().with_writer(file_appender()).with_ansi(false))
            .try_init(),
        // the stdout layer's type depends on the format
        (LogOutput::Both, format) => {
            let stdout_layer = match format {
                LogFormat::Pretty => fmt::layer()
                    .pretty()
                    .with_thread_ids(true)
                    .with_target(true)
                    .boxed(),
                LogFormat::Json => fmt::layer().json().with_current_span(true).boxed(),
                LogFormat::Compact => fmt::layer().compact().boxed(),
            };
            let file_layer = fmt::layer()
                .with_writer(file_appender())
                .with_ansi(false)
                .boxed();

            tracing_subscriber::registry()
                .with(env_filter())
                .with(stdout_layer)
                .with(file_layer)
                .try_init()
        }
    };

    if result.is_ok() {
        tracing::info!(format = ?format, output = ?output, "logging initialized");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_names() {
        assert_eq!(LogFormat::parse("json"), LogFormat::Json);
        assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
        assert_eq!(LogFormat::parse("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse("JSON"), LogFormat::Pretty);
        assert_eq!(LogFormat::parse(""), LogFormat::Pretty);
    }

    #[test]
    fn test_output_names() {
        assert_eq!(LogOutput::parse("file"), LogOutput::File);
        assert_eq!(LogOutput::parse("both"), LogOutput::Both);
        assert_eq!(LogOutput::parse("stdout"), LogOutput::Stdout);
        assert_eq!(LogOutput::parse("syslog"), LogOutput::Stdout);
    }
}
