//! Logging configuration using tracing
//!
//! The TUI owns stdout and stderr, so log records go to a file through a
//! non-blocking writer. Filtering follows `RUST_LOG`, defaulting to
//! `holocron=info`.

use std::path::Path;
use thiserror::Error;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{InitError, RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset
const DEFAULT_FILTER: &str = "holocron=info";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("log file path has no file name: {0}")]
    InvalidPath(String),

    #[error("could not open log file: {0}")]
    Appender(#[from] InitError),

    #[error("could not install subscriber: {0}")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Initialize the tracing subscriber writing to `path`
///
/// The returned guard flushes buffered records when dropped; keep it alive
/// for the lifetime of the program.
///
/// # Errors
/// Returns an error if the file cannot be opened or a subscriber is already installed
pub fn init(path: &Path) -> Result<WorkerGuard, LoggingError> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LoggingError::InvalidPath(path.display().to_string()))?;
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    Ok(guard)
}
