//! Logging setup
//!
//! Every run writes a fresh `deployment_<timestamp>.log` and mirrors the same
//! events to stderr. The level defaults to INFO and follows `RUST_LOG` when
//! set. The file appender is unbuffered so an interrupt exit loses nothing.

use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Name of the log file for a run started at `started`
pub fn log_file_name(started: DateTime<Local>) -> String {
    format!("deployment_{}.log", started.format("%Y%m%d_%H%M%S"))
}

/// Install the global subscriber and return the path of the log file.
///
/// # Errors
///
/// Returns an error if the log directory or file cannot be created, or the
/// subscriber is already installed.
pub fn init_logging(log_dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(log_dir)?;
    let file_name = log_file_name(Local::now());
    let log_path = log_dir.join(&file_name);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(&file_name)
        .build(log_dir)
        .map_err(|e| io::Error::other(format!("{}: {}", log_path.display(), e)))?;

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(file_appender)
        .with_ansi(false)
        .with_target(false);

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .with_target(false)
        .without_time();

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .map_err(|e| io::Error::other(e.to_string()))?;

    Ok(log_path)
}
