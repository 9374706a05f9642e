//! Logging system initialization
//!
//! Installs a `tracing` subscriber. Without a log directory output goes to
//! stderr; with one it goes to `<dir>/inset.log`, and the logs of the last few
//! sessions are shifted to `inset.log.1`, `inset.log.2`, ... on startup.

use crate::error::{InsetError, Result, StringError};
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, fmt};

/// Number of previous sessions kept next to the current log
const KEPT_SESSIONS: u8 = 5;

/// Name of the current session's log file
const LOG_FILE_NAME: &str = "inset.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Initialize the logging system
///
/// Level defaults to INFO and can be changed through `RUST_LOG`.
pub fn init_logging(log_dir: Option<&Path>) -> Result<()> {
    let Some(log_dir) = log_dir else {
        let subscriber = fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter())
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|e| InsetError::LoggingError(Box::new(e)))?;
        return Ok(());
    };

    std::fs::create_dir_all(log_dir)?;
    shift_previous_sessions(&log_dir.join(LOG_FILE_NAME))?;

    // Rotation happens per session above, never by time
    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix("inset")
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| InsetError::LoggingError(Box::new(e)))?;

    let subscriber = fmt()
        .with_writer(file_appender)
        .with_env_filter(env_filter())
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| InsetError::LoggingError(Box::new(e)))?;

    tracing::info!(
        "keyboard-inset v{} logging to {}",
        env!("CARGO_PKG_VERSION"),
        log_dir.display()
    );

    Ok(())
}

/// Move `inset.log` to `inset.log.1`, `inset.log.1` to `inset.log.2` and so on,
/// dropping whatever falls off the end.
fn shift_previous_sessions(log_path: &Path) -> Result<()> {
    if !log_path.exists() {
        return Ok(());
    }

    let log_dir = log_path.parent().ok_or_else(|| {
        InsetError::LoggingError(StringError::new(format!(
            "Log path has no parent: {}",
            log_path.display()
        )))
    })?;
    let log_name = log_path
        .file_name()
        .ok_or_else(|| InsetError::LoggingError(StringError::new("Log path has no file name")))?
        .to_string_lossy();

    let numbered = |n: u8| log_dir.join(format!("{log_name}.{n}"));

    let oldest = numbered(KEPT_SESSIONS);
    if oldest.exists() {
        std::fs::remove_file(&oldest)?;
    }

    for n in (1..KEPT_SESSIONS).rev() {
        let from = numbered(n);
        if from.exists() {
            std::fs::rename(&from, numbered(n + 1))?;
        }
    }

    std::fs::rename(log_path, numbered(1))?;
    Ok(())
}
