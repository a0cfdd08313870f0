//! Logging infrastructure for tilecast.
//!
//! Provides structured logging with file output and console output:
//! - Writes to the configured log file (cleared on session start)
//! - Also prints to stdout for terminal tailing
//! - Configurable via RUST_LOG environment variable

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping this guard will flush and close the log file writer.
pub struct LoggingGuard {
    _file_guard: WorkerGuard,
}

/// Initialize the logging system.
///
/// Creates the log directory if needed, clears the previous log file, and
/// sets up dual output to both file and stdout. With `debug_mode` set the
/// default level is `debug` instead of `info`; `RUST_LOG` overrides both.
///
/// # Errors
///
/// Returns an error if the log directory cannot be created or the log
/// file cannot be cleared.
pub fn init_logging(log_dir: &str, log_file: &str, debug_mode: bool) -> Result<LoggingGuard, io::Error> {
    fs::create_dir_all(log_dir)?;

    // Clear the previous log file; handles both existing and missing files.
    let log_path = Path::new(log_dir).join(log_file);
    fs::write(&log_path, "")?;

    let file_appender = tracing_appender::rolling::never(log_dir, log_file);
    let (non_blocking_file, file_guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking_file)
        .with_ansi(false)
        .compact();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_ansi(true)
        .compact();

    let default_level = if debug_mode { "debug" } else { "info" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(stdout_layer)
        .init();

    Ok(LoggingGuard {
        _file_guard: file_guard,
    })
}
