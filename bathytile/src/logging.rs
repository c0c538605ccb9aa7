//! Logging infrastructure.
//!
//! Structured logging via `tracing`: compact console output always, plus an
//! optional non-blocking log file when a log directory is configured.
//! Filtering follows the `RUST_LOG` environment variable and defaults to
//! `info`.

use std::fs;
use std::io;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log file name used inside the configured log directory.
pub const LOG_FILE: &str = "bathytile.log";

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping it flushes and closes the file writer, if one was configured.
pub struct LoggingGuard {
    _file_guard: Option<WorkerGuard>,
}

/// Initializes the global tracing subscriber.
///
/// With `log_dir` set, the directory is created if needed and log lines are
/// mirrored to `bathytile.log` inside it (without ANSI escapes). Must be
/// called at most once per process.
pub fn init_logging(log_dir: Option<&Path>) -> Result<LoggingGuard, io::Error> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .with_target(false)
        .compact();

    match log_dir {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let appender = tracing_appender::rolling::never(dir, LOG_FILE);
            let (file_writer, file_guard) = tracing_appender::non_blocking(appender);
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(file_writer)
                .with_ansi(false);

            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .with(file_layer)
                .init();

            Ok(LoggingGuard {
                _file_guard: Some(file_guard),
            })
        }
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(console_layer)
                .init();

            Ok(LoggingGuard { _file_guard: None })
        }
    }
}
