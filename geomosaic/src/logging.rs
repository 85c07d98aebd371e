//! Logging infrastructure.
//!
//! Structured logging on stderr via `tracing`, so log lines never mix with
//! the progress bar or the final output path on stdout. Level defaults come
//! from the CLI verbosity count; `RUST_LOG` overrides them.

use std::io;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

/// Guard that must be kept alive for the duration of logging.
///
/// Dropping it flushes the non-blocking writer.
pub struct LoggingGuard {
    _guard: WorkerGuard,
}

/// Initializes the global subscriber.
///
/// Verbosity 0 logs warnings only, 1 adds info, 2 and above adds debug
/// (including per-tile request URLs).
///
/// # Errors
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(
    verbosity: u8,
) -> Result<LoggingGuard, Box<dyn std::error::Error + Send + Sync>> {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let (writer, guard) = tracing_appender::non_blocking(io::stderr());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_target(true)
        .compact()
        .try_init()?;

    Ok(LoggingGuard { _guard: guard })
}
