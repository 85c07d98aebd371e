//! CLI error handling with user-friendly messages.
//!
//! Centralizes error formatting and exit codes so `main` stays a thin
//! wrapper around the library.

use geomosaic::fetch::FetchError;
use geomosaic::provider::SourceError;
use geomosaic::ServiceError;
use std::fmt;
use std::path::PathBuf;
use std::process;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Failed to create the HTTP client
    Source(SourceError),
    /// Mosaic build failed
    Build(ServiceError),
    /// Failed to write the output file
    FileWrite {
        path: PathBuf,
        error: image::ImageError,
    },
}

impl CliError {
    /// Exit the process with an appropriate message and code.
    pub fn exit(&self) -> ! {
        // A declined confirmation is a normal way out, not a failure.
        if let CliError::Build(ServiceError::Aborted { .. }) = self {
            eprintln!("Aborted.");
            process::exit(0)
        }

        eprintln!("Error: {}", self);

        match self {
            CliError::Build(ServiceError::Fetch(FetchError::SourceRejected)) => {
                eprintln!();
                eprintln!("The imagery source stopped serving satellite tiles, which usually");
                eprintln!("means this client has been throttled or blocked. Wait before");
                eprintln!("retrying, or keep the request rate down with --jobs 1.");
            }
            CliError::Build(ServiceError::Fetch(FetchError::Transport(_))) => {
                eprintln!();
                eprintln!("Network problem talking to the imagery source; nothing was written.");
            }
            _ => {}
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "failed to initialize logging: {}", msg),
            CliError::Source(e) => write!(f, "failed to create HTTP client: {}", e),
            CliError::Build(e) => write!(f, "{}", e),
            CliError::FileWrite { path, error } => {
                write!(f, "failed to write {}: {}", path.display(), error)
            }
        }
    }
}

impl std::error::Error for CliError {}
