//! Error types for the loadgen harness.
//!
//! Two tiers only. Validation errors (arguments, size strings) are reported
//! to the user and cause a clean failure exit before any engine resource is
//! allocated. Everything else (engine calls, thread start/join, I/O) is
//! unrecoverable: this is a single-shot measurement run, not a service, so
//! the failing operation is reported and the process terminates abnormally.

use std::io;
use thiserror::Error;

/// Result type alias for loadgen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the loadgen harness
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error (environment directory, file operations)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// A command-line argument failed validation
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A human-readable size string could not be parsed
    #[error("invalid size {input:?}: {reason}")]
    InvalidSize {
        /// The offending input
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// Storage engine failure (open, begin, put, commit, sync, stat)
    #[error("storage engine error: {0}")]
    Engine(String),

    /// A background thread could not be started or joined
    #[error("thread error: {0}")]
    Thread(String),
}

impl Error {
    /// Wrap an engine-specific failure.
    pub fn engine(err: impl std::fmt::Display) -> Self {
        Error::Engine(err.to_string())
    }

    /// Wrap a thread start/join failure.
    pub fn thread(err: impl std::fmt::Display) -> Self {
        Error::Thread(err.to_string())
    }

    /// True for the validation tier: report and exit cleanly, the caller can
    /// re-invoke with corrected input. Everything else aborts the run.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidArgument(_) | Error::InvalidSize { .. })
    }
}
