//! Error types for log tailing operations.

use std::io;
use std::path::PathBuf;

/// Errors produced while reading or appending to the log file.
///
/// Every variant is scoped to the operation that produced it: a failed
/// follower ends only its own session and a failed append only skips
/// that record.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The log file could not be opened for reading.
    #[error("unable to open log file {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// An I/O failure after the file was successfully opened.
    #[error("failed to read log file: {0}")]
    Read(#[source] io::Error),

    /// The file became shorter than the bytes a follower already consumed.
    #[error("log file truncated to {len} bytes below read position {position}")]
    Truncated { position: u64, len: u64 },

    /// The producer could not open or append to the log file.
    #[error("failed to append to log file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type alias for log tailing operations.
pub type Result<T> = std::result::Result<T, Error>;
