//! Common error types for Annemo

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for Annemo operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the ingest service and its clients
#[derive(Error, Debug)]
pub enum Error {
    /// Registry or settings could not be loaded; fatal at startup
    #[error("Configuration invalid: {0}")]
    ConfigInvalid(String),

    /// Subject is not listed in the registry
    #[error("Unknown subject: {0}")]
    UnknownSubject(String),

    /// Sample failed validation (range, finiteness, envelope mismatch)
    #[error("Invalid sample: {0}")]
    InvalidSample(String),

    /// Appending a record to a log file failed
    #[error("Write to {} failed: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Deletion or export target is not an acceptable log file name
    #[error("Invalid deletion target: {0}")]
    InvalidDeletionTarget(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// True for errors caused by the caller's input rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownSubject(_)
                | Error::InvalidSample(_)
                | Error::InvalidDeletionTarget(_)
                | Error::NotFound(_)
        )
    }
}
