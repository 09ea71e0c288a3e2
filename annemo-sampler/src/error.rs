//! Error types for the ingest client

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status; `message` is the server's `{"message"}` body when present
    #[error("Ingest service rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Rating already submitted")]
    AlreadySubmitted,
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Rejected { status, .. } => Some(*status),
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::AlreadySubmitted => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
