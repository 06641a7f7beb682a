//! Error types for the push relay

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input (missing field, negative timestamp, empty email)
    #[error("{0}")]
    Validation(String),

    /// Input that could not be parsed at all (non-numeric timestamp)
    #[error("{0}")]
    Parse(String),

    /// Unknown email, unknown session token or rejected credentials
    #[error("Not found")]
    NotFound,

    /// Wrong or already consumed activation token
    #[error("Token mismatch")]
    Mismatch,

    #[error("Email {0} is already registered")]
    Duplicate(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Whether this error is caused by the server rather than the caller's input
    pub fn is_internal(&self) -> bool {
        matches!(self, Error::Serialization(_) | Error::Internal(_))
    }
}
