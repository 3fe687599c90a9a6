//! Error types for pagechat.

use thiserror::Error;

/// Result type alias using pagechat's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for pagechat operations.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP/network request failed before a response was received
    #[error("Request error: {0}")]
    Request(String),

    /// Backend returned a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Backend returned HTTP 429
    #[error("Too many requests. Please wait a moment before trying again.")]
    RateLimited,

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An exclusive operation is already in flight
    #[error("Session busy: {0}")]
    Busy(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
