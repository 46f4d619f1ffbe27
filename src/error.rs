//! Error types for the readaloud gateway

use thiserror::Error;

/// Result type alias for gateway operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the readaloud gateway
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error (missing credential, bad environment)
    #[error("configuration error: {0}")]
    Config(String),

    /// Required request input was absent or malformed
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Upstream speech API returned a non-success status
    #[error("speech API error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Local store error
    #[error("store error: {0}")]
    Store(String),

    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP error
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// `SQLite` error
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
