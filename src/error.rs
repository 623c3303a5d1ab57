//! Error types for qqwry.

use thiserror::Error;

/// Error type for qqwry operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Buffer too short to hold the header
    #[error("invalid header size: expected {expected}, got {actual}")]
    InvalidHeaderSize { expected: usize, actual: usize },

    /// Header or index is malformed
    #[error("corrupt database: {0}")]
    CorruptDatabase(String),

    /// Query string is not a valid IPv4 address
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for qqwry operations.
pub type Result<T> = std::result::Result<T, Error>;
