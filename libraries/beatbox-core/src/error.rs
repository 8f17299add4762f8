/// Core error types for BeatBox
use thiserror::Error;

/// Result type alias using `BeatboxError`
pub type Result<T> = std::result::Result<T, BeatboxError>;

/// Core error type for BeatBox
#[derive(Error, Debug)]
pub enum BeatboxError {
    /// The catalog (or the store) was not allowed to read its backing location
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The catalog query could not be completed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Session store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl BeatboxError {
    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Create a query failed error
    pub fn query_failed(msg: impl Into<String>) -> Self {
        Self::QueryFailed(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
