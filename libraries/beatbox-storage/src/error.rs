/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// The store path has no usable parent or file name
    #[error("Invalid store path: {0}")]
    InvalidPath(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl From<StorageError> for beatbox_core::BeatboxError {
    fn from(err: StorageError) -> Self {
        beatbox_core::BeatboxError::storage(err.to_string())
    }
}
