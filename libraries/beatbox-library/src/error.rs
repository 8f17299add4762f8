/// Catalog errors
use std::path::Path;
use thiserror::Error;

/// Result type alias using `LibraryError`
pub type Result<T> = std::result::Result<T, LibraryError>;

/// Catalog error types
#[derive(Error, Debug)]
pub enum LibraryError {
    /// Directory not found
    #[error("Directory not found: {0}")]
    DirectoryNotFound(String),

    /// Path exists but is not a directory
    #[error("Not a directory: {0}")]
    NotADirectory(String),

    /// Directory cannot be read
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Directory walk failed
    #[error("Failed to walk {path}: {message}")]
    Walk {
        /// Directory being walked
        path: String,
        /// Underlying failure
        message: String,
    },
}

impl LibraryError {
    pub(crate) fn from_walk(root: &Path, err: &walkdir::Error) -> Self {
        let path = err
            .path()
            .unwrap_or(root)
            .display()
            .to_string();

        match err.io_error().map(std::io::Error::kind) {
            Some(std::io::ErrorKind::PermissionDenied) => Self::PermissionDenied(path),
            Some(std::io::ErrorKind::NotFound) => Self::DirectoryNotFound(path),
            _ => Self::Walk {
                path,
                message: err.to_string(),
            },
        }
    }
}

impl From<LibraryError> for beatbox_core::BeatboxError {
    fn from(err: LibraryError) -> Self {
        match err {
            LibraryError::PermissionDenied(_) => Self::permission_denied(err.to_string()),
            _ => Self::query_failed(err.to_string()),
        }
    }
}
