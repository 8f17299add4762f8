//! Error types for the playback session

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Play was requested but there is nothing to play
    #[error("Queue is empty")]
    EmptyQueue,

    /// A caller supplied an index outside the queue
    #[error("Index {index} out of bounds for queue of length {len}")]
    InvalidIndex {
        /// Requested index
        index: usize,
        /// Queue length at the time of the request
        len: usize,
    },

    /// The renderer could not be created or prepared
    #[error("Renderer setup failed: {0}")]
    RendererSetupFailed(String),

    /// The renderer failed while decoding or controlling output
    #[error("Renderer decode error (code {code})")]
    RendererDecodeError {
        /// Renderer-specific error code
        code: i32,
    },

    /// The last-played record could not be written
    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    /// The session worker is no longer running
    #[error("Playback session is closed")]
    SessionClosed,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

/// Errors reported by a `Renderer` or `RendererFactory`
#[derive(Debug, Error)]
pub enum RendererError {
    /// The resource could not be opened
    #[error("Failed to open resource: {0}")]
    Open(String),

    /// The output device failed
    #[error("Output device error: {0}")]
    Device(String),

    /// Decoding failed
    #[error("Decode error: {0}")]
    Decode(String),

    /// The renderer was already released
    #[error("Renderer already released")]
    Released,
}

impl RendererError {
    /// Numeric code reported through `RendererEvent::Error`
    pub fn code(&self) -> i32 {
        match self {
            Self::Open(_) => 1,
            Self::Device(_) => 2,
            Self::Decode(_) => 3,
            Self::Released => 4,
        }
    }
}
