/// Desktop renderer errors
use beatbox_playback::RendererError;
use thiserror::Error;

/// Result type for audio operations
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio errors
#[derive(Debug, Error)]
pub enum AudioError {
    /// File could not be opened
    #[error("Failed to open {0}")]
    Open(String),

    /// Container or codec not recognised
    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    /// Decoding failed mid-stream
    #[error("Decode error: {0}")]
    Decode(String),

    /// Device not found
    #[error("Audio device not found")]
    DeviceNotFound,

    /// Device error
    #[error("Device error: {0}")]
    DeviceError(String),

    /// Failed to build output stream
    #[error("Failed to build output stream: {0}")]
    StreamBuildError(String),

    /// Failed to play stream
    #[error("Failed to play stream: {0}")]
    PlayError(String),

    /// Failed to pause stream
    #[error("Failed to pause stream: {0}")]
    PauseError(String),

    /// Sample rate conversion error
    #[error("Sample rate conversion error: {0}")]
    ResampleError(String),

    /// The renderer was already released
    #[error("Renderer already released")]
    Released,
}

impl From<cpal::BuildStreamError> for AudioError {
    fn from(err: cpal::BuildStreamError) -> Self {
        AudioError::StreamBuildError(err.to_string())
    }
}

impl From<cpal::PlayStreamError> for AudioError {
    fn from(err: cpal::PlayStreamError) -> Self {
        AudioError::PlayError(err.to_string())
    }
}

impl From<cpal::PauseStreamError> for AudioError {
    fn from(err: cpal::PauseStreamError) -> Self {
        AudioError::PauseError(err.to_string())
    }
}

impl From<cpal::DefaultStreamConfigError> for AudioError {
    fn from(err: cpal::DefaultStreamConfigError) -> Self {
        AudioError::DeviceError(err.to_string())
    }
}

impl From<AudioError> for RendererError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::Open(_) | AudioError::UnsupportedFormat(_) => {
                RendererError::Open(err.to_string())
            }
            AudioError::Decode(_) | AudioError::ResampleError(_) => {
                RendererError::Decode(err.to_string())
            }
            AudioError::Released => RendererError::Released,
            AudioError::DeviceNotFound
            | AudioError::DeviceError(_)
            | AudioError::StreamBuildError(_)
            | AudioError::PlayError(_)
            | AudioError::PauseError(_) => RendererError::Device(err.to_string()),
        }
    }
}

impl AudioError {
    /// Code reported through `RendererCallbacks::error`
    pub fn code(&self) -> i32 {
        match self {
            AudioError::Open(_) | AudioError::UnsupportedFormat(_) => 1,
            AudioError::DeviceNotFound
            | AudioError::DeviceError(_)
            | AudioError::StreamBuildError(_)
            | AudioError::PlayError(_)
            | AudioError::PauseError(_) => 2,
            AudioError::Decode(_) | AudioError::ResampleError(_) => 3,
            AudioError::Released => 4,
        }
    }
}
