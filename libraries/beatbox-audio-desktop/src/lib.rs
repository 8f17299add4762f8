//! Desktop renderer for BeatBox using CPAL and Symphonia
//!
//! Provides `DesktopRendererFactory`, the `RendererFactory` the playback
//! session uses on desktop.
//!
//! Each renderer runs two threads:
//! - a decode thread that opens the file (that is the asynchronous
//!   "prepare"), then keeps a short buffer of interleaved stereo `f32`
//!   filled, resampled to the device rate
//! - an output thread that owns the CPAL stream and drains the buffer
//!
//! Completion and errors are reported through `RendererCallbacks` at most
//! once per renderer.
//!
//! # Example
//!
//! ```no_run
//! use beatbox_audio_desktop::DesktopRendererFactory;
//! use beatbox_playback::RendererFactory;
//! use beatbox_core::ResourceHandle;
//!
//! let factory = DesktopRendererFactory::new();
//! let renderer = factory.open(&ResourceHandle::new("/music/so-what.flac"))?;
//! # Ok::<(), beatbox_playback::RendererError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod decoder;
mod error;
mod output;
mod renderer;
mod resample;
mod shared;

pub use decoder::TrackDecoder;
pub use error::{AudioError, Result};
pub use renderer::{DesktopRenderer, DesktopRendererFactory};
pub use resample::StereoResampler;
