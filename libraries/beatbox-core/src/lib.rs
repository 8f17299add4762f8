//! BeatBox Core
//!
//! Platform-agnostic domain types, collaborator traits, and error handling
//! shared by every BeatBox crate.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `TrackDescriptor`, `TrackId`, `ResourceHandle`, `LastPlayed`
//! - **Collaborator Traits**: `TrackCatalog` (what can be played) and
//!   `SessionStore` (what was played last)
//! - **Error Handling**: Unified `BeatboxError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use beatbox_core::{ResourceHandle, TrackDescriptor, TrackId, UNKNOWN_ARTIST};
//!
//! let track = TrackDescriptor::new(
//!     TrackId::new("42"),
//!     "Blue in Green",
//!     ResourceHandle::new("/music/blue-in-green.flac"),
//! );
//!
//! assert_eq!(track.artist(), UNKNOWN_ARTIST);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod traits;
pub mod types;

pub use error::{BeatboxError, Result};
pub use traits::{SessionStore, TrackCatalog};
pub use types::{LastPlayed, ResourceHandle, TrackDescriptor, TrackId, UNKNOWN_ARTIST};
