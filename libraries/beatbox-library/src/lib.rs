//! BeatBox Library
//!
//! Builds the list of playable tracks from local directories.
//!
//! `DirectoryCatalog` walks the configured directories, reads tags with lofty
//! and returns `TrackDescriptor`s sorted by title. It implements
//! `beatbox_core::TrackCatalog`, so the playback session never sees a path
//! walk or a tag reader directly.
//!
//! # Example
//!
//! ```rust,no_run
//! use beatbox_core::TrackCatalog;
//! use beatbox_library::DirectoryCatalog;
//!
//! let catalog = DirectoryCatalog::new(vec!["/home/me/Music".into()])
//!     .min_duration_ms(30_000);
//!
//! for (index, track) in catalog.scan()?.iter().enumerate() {
//!     println!("{}. {} - {}", index, track.display_name, track.artist());
//! }
//! # Ok::<(), beatbox_core::BeatboxError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod error;
mod scanner;
mod tags;

pub use catalog::{track_id_for, DirectoryCatalog, DEFAULT_MIN_DURATION_MS};
pub use error::{LibraryError, Result};
pub use scanner::{is_audio_file, FileScanner, SUPPORTED_EXTENSIONS};
pub use tags::{read_tags, TrackTags};
