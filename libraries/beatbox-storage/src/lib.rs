//! BeatBox Storage
//!
//! Durable "last played" record for BeatBox.
//!
//! Two `SessionStore` implementations:
//! - `JsonSessionStore`: a small JSON document on disk, replaced atomically
//!   on every write
//! - `MemorySessionStore`: process-local, for tests and `--no-persist`
//!
//! # Example
//!
//! ```rust,no_run
//! use beatbox_core::SessionStore;
//! use beatbox_storage::JsonSessionStore;
//!
//! let store = JsonSessionStore::new("./data/last_played.json");
//! store.put("So What", "Miles Davis")?;
//!
//! let last = store.get()?;
//! assert_eq!(last.name.as_deref(), Some("So What"));
//! # Ok::<(), beatbox_core::BeatboxError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod error;
mod json;
mod memory;

pub use error::{Result, StorageError};
pub use json::{JsonSessionStore, StoredRecord};
pub use memory::MemorySessionStore;
