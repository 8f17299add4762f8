//! In-memory session store

use beatbox_core::{LastPlayed, SessionStore};
use std::sync::{Mutex, PoisonError};

/// Session store that forgets everything when the process exits
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    last: Mutex<LastPlayed>,
}

impl MemorySessionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn put(&self, last_track_name: &str, last_track_artist: &str) -> beatbox_core::Result<()> {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) =
            LastPlayed::new(last_track_name, last_track_artist);
        Ok(())
    }

    fn get(&self) -> beatbox_core::Result<LastPlayed> {
        Ok(self
            .last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }
}
