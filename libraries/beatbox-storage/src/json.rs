//! JSON file session store

use crate::{Result, StorageError};
use beatbox_core::{LastPlayed, SessionStore};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use tracing::{debug, warn};

/// What is kept on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    /// Display name of the track
    pub last_track_name: String,

    /// Artist of the track
    pub last_track_artist: String,

    /// When the track started
    pub played_at: DateTime<Utc>,
}

impl From<StoredRecord> for LastPlayed {
    fn from(record: StoredRecord) -> Self {
        LastPlayed::new(record.last_track_name, record.last_track_artist)
    }
}

/// Session store backed by a single JSON file
///
/// Writes go to a sibling temporary file that is then renamed over the
/// target, so readers see either the old record or the new one.
#[derive(Debug)]
pub struct JsonSessionStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonSessionStore {
    /// Create a store at `path`; nothing is touched until the first write
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Location of the record
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a record stamped with the current time
    ///
    /// # Errors
    /// Returns an error if the directory or file cannot be written.
    pub fn write_record(&self, name: &str, artist: &str) -> Result<()> {
        let record = StoredRecord {
            last_track_name: name.to_string(),
            last_track_artist: artist.to_string(),
            played_at: Utc::now(),
        };
        let json = serde_json::to_vec_pretty(&record)?;

        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.temp_path()?;
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;

        debug!("Last played record written to {}", self.path.display());
        Ok(())
    }

    /// Read the stored record
    ///
    /// `Ok(None)` when nothing was written yet.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn read_record(&self) -> Result<Option<StoredRecord>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| StorageError::InvalidPath(self.path.display().to_string()))?;

        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(".tmp");
        Ok(self.path.with_file_name(tmp_name))
    }
}

impl SessionStore for JsonSessionStore {
    fn put(&self, last_track_name: &str, last_track_artist: &str) -> beatbox_core::Result<()> {
        Ok(self.write_record(last_track_name, last_track_artist)?)
    }

    fn get(&self) -> beatbox_core::Result<LastPlayed> {
        match self.read_record() {
            Ok(record) => Ok(record.map(LastPlayed::from).unwrap_or_default()),
            Err(e) => {
                warn!(
                    "Ignoring unreadable last played record {}: {}",
                    self.path.display(),
                    e
                );
                Ok(LastPlayed::default())
            }
        }
    }
}
