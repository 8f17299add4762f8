/// Collaborator traits consumed by the playback session
use crate::error::Result;
use crate::types::{LastPlayed, TrackDescriptor};

/// Source of playable tracks
///
/// Implementers query some index of local media (a directory walk, a
/// platform media database, ...) and return the tracks in display order.
pub trait TrackCatalog: Send + Sync {
    /// List every playable track
    ///
    /// An empty vector means "no tracks", not an error.
    ///
    /// # Errors
    /// Returns `BeatboxError::PermissionDenied` if the index cannot be read
    /// and `BeatboxError::QueryFailed` if the query itself fails.
    fn scan(&self) -> Result<Vec<TrackDescriptor>>;
}

/// Durable record of the last successfully started track
///
/// Writes are best-effort: the playback session logs and swallows any
/// error returned from `put`.
pub trait SessionStore: Send + Sync {
    /// Record the display name and artist of the track that just started
    ///
    /// # Errors
    /// Returns an error if the record could not be written.
    fn put(&self, last_track_name: &str, last_track_artist: &str) -> Result<()>;

    /// Read back the last record
    ///
    /// # Errors
    /// Returns an error if the backing location exists but cannot be read.
    fn get(&self) -> Result<LastPlayed>;
}
