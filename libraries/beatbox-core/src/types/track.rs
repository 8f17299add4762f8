/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Artist shown when a track carries no artist tag
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Opaque locator a renderer can open
///
/// Usually a filesystem path, optionally written as a `file://` URI.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceHandle(String);

impl ResourceHandle {
    /// Create a handle from any locator string
    pub fn new(locator: impl Into<String>) -> Self {
        Self(locator.into())
    }

    /// Create a handle pointing at a local file
    pub fn from_path(path: &Path) -> Self {
        Self(path.to_string_lossy().into_owned())
    }

    /// Get the raw locator
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Interpret the locator as a local path
    ///
    /// Strips a leading `file://` scheme if present.
    pub fn to_path(&self) -> PathBuf {
        PathBuf::from(self.0.strip_prefix("file://").unwrap_or(&self.0))
    }
}

impl fmt::Display for ResourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Immutable description of one playable track
///
/// Created by a `TrackCatalog` at scan time and never mutated afterwards.
/// Equality and hashing use the `id` only: two descriptors with the same
/// title are still different tracks unless their ids match.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackDescriptor {
    /// Stable identity within a session
    pub id: TrackId,

    /// Title shown in lists and on the control surface
    pub display_name: String,

    /// Artist name, if tagged
    pub artist: Option<String>,

    /// Where the renderer reads audio from
    pub resource: ResourceHandle,

    /// Track duration in milliseconds, if known
    pub duration_ms: Option<u64>,
}

impl TrackDescriptor {
    /// Create a descriptor with no artist or duration
    pub fn new(id: TrackId, display_name: impl Into<String>, resource: ResourceHandle) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            artist: None,
            resource,
            duration_ms: None,
        }
    }

    /// Set the artist
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = Some(artist.into());
        self
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_ms = Some(duration.as_millis() as u64);
        self
    }

    /// Artist for display, falling back to `UNKNOWN_ARTIST`
    pub fn artist(&self) -> &str {
        self.artist.as_deref().unwrap_or(UNKNOWN_ARTIST)
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Option<Duration> {
        self.duration_ms.map(Duration::from_millis)
    }
}

impl PartialEq for TrackDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TrackDescriptor {}

impl Hash for TrackDescriptor {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn track(id: &str, title: &str) -> TrackDescriptor {
        TrackDescriptor::new(
            TrackId::new(id),
            title,
            ResourceHandle::new(format!("/music/{id}.mp3")),
        )
    }

    #[test]
    fn missing_artist_falls_back_to_sentinel() {
        let t = track("1", "Song");
        assert_eq!(t.artist(), UNKNOWN_ARTIST);

        let t = t.with_artist("Miles Davis");
        assert_eq!(t.artist(), "Miles Davis");
    }

    #[test]
    fn title_collision_is_not_the_same_track() {
        let a = track("1", "Intro");
        let b = track("2", "Intro");
        assert_ne!(a, b);
    }

    #[test]
    fn same_id_is_the_same_track_even_if_metadata_differs() {
        let a = track("1", "Intro");
        let b = track("1", "Intro (Remastered)").with_artist("Someone");
        assert_eq!(a, b);
    }

    #[test]
    fn file_uri_handle_resolves_to_path() {
        let handle = ResourceHandle::new("file:///music/a.flac");
        assert_eq!(handle.to_path(), PathBuf::from("/music/a.flac"));

        let handle = ResourceHandle::new("/music/b.flac");
        assert_eq!(handle.to_path(), PathBuf::from("/music/b.flac"));
    }

    #[test]
    fn duration_round_trips_through_millis() {
        let t = track("1", "Song").with_duration(Duration::from_secs(95));
        assert_eq!(t.duration_ms, Some(95_000));
        assert_eq!(t.duration(), Some(Duration::from_secs(95)));
    }
}
