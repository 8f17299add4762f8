//! Directory-backed `TrackCatalog`

use crate::scanner::FileScanner;
use crate::tags::read_tags;
use crate::Result;
use beatbox_core::{ResourceHandle, TrackCatalog, TrackDescriptor, TrackId};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Clips at or below this length are not offered for playback
pub const DEFAULT_MIN_DURATION_MS: u64 = 30_000;

/// Catalog of the audio files found under a set of directories
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    directories: Vec<PathBuf>,
    min_duration: Duration,
    scanner: FileScanner,
}

impl DirectoryCatalog {
    /// Create a catalog over `directories`
    pub fn new(directories: Vec<PathBuf>) -> Self {
        Self {
            directories,
            min_duration: Duration::from_millis(DEFAULT_MIN_DURATION_MS),
            scanner: FileScanner::new(),
        }
    }

    /// Skip tracks whose known duration is at most `ms`
    pub fn min_duration_ms(mut self, ms: u64) -> Self {
        self.min_duration = Duration::from_millis(ms);
        self
    }

    /// Follow symbolic links while walking
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.scanner = self.scanner.follow_links(follow);
        self
    }

    /// Directories this catalog walks
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Walk every directory and build the sorted track list
    ///
    /// # Errors
    /// Returns the first directory-level failure.
    pub fn scan_tracks(&self) -> Result<Vec<TrackDescriptor>> {
        let mut seen = HashSet::new();
        let mut tracks = Vec::new();

        for directory in &self.directories {
            for path in self.scanner.scan_directory(directory)? {
                let Some(track) = self.describe(&path) else {
                    continue;
                };
                if seen.insert(track.id.clone()) {
                    tracks.push(track);
                }
            }
        }

        tracks.sort_by(|a, b| {
            a.display_name
                .to_lowercase()
                .cmp(&b.display_name.to_lowercase())
                .then_with(|| a.resource.as_str().cmp(b.resource.as_str()))
        });

        info!(
            "Catalog scan found {} tracks in {} directories",
            tracks.len(),
            self.directories.len()
        );
        Ok(tracks)
    }

    fn describe(&self, path: &Path) -> Option<TrackDescriptor> {
        let tags = read_tags(path);

        if let Some(duration) = tags.duration {
            if duration <= self.min_duration {
                debug!(
                    "Skipping {} ({} ms is too short)",
                    path.display(),
                    duration.as_millis()
                );
                return None;
            }
        }

        let title = tags.title.unwrap_or_else(|| {
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string())
        });

        let mut track =
            TrackDescriptor::new(track_id_for(path), title, ResourceHandle::from_path(path));
        if let Some(artist) = tags.artist {
            track = track.with_artist(artist);
        }
        if let Some(duration) = tags.duration {
            track = track.with_duration(duration);
        }
        Some(track)
    }
}

impl TrackCatalog for DirectoryCatalog {
    fn scan(&self) -> beatbox_core::Result<Vec<TrackDescriptor>> {
        Ok(self.scan_tracks()?)
    }
}

/// Stable id for the file at `path`
///
/// Hash of the canonical path, so `./a.mp3` and `/music/a.mp3` agree.
pub fn track_id_for(path: &Path) -> TrackId {
    let canonical = path
        .canonicalize()
        .unwrap_or_else(|_| path.to_path_buf());

    let mut hasher = Sha256::new();
    hasher.update(canonical.to_string_lossy().as_bytes());
    let digest = hasher.finalize();

    TrackId::new(hex::encode(&digest[..16]))
}
