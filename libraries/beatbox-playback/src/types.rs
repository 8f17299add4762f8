//! Core types for the playback session

use beatbox_core::TrackDescriptor;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the playback session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Elapsed position above which Previous restarts the current track
    /// instead of changing track (default: 3000)
    pub restart_threshold_ms: u64,

    /// How long teardown waits for a renderer to release before discarding
    /// it (default: 2000)
    pub release_timeout_ms: u64,
}

impl SessionConfig {
    /// Restart threshold as a Duration
    pub fn restart_threshold(&self) -> Duration {
        Duration::from_millis(self.restart_threshold_ms)
    }

    /// Release timeout as a Duration
    pub fn release_timeout(&self) -> Duration {
        Duration::from_millis(self.release_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            restart_threshold_ms: 3000,
            release_timeout_ms: 2000,
        }
    }
}

/// Point-in-time view of the session, safe to hand to other threads
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Number of tracks in the queue
    pub queue_len: usize,

    /// Position of the bound track
    pub current_index: Option<usize>,

    /// The bound track
    pub current_track: Option<TrackDescriptor>,

    /// Whether audio is being emitted
    pub playing: bool,

    /// Whether a renderer is bound but not yet prepared
    pub preparing: bool,

    /// Epoch of the most recently created renderer
    pub renderer_epoch: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = SessionConfig::default();
        assert_eq!(config.restart_threshold(), Duration::from_secs(3));
        assert_eq!(config.release_timeout(), Duration::from_secs(2));
    }

    #[test]
    fn empty_snapshot_is_idle() {
        let snapshot = SessionSnapshot::default();
        assert_eq!(snapshot.current_index, None);
        assert!(!snapshot.playing);
        assert!(!snapshot.preparing);
    }
}
