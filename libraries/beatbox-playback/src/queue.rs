//! Immutable playback queue
//!
//! A queue is never edited in place. A new play command supplies a whole new
//! queue and the session swaps it in atomically, so anything holding the old
//! snapshot keeps seeing a consistent list.

use beatbox_core::{TrackDescriptor, TrackId};
use std::sync::Arc;

/// Ordered, shareable list of tracks
#[derive(Debug, Clone, Default)]
pub struct Queue {
    tracks: Arc<[TrackDescriptor]>,
}

impl Queue {
    /// Create a queue from tracks in play order
    pub fn new(tracks: Vec<TrackDescriptor>) -> Self {
        Self {
            tracks: tracks.into(),
        }
    }

    /// Number of tracks
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the queue has no tracks
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Track at `index`
    pub fn get(&self, index: usize) -> Option<&TrackDescriptor> {
        self.tracks.get(index)
    }

    /// Position of the track with `id`
    ///
    /// Matches on identity only; a different track with the same title is
    /// not found.
    pub fn position_of(&self, id: &TrackId) -> Option<usize> {
        self.tracks.iter().position(|track| &track.id == id)
    }

    /// Iterate tracks in play order
    pub fn iter(&self) -> impl Iterator<Item = &TrackDescriptor> {
        self.tracks.iter()
    }

    /// Index after `index`, wrapping to the start
    ///
    /// `None` (nothing bound) advances to the first track.
    pub fn next_index(&self, index: Option<usize>) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        Some(index.map_or(0, |i| (i + 1) % self.len()))
    }

    /// Index before `index`, wrapping to the end
    ///
    /// `None` (nothing bound) goes to the last track.
    pub fn previous_index(&self, index: Option<usize>) -> Option<usize> {
        if self.is_empty() {
            return None;
        }
        match index {
            Some(i) if i > 0 && i < self.len() => Some(i - 1),
            _ => Some(self.len() - 1),
        }
    }
}

impl From<Vec<TrackDescriptor>> for Queue {
    fn from(tracks: Vec<TrackDescriptor>) -> Self {
        Self::new(tracks)
    }
}

impl FromIterator<TrackDescriptor> for Queue {
    fn from_iter<I: IntoIterator<Item = TrackDescriptor>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beatbox_core::ResourceHandle;

    fn track(id: &str, title: &str) -> TrackDescriptor {
        TrackDescriptor::new(
            TrackId::new(id),
            title,
            ResourceHandle::new(format!("/music/{id}.mp3")),
        )
    }

    fn queue_of(n: usize) -> Queue {
        (0..n).map(|i| track(&i.to_string(), "Song")).collect()
    }

    #[test]
    fn next_wraps_to_start() {
        let queue = queue_of(3);
        assert_eq!(queue.next_index(Some(0)), Some(1));
        assert_eq!(queue.next_index(Some(2)), Some(0));
        assert_eq!(queue.next_index(None), Some(0));
    }

    #[test]
    fn previous_wraps_to_end() {
        let queue = queue_of(3);
        assert_eq!(queue.previous_index(Some(2)), Some(1));
        assert_eq!(queue.previous_index(Some(0)), Some(2));
        assert_eq!(queue.previous_index(None), Some(2));
    }

    #[test]
    fn empty_queue_has_no_neighbours() {
        let queue = Queue::default();
        assert_eq!(queue.next_index(Some(0)), None);
        assert_eq!(queue.previous_index(None), None);
    }

    #[test]
    fn position_of_matches_identity_not_title() {
        let queue = Queue::new(vec![track("a", "Intro"), track("b", "Intro")]);
        assert_eq!(queue.position_of(&TrackId::new("b")), Some(1));
        assert_eq!(queue.position_of(&TrackId::new("c")), None);
    }

    #[test]
    fn clones_share_the_same_tracks() {
        let queue = queue_of(4);
        let snapshot = queue.clone();
        assert!(Arc::ptr_eq(&queue.tracks, &snapshot.tracks));
    }
}
