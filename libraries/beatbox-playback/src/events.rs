//! Session Events
//!
//! Emitted for observers (the foreground UI) after the session state has
//! changed. Observers never feed back into the session state.

use beatbox_core::TrackDescriptor;

/// Events emitted by the playback session
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A new track was bound to a fresh renderer (preparing)
    TrackChanged {
        /// Queue position of the track
        index: usize,
        /// The track itself
        track: TrackDescriptor,
    },

    /// Output started or paused
    StateChanged {
        /// Whether audio is being emitted
        playing: bool,
    },

    /// The session stopped and released its renderer
    Stopped,

    /// Transient, user-facing feedback (empty queue, renderer failure)
    Notice(String),
}
