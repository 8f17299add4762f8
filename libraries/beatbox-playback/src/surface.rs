//! Control surface projection
//!
//! A control surface (system notification, terminal status line, ...) is a
//! rendering of session state plus a place to dispatch commands from. The
//! projection is a pure function: same state in, same `SurfaceState` out.

use crate::command::CommandKind;
use crate::session::SessionState;

/// Title shown when no track is bound
pub const IDLE_TITLE: &str = "BeatBox";

/// Subtitle shown when no track is bound
pub const IDLE_SUBTITLE: &str = "Not playing";

/// Persistent control affordance driven by the session
pub trait ControlSurface: Send {
    /// Show `state`
    ///
    /// Must be idempotent: rendering the same state twice has the same
    /// visible result as rendering it once.
    fn render(&mut self, state: &SurfaceState);

    /// Stop showing the surface as ongoing (session stopped)
    fn retire(&mut self);
}

/// What a control surface displays
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SurfaceState {
    /// Track title
    pub title: String,

    /// Artist line
    pub subtitle: String,

    /// Whether audio is being emitted
    pub is_playing: bool,

    /// Whether the surface resists dismissal
    pub show_ongoing: bool,
}

impl SurfaceState {
    /// Project the session state
    pub fn project(state: &SessionState) -> Self {
        let (title, subtitle) = match state.current_track() {
            Some(track) => (track.display_name.clone(), track.artist().to_string()),
            None => (IDLE_TITLE.to_string(), IDLE_SUBTITLE.to_string()),
        };

        Self {
            title,
            subtitle,
            is_playing: state.playing(),
            show_ongoing: state.playing(),
        }
    }

    /// Command dispatched by the play/pause affordance
    pub fn toggle_action(&self) -> CommandKind {
        if self.is_playing {
            CommandKind::Pause
        } else {
            CommandKind::Play
        }
    }

    /// Affordances in display order: previous, play/pause, next
    pub fn actions(&self) -> [CommandKind; 3] {
        [CommandKind::Previous, self.toggle_action(), CommandKind::Next]
    }
}
