//! Command vocabulary shared by the foreground UI and the control surface

use crate::queue::Queue;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A command processed by the playback session
#[derive(Debug, Clone)]
pub enum Command {
    /// Start or resume playback
    ///
    /// `queue` replaces the current queue atomically when present.
    /// `start_index` restarts playback at that position, even if it is the
    /// track that is already bound.
    Play {
        /// Replacement queue
        queue: Option<Queue>,
        /// Position to start at
        start_index: Option<usize>,
    },

    /// Pause playback
    Pause,

    /// Skip to next track (wraps to the first)
    Next,

    /// Restart the current track or go to the previous one (wraps to the last)
    Previous,

    /// Stop playback and release the renderer
    Stop,
}

impl Command {
    /// Plain resume, as sent by a control surface button
    pub fn resume() -> Self {
        Self::Play {
            queue: None,
            start_index: None,
        }
    }

    /// The identifier of this command
    pub fn kind(&self) -> CommandKind {
        match self {
            Self::Play { .. } => CommandKind::Play,
            Self::Pause => CommandKind::Pause,
            Self::Next => CommandKind::Next,
            Self::Previous => CommandKind::Previous,
            Self::Stop => CommandKind::Stop,
        }
    }
}

impl From<CommandKind> for Command {
    fn from(kind: CommandKind) -> Self {
        match kind {
            CommandKind::Play => Self::resume(),
            CommandKind::Pause => Self::Pause,
            CommandKind::Next => Self::Next,
            CommandKind::Previous => Self::Previous,
            CommandKind::Stop => Self::Stop,
        }
    }
}

/// Stable identifier of a command
///
/// Out-of-process senders (notification buttons, scripts) address commands
/// by these strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommandKind {
    /// `ACTION_PLAY`
    #[serde(rename = "ACTION_PLAY")]
    Play,

    /// `ACTION_PAUSE`
    #[serde(rename = "ACTION_PAUSE")]
    Pause,

    /// `ACTION_NEXT`
    #[serde(rename = "ACTION_NEXT")]
    Next,

    /// `ACTION_PREV`
    #[serde(rename = "ACTION_PREV")]
    Previous,

    /// `ACTION_STOP`
    #[serde(rename = "ACTION_STOP")]
    Stop,
}

impl CommandKind {
    /// All identifiers, in control surface order
    pub const ALL: [CommandKind; 5] = [
        CommandKind::Previous,
        CommandKind::Play,
        CommandKind::Pause,
        CommandKind::Next,
        CommandKind::Stop,
    ];

    /// Stable wire identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Play => "ACTION_PLAY",
            Self::Pause => "ACTION_PAUSE",
            Self::Next => "ACTION_NEXT",
            Self::Previous => "ACTION_PREV",
            Self::Stop => "ACTION_STOP",
        }
    }

    /// Short human label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::Pause => "Pause",
            Self::Next => "Next",
            Self::Previous => "Previous",
            Self::Stop => "Stop",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CommandKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "ACTION_PLAY" | "play" => Ok(Self::Play),
            "ACTION_PAUSE" | "pause" => Ok(Self::Pause),
            "ACTION_NEXT" | "next" => Ok(Self::Next),
            "ACTION_PREV" | "prev" | "previous" => Ok(Self::Previous),
            "ACTION_STOP" | "stop" => Ok(Self::Stop),
            other => Err(format!("Unknown command: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_parse_back() {
        for kind in CommandKind::ALL {
            assert_eq!(kind.as_str().parse::<CommandKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.as_str());
        }
    }

    #[test]
    fn terminal_aliases_parse() {
        assert_eq!("prev".parse::<CommandKind>(), Ok(CommandKind::Previous));
        assert_eq!("previous".parse::<CommandKind>(), Ok(CommandKind::Previous));
        assert_eq!(" pause ".parse::<CommandKind>(), Ok(CommandKind::Pause));
        assert!("rewind".parse::<CommandKind>().is_err());
    }

    #[test]
    fn kind_round_trips_through_command() {
        for kind in CommandKind::ALL {
            assert_eq!(Command::from(kind).kind(), kind);
        }
    }

    #[test]
    fn resume_carries_no_queue_or_index() {
        match Command::resume() {
            Command::Play { queue, start_index } => {
                assert!(queue.is_none());
                assert!(start_index.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }
}
