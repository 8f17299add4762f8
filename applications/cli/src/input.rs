//! Interactive commands read from stdin

use beatbox_playback::{Command, CommandKind};

/// One parsed line of terminal input
#[derive(Debug)]
pub enum Input {
    /// Forward to the session
    Session(Command),
    /// Print the session snapshot
    Status,
    /// Scan the library again and swap the fresh queue in
    Rescan,
    /// Shut down and exit
    Quit,
    /// Blank line
    Nothing,
}

/// Parse a line typed at the prompt
///
/// Accepts `play [N]`, `pause`, `next`, `prev`, `stop`, `status`, `rescan`,
/// `quit` and the `ACTION_*` identifiers.
pub fn parse_line(line: &str) -> Result<Input, String> {
    let mut words = line.split_whitespace();
    let Some(word) = words.next() else {
        return Ok(Input::Nothing);
    };
    let arg = words.next();
    if words.next().is_some() {
        return Err(format!("Too many arguments: {}", line.trim()));
    }

    match (word, arg) {
        ("status", None) => Ok(Input::Status),
        ("rescan", None) => Ok(Input::Rescan),
        ("quit" | "exit", None) => Ok(Input::Quit),
        ("play", Some(index)) => {
            let index = index
                .parse::<usize>()
                .map_err(|_| format!("Not a track index: {index}"))?;
            Ok(Input::Session(Command::Play {
                queue: None,
                start_index: Some(index),
            }))
        }
        (word, None) => word
            .parse::<CommandKind>()
            .map(|kind| Input::Session(kind.into())),
        (word, Some(_)) => Err(format!("{word} takes no argument")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(line: &str) -> CommandKind {
        match parse_line(line) {
            Ok(Input::Session(command)) => command.kind(),
            other => panic!("{line:?} parsed as {other:?}"),
        }
    }

    #[test]
    fn terminal_words_and_identifiers() {
        assert_eq!(kind("pause"), CommandKind::Pause);
        assert_eq!(kind("next"), CommandKind::Next);
        assert_eq!(kind("prev"), CommandKind::Previous);
        assert_eq!(kind("stop"), CommandKind::Stop);
        assert_eq!(kind("ACTION_PREV"), CommandKind::Previous);
        assert_eq!(kind("  ACTION_PLAY  "), CommandKind::Play);
    }

    #[test]
    fn bare_play_resumes() {
        match parse_line("play") {
            Ok(Input::Session(Command::Play { queue, start_index })) => {
                assert!(queue.is_none());
                assert_eq!(start_index, None);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn play_with_index_restarts_there() {
        match parse_line("play 3") {
            Ok(Input::Session(Command::Play { queue, start_index })) => {
                assert!(queue.is_none());
                assert_eq!(start_index, Some(3));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn local_commands() {
        assert!(matches!(parse_line("status"), Ok(Input::Status)));
        assert!(matches!(parse_line("rescan"), Ok(Input::Rescan)));
        assert!(parse_line("rescan now").is_err());
        assert!(matches!(parse_line("quit"), Ok(Input::Quit)));
        assert!(matches!(parse_line("   "), Ok(Input::Nothing)));
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_line("rewind").is_err());
        assert!(parse_line("play three").is_err());
        assert!(parse_line("play -1").is_err());
        assert!(parse_line("pause 2").is_err());
        assert!(parse_line("play 1 2").is_err());
    }
}
