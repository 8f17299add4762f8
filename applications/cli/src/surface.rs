//! Terminal control surface
//!
//! One status line per distinct render on stdout. Logs go to stderr, so the
//! two never interleave on the same stream.

use beatbox_playback::{ControlSurface, SurfaceState};
use std::io::{self, Write};
use tracing::warn;

/// Prints session state as status lines
pub struct TerminalSurface<W: Write + Send> {
    out: W,
    last: Option<SurfaceState>,
}

impl TerminalSurface<io::Stdout> {
    /// Surface writing to stdout
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self { out, last: None }
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_line(&mut self, line: &str) {
        if let Err(e) = writeln!(self.out, "{line}").and_then(|()| self.out.flush()) {
            warn!("Control surface write failed: {}", e);
        }
    }
}

/// Format one status line
pub fn status_line(state: &SurfaceState) -> String {
    let icon = if state.is_playing { "▶" } else { "⏸" };
    format!(
        "{} {} - {}  [{}]",
        icon,
        state.title,
        state.subtitle,
        state.toggle_action().label().to_lowercase()
    )
}

impl<W: Write + Send> ControlSurface for TerminalSurface<W> {
    fn render(&mut self, state: &SurfaceState) {
        if self.last.as_ref() == Some(state) {
            return;
        }
        let line = status_line(state);
        self.write_line(&line);
        self.last = Some(state.clone());
    }

    fn retire(&mut self) {
        // Nothing shown since the last retire
        if self.last.take().is_some() {
            self.write_line("■ stopped");
        }
    }
}
