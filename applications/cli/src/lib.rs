//! BeatBox terminal front end
//!
//! Wires the catalog, the JSON session store and the desktop renderer into a
//! `SessionService` and drives it from stdin.

pub mod config;
pub mod input;
pub mod surface;

pub use config::{BeatboxConfig, ConfigError};
pub use input::{parse_line, Input};
pub use surface::{status_line, TerminalSurface};
