//! BeatBox - Playback Session
//!
//! The playback queue and session state machine at the heart of BeatBox.
//!
//! This crate provides:
//! - A closed command vocabulary (`Play`, `Pause`, `Next`, `Previous`, `Stop`)
//!   with stable string identifiers for out-of-process senders
//! - An immutable, atomically replaced `Queue`
//! - `PlaybackSession`, which owns the single live `Renderer` and processes
//!   commands and renderer callbacks strictly one at a time
//! - Epoch-tagged renderer callbacks so that late events from a superseded
//!   renderer are discarded instead of resurrecting an old track
//! - A pure projection of session state onto a `ControlSurface`
//! - `SessionService`, a single-worker actor that hosts the session
//!
//! # Architecture
//!
//! `beatbox-playback` knows nothing about audio devices, files or terminals.
//! Decoding/output, the last-played store and the control surface are all
//! injected through traits (`RendererFactory`, `SessionStore`, `ControlSurface`).
//!
//! ```text
//!   UI ──┐                         ┌──> Renderer (one live instance)
//!        ├──> inbox ──> session ───┼──> ControlSurface
//!   CS ──┤     ^                   └──> SessionStore
//!        │     └──── epoch-tagged renderer callbacks
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use beatbox_core::SessionStore;
//! use beatbox_playback::{
//!     ControlSurface, Queue, RendererFactory, SessionConfig, SessionService,
//! };
//!
//! fn run(
//!     factory: Box<dyn RendererFactory>,
//!     surface: Box<dyn ControlSurface>,
//!     store: Box<dyn SessionStore>,
//!     queue: Queue,
//! ) -> beatbox_playback::Result<()> {
//!     let handle = SessionService::new(factory, surface, store)
//!         .with_config(SessionConfig::default())
//!         .spawn()?;
//!
//!     handle.play(Some(queue), Some(0))?;
//!     handle.pause()?;
//!     handle.next()?;
//!     handle.shutdown()
//! }
//! ```

mod command;
mod error;
mod events;
mod queue;
mod renderer;
mod service;
mod session;
mod surface;
pub mod types;

// Public exports
pub use command::{Command, CommandKind};
pub use error::{PlaybackError, RendererError, Result};
pub use events::SessionEvent;
pub use queue::Queue;
pub use renderer::{Epoch, Renderer, RendererCallbacks, RendererEvent, RendererFactory};
pub use service::{SessionHandle, SessionService};
pub use session::{Message, PlaybackSession, SessionState};
pub use surface::{ControlSurface, SurfaceState, IDLE_SUBTITLE, IDLE_TITLE};
pub use types::{SessionConfig, SessionSnapshot};
