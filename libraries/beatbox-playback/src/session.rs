//! Playback session - core state machine
//!
//! Owns the queue, the position within it, the play/pause flag and the single
//! live renderer. Every command and every renderer callback goes through
//! `handle`, one message at a time; nothing here is shared with another
//! thread.
//!
//! Starting a track is asynchronous:
//! 1. release the previously bound renderer (bounded by `release_timeout_ms`)
//! 2. bump the renderer epoch
//! 3. open a renderer for the track and request preparation
//! 4. wait for an epoch-tagged `Ready`, `Completed` or `Error` message
//!
//! A callback whose epoch does not match the bound renderer is stale (the
//! session moved on while it was in flight) and is dropped without touching
//! state or the control surface.

use crate::{
    command::Command,
    error::{PlaybackError, RendererError, Result},
    events::SessionEvent,
    queue::Queue,
    renderer::{Epoch, Renderer, RendererCallbacks, RendererEvent, RendererFactory},
    surface::{ControlSurface, SurfaceState},
    types::{SessionConfig, SessionSnapshot},
};
use beatbox_core::{SessionStore, TrackDescriptor};
use crossbeam_channel::{bounded, Sender};
use std::ops::ControlFlow;
use std::thread;
use tracing::{debug, error, info, warn};

/// Messages processed by the session, strictly in arrival order
#[derive(Debug)]
pub enum Message {
    /// A command from the UI or a control surface
    Command {
        /// The command
        command: Command,
        /// Where to send the outcome, if the sender waits for it
        reply: Option<Sender<Result<()>>>,
    },

    /// A callback from a renderer
    Renderer {
        /// Epoch of the renderer that raised it
        epoch: Epoch,
        /// What happened
        event: RendererEvent,
    },

    /// Request for a point-in-time snapshot
    Snapshot {
        /// Where to send the snapshot
        reply: Sender<SessionSnapshot>,
    },

    /// Stop playback and end the worker loop
    Shutdown,
}

/// Session state as seen by the control surface
///
/// Invariants:
/// - `current_index`, if set, is a valid index into `queue`
/// - `playing` implies a live renderer bound to `queue[current_index]`
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    queue: Queue,
    current_index: Option<usize>,
    playing: bool,
    renderer_epoch: Epoch,
}

impl SessionState {
    /// Current queue
    pub fn queue(&self) -> &Queue {
        &self.queue
    }

    /// Position of the bound track
    pub fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    /// The bound track
    pub fn current_track(&self) -> Option<&TrackDescriptor> {
        self.current_index.and_then(|index| self.queue.get(index))
    }

    /// Whether the renderer confirmed it is emitting audio
    pub fn playing(&self) -> bool {
        self.playing
    }

    /// Epoch of the most recently created renderer
    pub fn renderer_epoch(&self) -> Epoch {
        self.renderer_epoch
    }

    #[cfg(test)]
    pub(crate) fn with(queue: Queue, current_index: Option<usize>, playing: bool) -> Self {
        Self {
            queue,
            current_index,
            playing,
            renderer_epoch: 0,
        }
    }
}

/// Lifecycle of the bound renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting for `Ready`; `autostart` is cleared by a Pause issued meanwhile
    Preparing { autostart: bool },

    /// Ready but output never started
    Prepared,

    /// Output started at least once (may be paused now)
    Started,
}

/// The one live renderer and what the session knows about it
struct Bound {
    renderer: Box<dyn Renderer>,
    epoch: Epoch,
    phase: Phase,
}

/// Playback session
pub struct PlaybackSession {
    state: SessionState,
    bound: Option<Bound>,
    factory: Box<dyn RendererFactory>,
    surface: Box<dyn ControlSurface>,
    store: Box<dyn SessionStore>,
    config: SessionConfig,
    inbox: Sender<Message>,
    observer: Option<Sender<SessionEvent>>,
}

impl PlaybackSession {
    /// Create an idle session
    ///
    /// `inbox` is where renderer callbacks are posted; whoever drives the
    /// session must feed messages from it back into `handle`.
    pub fn new(
        factory: Box<dyn RendererFactory>,
        surface: Box<dyn ControlSurface>,
        store: Box<dyn SessionStore>,
        config: SessionConfig,
        inbox: Sender<Message>,
    ) -> Self {
        Self {
            state: SessionState::default(),
            bound: None,
            factory,
            surface,
            store,
            config,
            inbox,
            observer: None,
        }
    }

    /// Send `SessionEvent`s to `observer`
    pub fn with_observer(mut self, observer: Sender<SessionEvent>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Current state
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Point-in-time snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            queue_len: self.state.queue.len(),
            current_index: self.state.current_index,
            current_track: self.state.current_track().cloned(),
            playing: self.state.playing,
            preparing: matches!(
                self.bound.as_ref().map(|bound| bound.phase),
                Some(Phase::Preparing { .. })
            ),
            renderer_epoch: self.state.renderer_epoch,
        }
    }

    /// Process one message to completion
    ///
    /// Returns `Break` after `Message::Shutdown`.
    pub fn handle(&mut self, message: Message) -> ControlFlow<()> {
        match message {
            Message::Command { command, reply } => {
                let result = self.execute(command);
                if let Some(reply) = reply {
                    let _ = reply.send(result);
                }
            }
            Message::Renderer { epoch, event } => self.on_renderer_event(epoch, event),
            Message::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            Message::Shutdown => {
                self.stop();
                return ControlFlow::Break(());
            }
        }
        ControlFlow::Continue(())
    }

    // ===== Commands =====

    /// Execute a command
    ///
    /// # Errors
    /// - `EmptyQueue` if Play has nothing to play
    /// - `InvalidIndex` if Play names a position outside the queue
    /// - `RendererSetupFailed`/`RendererDecodeError` if the renderer failed;
    ///   the session has already stopped when these are returned
    pub fn execute(&mut self, command: Command) -> Result<()> {
        let kind = command.kind();
        debug!("Command {} received", kind);

        let result = match command {
            Command::Play { queue, start_index } => self.play(queue, start_index),
            Command::Pause => self.pause(),
            Command::Next => self.next(),
            Command::Previous => self.previous(),
            Command::Stop => {
                self.stop();
                Ok(())
            }
        };

        if let Err(ref e) = result {
            warn!("Command {} failed: {}", kind, e);
            self.emit(SessionEvent::Notice(e.to_string()));
        }
        result
    }

    fn play(&mut self, queue: Option<Queue>, start_index: Option<usize>) -> Result<()> {
        let len = queue
            .as_ref()
            .map_or_else(|| self.state.queue.len(), Queue::len);
        if len == 0 {
            return Err(PlaybackError::EmptyQueue);
        }
        if let Some(index) = start_index {
            if index >= len {
                return Err(PlaybackError::InvalidIndex { index, len });
            }
        }

        if let Some(queue) = queue {
            self.replace_queue(queue);
        }

        if let Some(index) = start_index {
            // Selecting a track always restarts it, even if already bound
            self.state.current_index = Some(index);
            return self.start_current();
        }

        if self.bound.is_some() {
            return self.resume();
        }

        self.state.current_index = Some(0);
        self.start_current()
    }

    /// Swap in a new queue, keeping the bound track if it is still there
    fn replace_queue(&mut self, queue: Queue) {
        let relocated = self
            .state
            .current_track()
            .map(|track| queue.position_of(&track.id));

        debug!("Queue replaced ({} tracks)", queue.len());
        self.state.queue = queue;

        match relocated {
            None => {}
            Some(Some(index)) => {
                if self.state.current_index != Some(index) {
                    debug!(
                        "Bound track moved from {:?} to {}",
                        self.state.current_index, index
                    );
                }
                self.state.current_index = Some(index);
            }
            Some(None) => {
                info!("Bound track is not in the new queue; releasing renderer");
                self.teardown();
                self.state.current_index = None;
                self.state.playing = false;
            }
        }
    }

    fn resume(&mut self) -> Result<()> {
        let Some(bound) = self.bound.as_mut() else {
            return Ok(());
        };

        match bound.phase {
            Phase::Started if self.state.playing => {
                debug!("Play ignored: already playing");
                Ok(())
            }
            Phase::Started => {
                if let Err(e) = bound.renderer.resume() {
                    return Err(self.control_failed("resume", &e));
                }
                self.state.playing = true;
                self.render();
                self.emit(SessionEvent::StateChanged { playing: true });
                Ok(())
            }
            Phase::Prepared => self.start_output(),
            Phase::Preparing { .. } => {
                bound.phase = Phase::Preparing { autostart: true };
                debug!("Play while preparing: output starts when ready");
                Ok(())
            }
        }
    }

    fn pause(&mut self) -> Result<()> {
        let Some(bound) = self.bound.as_mut() else {
            debug!("Pause ignored: nothing bound");
            return Ok(());
        };

        if !self.state.playing {
            if bound.phase == (Phase::Preparing { autostart: true }) {
                bound.phase = Phase::Preparing { autostart: false };
                debug!("Pause while preparing: output will not start when ready");
            } else {
                debug!("Pause ignored: not playing");
            }
            return Ok(());
        }

        if let Err(e) = bound.renderer.pause() {
            return Err(self.control_failed("pause", &e));
        }
        self.state.playing = false;
        self.render();
        self.emit(SessionEvent::StateChanged { playing: false });
        Ok(())
    }

    fn next(&mut self) -> Result<()> {
        let Some(index) = self.state.queue.next_index(self.state.current_index) else {
            warn!("Next ignored: queue is empty");
            return Ok(());
        };
        self.state.current_index = Some(index);
        self.start_current()
    }

    fn previous(&mut self) -> Result<()> {
        let Some(index) = self.state.queue.previous_index(self.state.current_index) else {
            warn!("Previous ignored: queue is empty");
            return Ok(());
        };

        let threshold = self.config.restart_threshold_ms;
        if let Some(bound) = self.bound.as_mut() {
            let position = bound.renderer.current_position_ms();
            if position > threshold {
                info!("Restarting current track from {} ms", position);
                if let Err(e) = bound.renderer.seek_to(0) {
                    return Err(self.control_failed("seek", &e));
                }
                return Ok(());
            }
        }

        self.state.current_index = Some(index);
        self.start_current()
    }

    fn stop(&mut self) {
        info!("Stopping playback");
        self.teardown();
        self.state.playing = false;
        self.state.current_index = None;
        self.surface.retire();
        self.emit(SessionEvent::Stopped);
    }

    // ===== Track start protocol =====

    /// Bind a fresh renderer to `queue[current_index]` and request preparation
    fn start_current(&mut self) -> Result<()> {
        let Some(index) = self.state.current_index else {
            return Ok(());
        };
        let Some(track) = self.state.queue.get(index).cloned() else {
            let len = self.state.queue.len();
            self.state.current_index = None;
            return Err(PlaybackError::InvalidIndex { index, len });
        };

        self.teardown();
        self.state.playing = false;
        self.state.renderer_epoch += 1;
        let epoch = self.state.renderer_epoch;

        info!(
            "Starting track {} '{}' (renderer epoch {})",
            index, track.display_name, epoch
        );

        let mut renderer = match self.factory.open(&track.resource) {
            Ok(renderer) => renderer,
            Err(e) => {
                error!("Failed to open {}: {}", track.resource, e);
                return Err(self.fail(PlaybackError::RendererSetupFailed(e.to_string())));
            }
        };

        let callbacks = RendererCallbacks::new(epoch, self.inbox.clone());
        if let Err(e) = renderer.prepare_async(callbacks) {
            error!("Failed to prepare {}: {}", track.resource, e);
            renderer.release();
            return Err(self.fail(PlaybackError::RendererSetupFailed(e.to_string())));
        }

        self.bound = Some(Bound {
            renderer,
            epoch,
            phase: Phase::Preparing { autostart: true },
        });
        self.render();
        self.emit(SessionEvent::TrackChanged { index, track });
        Ok(())
    }

    /// Start output on a prepared renderer
    fn start_output(&mut self) -> Result<()> {
        let Some(bound) = self.bound.as_mut() else {
            return Ok(());
        };
        if let Err(e) = bound.renderer.start() {
            return Err(self.control_failed("start", &e));
        }
        bound.phase = Phase::Started;
        self.state.playing = true;

        if let Some(track) = self.state.current_track() {
            info!("Playing '{}' by {}", track.display_name, track.artist());
        }
        self.persist_current();
        self.render();
        self.emit(SessionEvent::StateChanged { playing: true });
        Ok(())
    }

    // ===== Renderer callbacks =====

    /// Handle an epoch-tagged renderer callback
    pub fn on_renderer_event(&mut self, epoch: Epoch, event: RendererEvent) {
        let live = self.bound.as_ref().is_some_and(|bound| bound.epoch == epoch);
        if !live {
            debug!(
                "Discarding stale {:?} from renderer epoch {} (current epoch {})",
                event, epoch, self.state.renderer_epoch
            );
            return;
        }

        match event {
            RendererEvent::Ready => self.on_ready(),
            RendererEvent::Completed => {
                info!("Track completed, advancing");
                if let Err(e) = self.next() {
                    self.emit(SessionEvent::Notice(e.to_string()));
                }
            }
            RendererEvent::Error { code } => {
                error!("Renderer epoch {} reported error code {}", epoch, code);
                let e = self.fail(PlaybackError::RendererDecodeError { code });
                self.emit(SessionEvent::Notice(e.to_string()));
            }
        }
    }

    fn on_ready(&mut self) {
        let Some(bound) = self.bound.as_mut() else {
            return;
        };
        let epoch = bound.epoch;

        match bound.phase {
            Phase::Preparing { autostart: true } => {
                if let Err(e) = self.start_output() {
                    self.emit(SessionEvent::Notice(e.to_string()));
                }
            }
            Phase::Preparing { autostart: false } => {
                bound.phase = Phase::Prepared;
                info!("Renderer epoch {} prepared; waiting for play", epoch);
            }
            Phase::Prepared | Phase::Started => {
                debug!("Duplicate ready from renderer epoch {} ignored", epoch);
            }
        }
    }

    // ===== Internal =====

    /// A synchronous renderer control call failed; stop the session
    fn control_failed(&mut self, operation: &str, e: &RendererError) -> PlaybackError {
        error!("Renderer {} failed: {}", operation, e);
        self.fail(PlaybackError::RendererDecodeError { code: e.code() })
    }

    /// Release the renderer, show the stopped state, then stop the session
    ///
    /// Never retries the track and never skips ahead.
    fn fail(&mut self, error: PlaybackError) -> PlaybackError {
        self.teardown();
        self.state.playing = false;
        if self.state.current_index.is_some() {
            self.render();
        }
        self.state.current_index = None;
        self.surface.retire();
        self.emit(SessionEvent::Stopped);
        error
    }

    /// Stop and release the bound renderer, waiting at most `release_timeout_ms`
    fn teardown(&mut self) {
        let Some(Bound {
            mut renderer,
            epoch,
            ..
        }) = self.bound.take()
        else {
            return;
        };

        let timeout = self.config.release_timeout();
        let (done_tx, done_rx) = bounded::<()>(1);

        let spawned = thread::Builder::new()
            .name(format!("beatbox-release-{epoch}"))
            .spawn(move || {
                if let Err(e) = renderer.stop() {
                    debug!("Renderer epoch {} stop during teardown: {}", epoch, e);
                }
                renderer.release();
                let _ = done_tx.send(());
            });

        if let Err(e) = spawned {
            error!("Could not spawn release thread for renderer epoch {}: {}", epoch, e);
            return;
        }

        match done_rx.recv_timeout(timeout) {
            Ok(()) => debug!("Renderer epoch {} released", epoch),
            Err(_) => error!(
                "Renderer epoch {} did not release within {:?}; discarding it",
                epoch, timeout
            ),
        }
    }

    fn persist_current(&self) {
        let Some(track) = self.state.current_track() else {
            return;
        };
        if let Err(e) = self.store.put(&track.display_name, track.artist()) {
            warn!("{}", PlaybackError::PersistenceFailed(e.to_string()));
        }
    }

    fn render(&mut self) {
        let projected = SurfaceState::project(&self.state);
        self.surface.render(&projected);
    }

    fn emit(&self, event: SessionEvent) {
        if let Some(observer) = &self.observer {
            if observer.try_send(event).is_err() {
                debug!("Session observer full or gone; event dropped");
            }
        }
    }
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        self.teardown();
    }
}
