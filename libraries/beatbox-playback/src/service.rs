//! Session service
//!
//! Hosts a `PlaybackSession` on a dedicated worker thread. Commands from any
//! number of `SessionHandle`s and callbacks from renderer threads land in one
//! unbounded inbox and are processed strictly in order.

use crate::{
    command::Command,
    error::{PlaybackError, Result},
    events::SessionEvent,
    queue::Queue,
    renderer::RendererFactory,
    session::{Message, PlaybackSession},
    surface::ControlSurface,
    types::{SessionConfig, SessionSnapshot},
};
use beatbox_core::SessionStore;
use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use tracing::{debug, error, info};

/// Builder for the session worker
pub struct SessionService {
    factory: Box<dyn RendererFactory>,
    surface: Box<dyn ControlSurface>,
    store: Box<dyn SessionStore>,
    config: SessionConfig,
    observer: Option<Sender<SessionEvent>>,
}

impl SessionService {
    /// Create a service with default configuration
    pub fn new(
        factory: Box<dyn RendererFactory>,
        surface: Box<dyn ControlSurface>,
        store: Box<dyn SessionStore>,
    ) -> Self {
        Self {
            factory,
            surface,
            store,
            config: SessionConfig::default(),
            observer: None,
        }
    }

    /// Override the session configuration
    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Receive `SessionEvent`s on `observer`
    pub fn with_observer(mut self, observer: Sender<SessionEvent>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Start the worker thread
    ///
    /// # Errors
    /// Returns an error if the thread cannot be spawned.
    pub fn spawn(self) -> Result<SessionHandle> {
        let (inbox, messages) = unbounded();

        let mut session = PlaybackSession::new(
            self.factory,
            self.surface,
            self.store,
            self.config,
            inbox.clone(),
        );
        if let Some(observer) = self.observer {
            session = session.with_observer(observer);
        }

        let worker = thread::Builder::new()
            .name("beatbox-session".to_string())
            .spawn(move || run(session, &messages))?;

        Ok(SessionHandle {
            inner: Arc::new(HandleInner {
                inbox,
                worker: Mutex::new(Some(worker)),
            }),
        })
    }
}

fn run(mut session: PlaybackSession, messages: &Receiver<Message>) {
    info!("Playback session started");
    while let Ok(message) = messages.recv() {
        if session.handle(message).is_break() {
            break;
        }
    }
    info!("Playback session stopped");
}

struct HandleInner {
    inbox: Sender<Message>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl HandleInner {
    fn join(&self) {
        let worker = match self.worker.lock() {
            Ok(mut guard) => guard.take(),
            Err(_) => return,
        };
        if let Some(worker) = worker {
            if worker.join().is_err() {
                error!("Playback session worker panicked");
            }
        }
    }
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        let _ = self.inbox.send(Message::Shutdown);
        self.join();
    }
}

/// Cloneable handle to a running session
///
/// The worker shuts down when `shutdown` is called or the last handle is
/// dropped.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<HandleInner>,
}

impl SessionHandle {
    /// Queue a command without waiting for it to run
    ///
    /// # Errors
    /// Returns `SessionClosed` if the worker has exited.
    pub fn send(&self, command: Command) -> Result<()> {
        self.inner
            .inbox
            .send(Message::Command {
                command,
                reply: None,
            })
            .map_err(|_| PlaybackError::SessionClosed)
    }

    /// Run a command and wait for its outcome
    ///
    /// # Errors
    /// Returns the command's own error, or `SessionClosed` if the worker has
    /// exited.
    pub fn execute(&self, command: Command) -> Result<()> {
        let (reply, outcome) = bounded(1);
        self.inner
            .inbox
            .send(Message::Command {
                command,
                reply: Some(reply),
            })
            .map_err(|_| PlaybackError::SessionClosed)?;
        outcome.recv().map_err(|_| PlaybackError::SessionClosed)?
    }

    /// Snapshot of the session after every earlier message was processed
    ///
    /// # Errors
    /// Returns `SessionClosed` if the worker has exited.
    pub fn snapshot(&self) -> Result<SessionSnapshot> {
        let (reply, snapshot) = bounded(1);
        self.inner
            .inbox
            .send(Message::Snapshot { reply })
            .map_err(|_| PlaybackError::SessionClosed)?;
        snapshot.recv().map_err(|_| PlaybackError::SessionClosed)
    }

    /// Stop playback and wait for the worker to exit
    ///
    /// # Errors
    /// Currently infallible.
    pub fn shutdown(&self) -> Result<()> {
        if self.inner.inbox.send(Message::Shutdown).is_err() {
            debug!("Playback session already closed");
        }
        self.inner.join();
        Ok(())
    }

    /// Play, optionally replacing the queue and selecting a position
    ///
    /// # Errors
    /// See `PlaybackSession::execute`.
    pub fn play(&self, queue: Option<Queue>, start_index: Option<usize>) -> Result<()> {
        self.execute(Command::Play { queue, start_index })
    }

    /// Pause
    ///
    /// # Errors
    /// See `PlaybackSession::execute`.
    pub fn pause(&self) -> Result<()> {
        self.execute(Command::Pause)
    }

    /// Skip to the next track
    ///
    /// # Errors
    /// See `PlaybackSession::execute`.
    pub fn next(&self) -> Result<()> {
        self.execute(Command::Next)
    }

    /// Restart the current track or go back one
    ///
    /// # Errors
    /// See `PlaybackSession::execute`.
    pub fn previous(&self) -> Result<()> {
        self.execute(Command::Previous)
    }

    /// Stop and release everything
    ///
    /// # Errors
    /// See `PlaybackSession::execute`.
    pub fn stop(&self) -> Result<()> {
        self.execute(Command::Stop)
    }
}
