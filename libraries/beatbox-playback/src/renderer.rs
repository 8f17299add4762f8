//! Renderer seam
//!
//! Abstracts the decoder/output pipeline (CPAL + Symphonia on desktop, a mock
//! in tests). Preparation is the only asynchronous call; everything else is
//! synchronous and must be safe to call after `stop`/`release`.

use crate::error::RendererError;
use crate::session::Message;
use beatbox_core::ResourceHandle;
use crossbeam_channel::Sender;

/// Generation counter tagging each renderer instance
pub type Epoch = u64;

/// Something that turns a resource handle into audible output
pub trait Renderer: Send {
    /// Begin opening and buffering the resource
    ///
    /// Must return immediately. Exactly one of `callbacks.ready()` or
    /// `callbacks.error(..)` is expected later, from any thread.
    ///
    /// # Errors
    /// Returns an error if preparation cannot even be started.
    fn prepare_async(&mut self, callbacks: RendererCallbacks) -> Result<(), RendererError>;

    /// Start output after preparation
    fn start(&mut self) -> Result<(), RendererError>;

    /// Pause output, keeping position
    fn pause(&mut self) -> Result<(), RendererError>;

    /// Resume output after `pause`
    fn resume(&mut self) -> Result<(), RendererError>;

    /// Stop output
    fn stop(&mut self) -> Result<(), RendererError>;

    /// Free every resource held by the renderer
    ///
    /// Idempotent. Nothing may be reported through the callbacks afterwards
    /// that the session would act on (stale epochs are discarded anyway).
    fn release(&mut self);

    /// Seek within the current track
    fn seek_to(&mut self, position_ms: u64) -> Result<(), RendererError>;

    /// Elapsed position within the current track
    fn current_position_ms(&self) -> u64;
}

/// Creates renderers bound to a resource
pub trait RendererFactory: Send {
    /// Open a renderer for `handle`
    ///
    /// # Errors
    /// Returns an error if the resource is missing, unreadable, or the output
    /// cannot be created.
    fn open(&self, handle: &ResourceHandle) -> Result<Box<dyn Renderer>, RendererError>;
}

/// What a renderer reports back asynchronously
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererEvent {
    /// Preparation finished; output can start
    Ready,

    /// The track reached its natural end
    Completed,

    /// Decoding or output failed
    Error {
        /// Renderer-specific code
        code: i32,
    },
}

/// Callback sink handed to a renderer
///
/// Every event is tagged with the epoch of the renderer it was created for
/// and posted into the session inbox, never executed inline.
#[derive(Debug, Clone)]
pub struct RendererCallbacks {
    epoch: Epoch,
    inbox: Sender<Message>,
}

impl RendererCallbacks {
    /// Create callbacks that post into `inbox`
    pub fn new(epoch: Epoch, inbox: Sender<Message>) -> Self {
        Self { epoch, inbox }
    }

    /// Epoch of the renderer these callbacks belong to
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Report that preparation finished
    pub fn ready(&self) {
        self.post(RendererEvent::Ready);
    }

    /// Report natural end of track
    pub fn completed(&self) {
        self.post(RendererEvent::Completed);
    }

    /// Report a decode or output failure
    pub fn error(&self, code: i32) {
        self.post(RendererEvent::Error { code });
    }

    fn post(&self, event: RendererEvent) {
        // The session may already be gone; a late event is harmless.
        let _ = self.inbox.send(Message::Renderer {
            epoch: self.epoch,
            event,
        });
    }
}
