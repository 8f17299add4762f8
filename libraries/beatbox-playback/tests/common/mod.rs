//! Shared fixtures for playback session tests
//!
//! The mock renderer never reports anything on its own unless `auto_ready`
//! is set; tests fire callbacks explicitly through `Fixture::renderer`.

#![allow(dead_code)]

use beatbox_core::{LastPlayed, ResourceHandle, SessionStore, TrackDescriptor, TrackId};
use beatbox_playback::{
    ControlSurface, Epoch, Message, PlaybackSession, Queue, Renderer, RendererCallbacks,
    RendererError, RendererFactory, SessionConfig, SessionEvent, SurfaceState,
};
use crossbeam_channel::{unbounded, Receiver};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

// ===== Tracks =====

pub fn track(i: usize) -> TrackDescriptor {
    TrackDescriptor::new(
        TrackId::new(format!("track-{i}")),
        format!("Track {i}"),
        ResourceHandle::new(format!("/music/{i}.mp3")),
    )
    .with_artist(format!("Artist {i}"))
}

pub fn tracks(n: usize) -> Queue {
    (0..n).map(track).collect()
}

// ===== Renderer =====

/// Renderer call, tagged with the epoch it was prepared for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open(String),
    Prepare(Epoch),
    Start(Epoch),
    Pause(Epoch),
    Resume(Epoch),
    Stop(Epoch),
    Release(Epoch),
    Seek(Epoch, u64),
}

/// Externally visible state of one mock renderer
#[derive(Debug, Default)]
pub struct RendererLog {
    pub epoch: Epoch,
    pub position_ms: u64,
    pub prepared: bool,
    pub released: bool,
    pub callbacks: Option<RendererCallbacks>,
}

#[derive(Default)]
pub struct Shared {
    pub calls: Mutex<Vec<Call>>,
    pub logs: Mutex<Vec<Arc<Mutex<RendererLog>>>>,
    pub live: AtomicUsize,
    pub max_live: AtomicUsize,
    pub fail_open: Mutex<Vec<String>>,
    pub fail_prepare: AtomicBool,
    pub auto_ready: AtomicBool,
    pub release_delay_ms: AtomicU64,
}

impl Shared {
    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

struct MockRenderer {
    log: Arc<Mutex<RendererLog>>,
    shared: Arc<Shared>,
}

impl MockRenderer {
    fn epoch(&self) -> Epoch {
        self.log.lock().unwrap().epoch
    }
}

impl Renderer for MockRenderer {
    fn prepare_async(&mut self, callbacks: RendererCallbacks) -> Result<(), RendererError> {
        let epoch = callbacks.epoch();
        self.shared.record(Call::Prepare(epoch));
        if self.shared.fail_prepare.load(Ordering::SeqCst) {
            return Err(RendererError::Open("prepare refused".into()));
        }

        let live = self.shared.live.fetch_add(1, Ordering::SeqCst) + 1;
        self.shared.max_live.fetch_max(live, Ordering::SeqCst);

        let mut log = self.log.lock().unwrap();
        log.epoch = epoch;
        log.prepared = true;
        if self.shared.auto_ready.load(Ordering::SeqCst) {
            callbacks.ready();
        }
        log.callbacks = Some(callbacks);
        Ok(())
    }

    fn start(&mut self) -> Result<(), RendererError> {
        self.shared.record(Call::Start(self.epoch()));
        Ok(())
    }

    fn pause(&mut self) -> Result<(), RendererError> {
        self.shared.record(Call::Pause(self.epoch()));
        Ok(())
    }

    fn resume(&mut self) -> Result<(), RendererError> {
        self.shared.record(Call::Resume(self.epoch()));
        Ok(())
    }

    fn stop(&mut self) -> Result<(), RendererError> {
        self.shared.record(Call::Stop(self.epoch()));
        Ok(())
    }

    fn release(&mut self) {
        let delay = self.shared.release_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            thread::sleep(Duration::from_millis(delay));
        }

        let mut log = self.log.lock().unwrap();
        if log.prepared && !log.released {
            self.shared.live.fetch_sub(1, Ordering::SeqCst);
        }
        log.released = true;
        self.shared.record(Call::Release(log.epoch));
    }

    fn seek_to(&mut self, position_ms: u64) -> Result<(), RendererError> {
        self.shared.record(Call::Seek(self.epoch(), position_ms));
        self.log.lock().unwrap().position_ms = position_ms;
        Ok(())
    }

    fn current_position_ms(&self) -> u64 {
        self.log.lock().unwrap().position_ms
    }
}

struct MockFactory {
    shared: Arc<Shared>,
}

impl RendererFactory for MockFactory {
    fn open(&self, handle: &ResourceHandle) -> Result<Box<dyn Renderer>, RendererError> {
        self.shared.record(Call::Open(handle.to_string()));
        if self
            .shared
            .fail_open
            .lock()
            .unwrap()
            .iter()
            .any(|path| path == handle.as_str())
        {
            return Err(RendererError::Open(format!("{handle}: no such file")));
        }

        let log = Arc::new(Mutex::new(RendererLog::default()));
        self.shared.logs.lock().unwrap().push(Arc::clone(&log));
        Ok(Box::new(MockRenderer {
            log,
            shared: Arc::clone(&self.shared),
        }))
    }
}

// ===== Surface =====

#[derive(Default)]
pub struct SurfaceLog {
    pub renders: Mutex<Vec<SurfaceState>>,
    pub retires: AtomicUsize,
}

struct RecordingSurface(Arc<SurfaceLog>);

impl ControlSurface for RecordingSurface {
    fn render(&mut self, state: &SurfaceState) {
        self.0.renders.lock().unwrap().push(state.clone());
    }

    fn retire(&mut self) {
        self.0.retires.fetch_add(1, Ordering::SeqCst);
    }
}

// ===== Store =====

#[derive(Default)]
pub struct StoreLog {
    pub writes: Mutex<Vec<(String, String)>>,
    pub fail: AtomicBool,
}

struct RecordingStore(Arc<StoreLog>);

impl SessionStore for RecordingStore {
    fn put(&self, last_track_name: &str, last_track_artist: &str) -> beatbox_core::Result<()> {
        if self.0.fail.load(Ordering::SeqCst) {
            return Err(beatbox_core::BeatboxError::storage("disk full"));
        }
        self.0
            .writes
            .lock()
            .unwrap()
            .push((last_track_name.to_string(), last_track_artist.to_string()));
        Ok(())
    }

    fn get(&self) -> beatbox_core::Result<LastPlayed> {
        Ok(self
            .0
            .writes
            .lock()
            .unwrap()
            .last()
            .map(|(name, artist)| LastPlayed::new(name.as_str(), artist.as_str()))
            .unwrap_or_default())
    }
}

// ===== Fixture =====

#[derive(Default)]
pub struct Fixture {
    pub shared: Arc<Shared>,
    pub surface: Arc<SurfaceLog>,
    pub store: Arc<StoreLog>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn factory(&self) -> Box<dyn RendererFactory> {
        Box::new(MockFactory {
            shared: Arc::clone(&self.shared),
        })
    }

    pub fn control_surface(&self) -> Box<dyn ControlSurface> {
        Box::new(RecordingSurface(Arc::clone(&self.surface)))
    }

    pub fn session_store(&self) -> Box<dyn SessionStore> {
        Box::new(RecordingStore(Arc::clone(&self.store)))
    }

    pub fn harness(&self) -> Harness {
        self.harness_with(SessionConfig::default())
    }

    pub fn harness_with(&self, config: SessionConfig) -> Harness {
        let (inbox_tx, inbox) = unbounded();
        let (events_tx, events) = unbounded();
        let session = PlaybackSession::new(
            self.factory(),
            self.control_surface(),
            self.session_store(),
            config,
            inbox_tx,
        )
        .with_observer(events_tx);

        Harness {
            session,
            inbox,
            events,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.shared.calls.lock().unwrap().clone()
    }

    pub fn renders(&self) -> Vec<SurfaceState> {
        self.surface.renders.lock().unwrap().clone()
    }

    pub fn retires(&self) -> usize {
        self.surface.retires.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<(String, String)> {
        self.store.writes.lock().unwrap().clone()
    }

    pub fn max_live(&self) -> usize {
        self.shared.max_live.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.shared.live.load(Ordering::SeqCst)
    }

    /// Log of the renderer prepared for `epoch`
    pub fn renderer(&self, epoch: Epoch) -> Arc<Mutex<RendererLog>> {
        self.shared
            .logs
            .lock()
            .unwrap()
            .iter()
            .find(|log| log.lock().unwrap().epoch == epoch)
            .cloned()
            .unwrap_or_else(|| panic!("no renderer prepared for epoch {epoch}"))
    }

    pub fn fire_ready(&self, epoch: Epoch) {
        self.callbacks(epoch).ready();
    }

    pub fn fire_completed(&self, epoch: Epoch) {
        self.callbacks(epoch).completed();
    }

    pub fn fire_error(&self, epoch: Epoch, code: i32) {
        self.callbacks(epoch).error(code);
    }

    pub fn set_position(&self, epoch: Epoch, position_ms: u64) {
        self.renderer(epoch).lock().unwrap().position_ms = position_ms;
    }

    fn callbacks(&self, epoch: Epoch) -> RendererCallbacks {
        self.renderer(epoch)
            .lock()
            .unwrap()
            .callbacks
            .clone()
            .expect("renderer was prepared")
    }
}

pub struct Harness {
    pub session: PlaybackSession,
    pub inbox: Receiver<Message>,
    pub events: Receiver<SessionEvent>,
}

impl Harness {
    /// Feed every queued renderer callback into the session
    pub fn pump(&mut self) {
        while let Ok(message) = self.inbox.try_recv() {
            let _ = self.session.handle(message);
        }
    }

    pub fn drain_events(&self) -> Vec<SessionEvent> {
        self.events.try_iter().collect()
    }
}
