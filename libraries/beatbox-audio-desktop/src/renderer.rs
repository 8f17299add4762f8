//! `Renderer` implementation for desktop playback

use crate::decoder::TrackDecoder;
use crate::error::AudioError;
use crate::output::{default_device, OutputHandle};
use crate::resample::StereoResampler;
use crate::shared::Shared;
use beatbox_core::ResourceHandle;
use beatbox_playback::{Renderer, RendererCallbacks, RendererError, RendererFactory};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, error, info};

/// Seconds of decoded audio kept ahead of the device
const BUFFER_SECONDS: usize = 2;

/// Decode thread back-off while the buffer is full or playback is paused
const IDLE: Duration = Duration::from_millis(10);

/// Opens a `DesktopRenderer` on the default output device for each track
#[derive(Debug, Default, Clone, Copy)]
pub struct DesktopRendererFactory;

impl DesktopRendererFactory {
    /// Create a factory
    pub fn new() -> Self {
        Self
    }
}

impl RendererFactory for DesktopRendererFactory {
    fn open(&self, handle: &ResourceHandle) -> Result<Box<dyn Renderer>, RendererError> {
        let path = handle.to_path();

        // Fail synchronously on a missing or unreadable file
        File::open(&path).map_err(|e| AudioError::Open(format!("{}: {}", path.display(), e)))?;

        Ok(Box::new(DesktopRenderer::new(path)?))
    }
}

/// Plays one local file through CPAL
pub struct DesktopRenderer {
    path: PathBuf,
    shared: Arc<Shared>,
    output: OutputHandle,
    decode_thread: Option<JoinHandle<()>>,
    released: bool,
}

impl DesktopRenderer {
    /// Bind a renderer for `path` to the default output device
    ///
    /// Nothing is decoded until `prepare_async`.
    ///
    /// # Errors
    /// Returns an error if no output device is available.
    pub fn new(path: PathBuf) -> crate::Result<Self> {
        let (device, config, info) = default_device()?;
        let shared = Arc::new(Shared::new(info.sample_rate));
        let output = OutputHandle::spawn(device, config, Arc::clone(&shared))?;

        debug!(
            "Renderer for {} bound to output ({} Hz, {} channels)",
            path.display(),
            info.sample_rate,
            info.channels
        );

        Ok(Self {
            path,
            shared,
            output,
            decode_thread: None,
            released: false,
        })
    }

    /// File this renderer plays
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_live(&self) -> Result<(), RendererError> {
        if self.released {
            Err(RendererError::Released)
        } else {
            Ok(())
        }
    }
}

impl Renderer for DesktopRenderer {
    fn prepare_async(&mut self, callbacks: RendererCallbacks) -> Result<(), RendererError> {
        self.ensure_live()?;
        if self.decode_thread.is_some() {
            return Err(RendererError::Open("Renderer already prepared".into()));
        }

        let path = self.path.clone();
        let shared = Arc::clone(&self.shared);
        let thread = thread::Builder::new()
            .name("beatbox-decode".to_string())
            .spawn(move || decode_loop(&path, &shared, &callbacks))
            .map_err(|e| RendererError::Open(format!("Failed to spawn decoder: {e}")))?;

        self.decode_thread = Some(thread);
        Ok(())
    }

    fn start(&mut self) -> Result<(), RendererError> {
        self.ensure_live()?;
        self.shared.playing.store(true, Ordering::Release);
        if let Err(e) = self.output.start() {
            self.shared.playing.store(false, Ordering::Release);
            return Err(e.into());
        }
        Ok(())
    }

    fn pause(&mut self) -> Result<(), RendererError> {
        self.ensure_live()?;
        self.shared.playing.store(false, Ordering::Release);
        self.output.pause()?;
        Ok(())
    }

    fn resume(&mut self) -> Result<(), RendererError> {
        self.start()
    }

    fn stop(&mut self) -> Result<(), RendererError> {
        if self.released {
            return Ok(());
        }
        self.shared.playing.store(false, Ordering::Release);
        self.output.stop();
        Ok(())
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        self.shared.shutdown.store(true, Ordering::Release);
        self.shared.playing.store(false, Ordering::Release);
        self.output.shutdown();

        if let Some(thread) = self.decode_thread.take() {
            if thread.join().is_err() {
                error!("Decode thread for {} panicked", self.path.display());
            }
        }
        debug!("Renderer for {} released", self.path.display());
    }

    fn seek_to(&mut self, position_ms: u64) -> Result<(), RendererError> {
        self.ensure_live()?;
        self.shared.request_seek(position_ms);
        Ok(())
    }

    fn current_position_ms(&self) -> u64 {
        self.shared.position_ms()
    }
}

impl Drop for DesktopRenderer {
    fn drop(&mut self) {
        self.release();
    }
}

/// Open the file, report ready, then keep the buffer topped up
fn decode_loop(path: &Path, shared: &Shared, callbacks: &RendererCallbacks) {
    let epoch = callbacks.epoch();

    let mut decoder = match TrackDecoder::open(path) {
        Ok(decoder) => decoder,
        Err(e) => return report_error(shared, callbacks, &e),
    };
    let mut resampler = match StereoResampler::new(decoder.sample_rate(), shared.sample_rate) {
        Ok(resampler) => resampler,
        Err(e) => return report_error(shared, callbacks, &e),
    };

    info!(
        "Renderer epoch {} prepared {} ({} Hz -> {} Hz)",
        epoch,
        path.display(),
        decoder.sample_rate(),
        shared.sample_rate
    );
    callbacks.ready();

    let capacity = BUFFER_SECONDS * shared.sample_rate as usize * 2;

    while !shared.shutdown.load(Ordering::Acquire) {
        if shared.device_failed.load(Ordering::Acquire) {
            let e = AudioError::DeviceError("Output stream failed".into());
            return report_error(shared, callbacks, &e);
        }

        if let Some(position_ms) = shared.take_seek() {
            if let Err(e) = decoder.seek(Duration::from_millis(position_ms)) {
                return report_error(shared, callbacks, &e);
            }
            resampler.reset();
            shared.decoded_all.store(false, Ordering::Release);
            continue;
        }

        if shared.decoded_all.load(Ordering::Acquire) {
            if shared.playing.load(Ordering::Acquire) && shared.drained() {
                if shared.claim_report() {
                    info!("Renderer epoch {} reached end of {}", epoch, path.display());
                    callbacks.completed();
                }
                return;
            }
            thread::sleep(IDLE);
            continue;
        }

        if shared.buffered() >= capacity {
            thread::sleep(IDLE);
            continue;
        }

        let generation = shared.generation();
        let chunk = match decoder.next_chunk() {
            Ok(Some(samples)) => resampler.process(samples),
            Ok(None) => {
                let tail = resampler.flush();
                if tail.is_ok() && shared.generation() == generation {
                    shared.decoded_all.store(true, Ordering::Release);
                }
                tail
            }
            Err(e) => Err(e),
        };

        match chunk {
            Ok(samples) => shared.push(&samples, generation),
            Err(e) => return report_error(shared, callbacks, &e),
        }
    }
}

/// Report a failure once; a released renderer reports nothing
fn report_error(shared: &Shared, callbacks: &RendererCallbacks, err: &AudioError) {
    if shared.shutdown.load(Ordering::Acquire) {
        return;
    }
    if shared.claim_report() {
        error!("Renderer epoch {} failed: {}", callbacks.epoch(), err);
        callbacks.error(err.code());
    }
}
