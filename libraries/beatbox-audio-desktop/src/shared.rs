//! State shared by the renderer, its decode thread and the audio callback

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Decoded audio waiting for the device, plus playback flags
pub(crate) struct Shared {
    /// Interleaved stereo at the device rate
    samples: Mutex<VecDeque<f32>>,
    /// Bumped by every seek; chunks decoded for an older value are dropped
    generation: AtomicU64,
    seek_request: Mutex<Option<u64>>,
    /// Frames handed to the device, counted from the start of the track
    frames_played: AtomicU64,
    pub(crate) sample_rate: u32,
    pub(crate) playing: AtomicBool,
    pub(crate) decoded_all: AtomicBool,
    pub(crate) device_failed: AtomicBool,
    pub(crate) shutdown: AtomicBool,
    reported: AtomicBool,
}

impl Shared {
    pub(crate) fn new(sample_rate: u32) -> Self {
        Self {
            samples: Mutex::new(VecDeque::new()),
            generation: AtomicU64::new(0),
            seek_request: Mutex::new(None),
            frames_played: AtomicU64::new(0),
            sample_rate,
            playing: AtomicBool::new(false),
            decoded_all: AtomicBool::new(false),
            device_failed: AtomicBool::new(false),
            shutdown: AtomicBool::new(false),
            reported: AtomicBool::new(false),
        }
    }

    pub(crate) fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Queue decoded samples unless a seek happened since `generation`
    pub(crate) fn push(&self, samples: &[f32], generation: u64) {
        let mut queue = self.samples.lock().unwrap_or_else(PoisonError::into_inner);
        if self.generation.load(Ordering::Acquire) == generation {
            queue.extend(samples.iter().copied());
        }
    }

    /// Number of samples (not frames) waiting
    pub(crate) fn buffered(&self) -> usize {
        self.samples
            .lock()
            .map(|queue| queue.len())
            .unwrap_or_default()
    }

    /// Drop buffered audio and ask the decode thread to move to `position_ms`
    pub(crate) fn request_seek(&self, position_ms: u64) {
        let mut queue = self.samples.lock().unwrap_or_else(PoisonError::into_inner);
        self.generation.fetch_add(1, Ordering::AcqRel);
        queue.clear();
        *self
            .seek_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(position_ms);
        self.frames_played.store(
            position_ms * u64::from(self.sample_rate) / 1000,
            Ordering::Release,
        );
        self.decoded_all.store(false, Ordering::Release);
    }

    pub(crate) fn take_seek(&self) -> Option<u64> {
        self.seek_request
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub(crate) fn position_ms(&self) -> u64 {
        self.frames_played.load(Ordering::Acquire) * 1000 / u64::from(self.sample_rate.max(1))
    }

    /// Whether playback has consumed everything the decoder will produce
    pub(crate) fn drained(&self) -> bool {
        self.decoded_all.load(Ordering::Acquire) && self.buffered() == 0
    }

    /// Claim the single completion/error report; true for the first caller
    pub(crate) fn claim_report(&self) -> bool {
        !self.reported.swap(true, Ordering::AcqRel)
    }

    /// Fill a device buffer of `channels`-wide frames
    ///
    /// Runs on the real-time audio thread. Never blocks on a contended
    /// lock: a busy or poisoned queue yields silence for this period.
    pub(crate) fn fill(&self, output: &mut [f32], channels: usize) {
        if !self.playing.load(Ordering::Acquire) || channels == 0 {
            output.fill(0.0);
            return;
        }

        let Ok(mut queue) = self.samples.try_lock() else {
            output.fill(0.0);
            return;
        };

        let mut frames = 0u64;
        for frame in output.chunks_mut(channels) {
            let (Some(left), Some(right)) = (queue.pop_front(), queue.pop_front()) else {
                frame.fill(0.0);
                continue;
            };
            frames += 1;

            if frame.len() == 1 {
                frame[0] = (left + right) * 0.5;
            } else {
                frame[0] = left;
                frame[1] = right;
                frame[2..].fill(0.0);
            }
        }

        self.frames_played.fetch_add(frames, Ordering::AcqRel);
    }
}
