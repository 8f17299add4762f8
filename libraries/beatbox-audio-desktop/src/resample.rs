//! Streaming stereo sample rate conversion
//!
//! Wraps rubato's `SincFixedIn`, which wants fixed-size planar chunks, behind
//! an interface that takes interleaved packets of any size. Leftover frames
//! are carried to the next call instead of being passed through unresampled.
//!
//! The sinc filter delays its output by `output_delay()` frames. That many
//! leading frames are dropped after every (re)start and `flush` drains the
//! filter, so N input frames always come out as `ceil(N * ratio)` frames
//! aligned with the input.

use crate::error::{AudioError, Result};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};

/// Input frames per resampler chunk
const CHUNK_FRAMES: usize = 1024;

const CHANNELS: usize = 2;

/// Zero-input passes allowed while draining the filter tail
const MAX_DRAIN_PASSES: usize = 4;

/// Converts interleaved stereo from one rate to another
pub struct StereoResampler {
    inner: Option<SincFixedIn<f32>>,
    ratio: f64,
    pending: Vec<f32>,
    /// Leading output frames still to drop
    skip: usize,
    frames_in: u64,
    frames_out: u64,
}

impl StereoResampler {
    /// Create a converter from `from_hz` to `to_hz`
    ///
    /// Equal rates produce a passthrough that never touches the samples.
    ///
    /// # Errors
    /// Returns `ResampleError` if rubato rejects the ratio.
    pub fn new(from_hz: u32, to_hz: u32) -> Result<Self> {
        if from_hz == to_hz {
            return Ok(Self {
                inner: None,
                ratio: 1.0,
                pending: Vec::new(),
                skip: 0,
                frames_in: 0,
                frames_out: 0,
            });
        }

        let params = SincInterpolationParameters {
            sinc_len: 128,
            f_cutoff: 0.95,
            interpolation: SincInterpolationType::Linear,
            oversampling_factor: 256,
            window: WindowFunction::BlackmanHarris2,
        };

        let ratio = f64::from(to_hz) / f64::from(from_hz);
        let inner = SincFixedIn::<f32>::new(
            ratio,
            2.0,
            params,
            CHUNK_FRAMES,
            CHANNELS,
        )
        .map_err(|e| AudioError::ResampleError(e.to_string()))?;

        Ok(Self {
            skip: inner.output_delay(),
            inner: Some(inner),
            ratio,
            pending: Vec::with_capacity(CHUNK_FRAMES * CHANNELS * 2),
            frames_in: 0,
            frames_out: 0,
        })
    }

    /// Whether input is returned unchanged
    pub fn is_passthrough(&self) -> bool {
        self.inner.is_none()
    }

    /// Convert a packet; may return fewer frames than a full conversion
    /// until enough input has accumulated
    ///
    /// # Errors
    /// Returns `ResampleError` if rubato fails.
    pub fn process(&mut self, samples: Vec<f32>) -> Result<Vec<f32>> {
        let Some(resampler) = self.inner.as_mut() else {
            return Ok(samples);
        };

        self.pending.extend_from_slice(&samples);
        self.frames_in += (samples.len() / CHANNELS) as u64;

        let mut output = Vec::new();
        while self.pending.len() >= resampler.input_frames_next() * CHANNELS {
            let take = resampler.input_frames_next() * CHANNELS;
            let planar = deinterleave(&self.pending[..take]);
            self.pending.drain(..take);

            let resampled = resampler
                .process(&planar, None)
                .map_err(|e| AudioError::ResampleError(e.to_string()))?;
            self.frames_out += emit(&resampled, &mut self.skip, &mut output) as u64;
        }

        Ok(output)
    }

    /// Convert whatever input is still pending and drain the filter
    /// (end of stream)
    ///
    /// # Errors
    /// Returns `ResampleError` if rubato fails.
    pub fn flush(&mut self) -> Result<Vec<f32>> {
        let pending = std::mem::take(&mut self.pending);
        let Some(resampler) = self.inner.as_mut() else {
            return Ok(pending);
        };

        let expected = (self.frames_in as f64 * self.ratio).ceil() as u64;
        let mut output = Vec::new();

        if !pending.is_empty() {
            let planar = deinterleave(&pending);
            let resampled = resampler
                .process_partial(Some(planar.as_slice()), None)
                .map_err(|e| AudioError::ResampleError(e.to_string()))?;
            self.frames_out += emit(&resampled, &mut self.skip, &mut output) as u64;
        }

        let mut passes = 0;
        while self.frames_out < expected && passes < MAX_DRAIN_PASSES {
            let resampled = resampler
                .process_partial::<Vec<f32>>(None, None)
                .map_err(|e| AudioError::ResampleError(e.to_string()))?;
            self.frames_out += emit(&resampled, &mut self.skip, &mut output) as u64;
            passes += 1;
        }

        // Zero padding past the real input
        if self.frames_out > expected {
            let excess = (self.frames_out - expected) as usize * CHANNELS;
            output.truncate(output.len().saturating_sub(excess));
            self.frames_out = expected;
        }

        Ok(output)
    }

    /// Drop pending input and filter state (after a seek)
    pub fn reset(&mut self) {
        self.pending.clear();
        self.frames_in = 0;
        self.frames_out = 0;
        if let Some(resampler) = self.inner.as_mut() {
            resampler.reset();
            self.skip = resampler.output_delay();
        }
    }
}

fn deinterleave(samples: &[f32]) -> Vec<Vec<f32>> {
    let frames = samples.len() / CHANNELS;
    let mut planar = vec![Vec::with_capacity(frames); CHANNELS];
    for frame in samples.chunks_exact(CHANNELS) {
        for (channel, sample) in planar.iter_mut().zip(frame) {
            channel.push(*sample);
        }
    }
    planar
}

/// Append resampled frames to `output`, dropping the first `skip` of them;
/// returns the number of frames appended
fn emit(planar: &[Vec<f32>], skip: &mut usize, output: &mut Vec<f32>) -> usize {
    let frames = planar.first().map_or(0, Vec::len);
    let dropped = (*skip).min(frames);
    *skip -= dropped;

    output.reserve((frames - dropped) * CHANNELS);
    for i in dropped..frames {
        for channel in planar.iter().take(CHANNELS) {
            output.push(channel[i]);
        }
    }
    frames - dropped
}
