//! Streaming file decoder using Symphonia
//!
//! Every packet is converted to interleaved stereo `f32` at the file's own
//! sample rate: mono is duplicated to both channels, anything wider than
//! stereo keeps its first two channels.

use crate::error::{AudioError, Result};
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{Decoder, DecoderOptions};
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::{FormatOptions, FormatReader, SeekMode, SeekTo};
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;
use symphonia::core::units::Time;
use tracing::{debug, warn};

/// Decoder for one audio file
pub struct TrackDecoder {
    format_reader: Box<dyn FormatReader>,
    decoder: Box<dyn Decoder>,
    track_id: u32,
    sample_rate: u32,
    duration: Option<Duration>,
}

impl TrackDecoder {
    /// Open `path` and set up a decoder for its default track
    ///
    /// # Errors
    /// - `Open` if the file cannot be opened
    /// - `UnsupportedFormat` if no container or codec recognises it
    pub fn open(path: &Path) -> Result<Self> {
        let file =
            File::open(path).map_err(|e| AudioError::Open(format!("{}: {}", path.display(), e)))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let detected = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| AudioError::UnsupportedFormat(format!("{}: {}", path.display(), e)))?;

        Self::from_reader(detected.format, path)
    }

    /// Set up a decoder for the default track of an already opened format reader
    fn from_reader(format_reader: Box<dyn FormatReader>, path: &Path) -> Result<Self> {
        let track = format_reader
            .default_track()
            .ok_or_else(|| AudioError::UnsupportedFormat("No audio tracks found".into()))?;

        let sample_rate = track.codec_params.sample_rate.unwrap_or(44_100);
        let track_id = track.id;
        let duration = track
            .codec_params
            .n_frames
            .map(|frames| Duration::from_secs_f64(frames as f64 / f64::from(sample_rate)));

        let decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::UnsupportedFormat(e.to_string()))?;

        debug!(
            "Opened {} ({} Hz, {:?})",
            path.display(),
            sample_rate,
            duration
        );

        Ok(Self {
            format_reader,
            decoder,
            track_id,
            sample_rate,
            duration,
        })
    }

    /// Sample rate of the decoded audio
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Total length, when the container knows it
    pub fn duration(&self) -> Option<Duration> {
        self.duration
    }

    /// Decode the next packet
    ///
    /// Returns `Ok(None)` at end of stream. Packets the codec rejects are
    /// skipped; a reset request from the reader rebuilds the codec and
    /// carries on.
    ///
    /// # Errors
    /// Returns `Decode` if the container cannot be read any further or the
    /// codec cannot be rebuilt after a reset.
    pub fn next_chunk(&mut self) -> Result<Option<Vec<f32>>> {
        loop {
            let packet = match self.format_reader.next_packet() {
                Ok(packet) => packet,
                Err(SymphoniaError::IoError(e)) if e.kind() == ErrorKind::UnexpectedEof => {
                    return Ok(None);
                }
                Err(SymphoniaError::ResetRequired) => {
                    self.rebuild_decoder()?;
                    continue;
                }
                Err(e) => return Err(AudioError::Decode(e.to_string())),
            };

            if packet.track_id() != self.track_id {
                continue;
            }

            match self.decoder.decode(&packet) {
                Ok(decoded) => return Ok(Some(to_stereo_f32(decoded))),
                Err(SymphoniaError::DecodeError(e)) => {
                    warn!("Skipping undecodable packet: {}", e);
                }
                Err(e) => return Err(AudioError::Decode(e.to_string())),
            }
        }
    }

    /// Recreate the codec after the reader asked for a reset
    ///
    /// Chained streams (Ogg/Opus) do this at every link. The output keeps its
    /// sample rate, so a link at another rate cannot be continued.
    fn rebuild_decoder(&mut self) -> Result<()> {
        let track = self
            .format_reader
            .tracks()
            .iter()
            .find(|track| track.id == self.track_id)
            .or_else(|| self.format_reader.default_track())
            .ok_or_else(|| AudioError::Decode("No audio track after stream reset".into()))?;

        let sample_rate = track.codec_params.sample_rate.unwrap_or(self.sample_rate);
        if sample_rate != self.sample_rate {
            return Err(AudioError::Decode(format!(
                "Sample rate changed from {} Hz to {} Hz mid-stream",
                self.sample_rate, sample_rate
            )));
        }

        self.decoder = symphonia::default::get_codecs()
            .make(&track.codec_params, &DecoderOptions::default())
            .map_err(|e| AudioError::Decode(format!("Cannot rebuild decoder: {}", e)))?;
        self.track_id = track.id;

        debug!("Decoder rebuilt after stream reset (track {})", self.track_id);
        Ok(())
    }

    /// Move to `position` from the start of the track
    ///
    /// # Errors
    /// Returns `Decode` if the container refuses the seek.
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        let time = Time::new(
            position.as_secs(),
            f64::from(position.subsec_nanos()) / 1_000_000_000.0,
        );

        self.format_reader
            .seek(
                SeekMode::Accurate,
                SeekTo::Time {
                    time,
                    track_id: Some(self.track_id),
                },
            )
            .map_err(|e| AudioError::Decode(format!("Seek failed: {}", e)))?;

        self.decoder.reset();
        Ok(())
    }
}

/// Interleave the first two channels of a planar buffer
fn interleave<T, F>(buf: &AudioBuffer<T>, normalize: F) -> Vec<f32>
where
    T: Sample,
    F: Fn(T) -> f32,
{
    let frames = buf.frames();
    let left = buf.chan(0);
    let right = if buf.spec().channels.count() > 1 {
        buf.chan(1)
    } else {
        left
    };

    let mut output = Vec::with_capacity(frames * 2);
    for (l, r) in left.iter().zip(right).take(frames) {
        output.push(normalize(*l));
        output.push(normalize(*r));
    }
    output
}

/// Convert any decoded buffer to interleaved stereo in [-1.0, 1.0]
fn to_stereo_f32(decoded: AudioBufferRef<'_>) -> Vec<f32> {
    match decoded {
        AudioBufferRef::F32(buf) => interleave(&buf, |s| s),
        AudioBufferRef::F64(buf) => interleave(&buf, |s| s as f32),
        AudioBufferRef::S8(buf) => interleave(&buf, |s| f32::from(s) / f32::from(i8::MAX)),
        AudioBufferRef::S16(buf) => interleave(&buf, |s| f32::from(s) / f32::from(i16::MAX)),
        AudioBufferRef::S24(buf) => interleave(&buf, |s| s.inner() as f32 / 8_388_607.0),
        AudioBufferRef::S32(buf) => interleave(&buf, |s| s as f32 / i32::MAX as f32),
        AudioBufferRef::U8(buf) => {
            interleave(&buf, |s| f32::from(s) / f32::from(u8::MAX) * 2.0 - 1.0)
        }
        AudioBufferRef::U16(buf) => {
            interleave(&buf, |s| f32::from(s) / f32::from(u16::MAX) * 2.0 - 1.0)
        }
        AudioBufferRef::U24(buf) => {
            interleave(&buf, |s| s.inner() as f32 / 16_777_215.0 * 2.0 - 1.0)
        }
        AudioBufferRef::U32(buf) => interleave(&buf, |s| s as f32 / u32::MAX as f32 * 2.0 - 1.0),
    }
}
