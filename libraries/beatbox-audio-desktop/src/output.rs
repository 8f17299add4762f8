/// CPAL output on a dedicated audio thread
///
/// The thread owns the CPAL `Stream` (which is not `Send` on every
/// platform) and is driven over a command channel.
use crate::error::{AudioError, Result};
use crate::shared::Shared;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, error, warn};

/// Commands sent to the audio thread
enum OutputCommand {
    /// Build the stream if needed and start pulling samples
    Start(Sender<Result<()>>),
    /// Pause the stream
    Pause(Sender<Result<()>>),
    /// Drop the stream
    Stop,
    /// Drop the stream and exit
    Shutdown,
}

/// The device the audio thread opened
#[derive(Debug, Clone, Copy)]
pub(crate) struct DeviceInfo {
    pub(crate) sample_rate: u32,
    pub(crate) channels: u16,
}

/// Query the default output device
pub(crate) fn default_device() -> Result<(Device, StreamConfig, DeviceInfo)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or(AudioError::DeviceNotFound)?;

    let supported = device.default_output_config()?;
    let sample_rate = supported.sample_rate();
    let config = supported.config();
    let info = DeviceInfo {
        sample_rate,
        channels: config.channels,
    };

    Ok((device, config, info))
}

/// Handle to one renderer's audio thread
pub(crate) struct OutputHandle {
    commands: Sender<OutputCommand>,
    thread: Option<JoinHandle<()>>,
}

impl OutputHandle {
    /// Spawn the audio thread for `device`
    pub(crate) fn spawn(
        device: Device,
        config: StreamConfig,
        shared: Arc<Shared>,
    ) -> Result<Self> {
        let (commands, command_rx) = bounded::<OutputCommand>(32);

        let thread = thread::Builder::new()
            .name("beatbox-output".to_string())
            .spawn(move || audio_thread_run(&device, &config, &shared, &command_rx))
            .map_err(|e| AudioError::DeviceError(format!("Failed to spawn audio thread: {e}")))?;

        Ok(Self {
            commands,
            thread: Some(thread),
        })
    }

    pub(crate) fn start(&self) -> Result<()> {
        self.request(OutputCommand::Start)
    }

    pub(crate) fn pause(&self) -> Result<()> {
        self.request(OutputCommand::Pause)
    }

    pub(crate) fn stop(&self) {
        let _ = self.commands.send(OutputCommand::Stop);
    }

    /// Stop the thread and wait for it; idempotent
    pub(crate) fn shutdown(&mut self) {
        let _ = self.commands.send(OutputCommand::Shutdown);
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                error!("Audio thread panicked");
            }
        }
    }

    fn request(&self, make: impl FnOnce(Sender<Result<()>>) -> OutputCommand) -> Result<()> {
        let (reply, outcome) = bounded(1);
        self.commands
            .send(make(reply))
            .map_err(|_| AudioError::DeviceError("Audio thread is gone".into()))?;
        outcome
            .recv()
            .map_err(|_| AudioError::DeviceError("Audio thread is gone".into()))?
    }
}

impl Drop for OutputHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn audio_thread_run(
    device: &Device,
    config: &StreamConfig,
    shared: &Arc<Shared>,
    command_rx: &Receiver<OutputCommand>,
) {
    let mut stream: Option<Stream> = None;

    while let Ok(command) = command_rx.recv() {
        match command {
            OutputCommand::Start(reply) => {
                let result = if let Some(s) = &stream {
                    s.play().map_err(AudioError::from)
                } else {
                    match build_stream(device, config, shared) {
                        Ok(s) => {
                            let played = s.play().map_err(AudioError::from);
                            if played.is_ok() {
                                stream = Some(s);
                            }
                            played
                        }
                        Err(e) => Err(e),
                    }
                };
                let _ = reply.send(result);
            }
            OutputCommand::Pause(reply) => {
                let result = match &stream {
                    Some(s) => s.pause().map_err(AudioError::from),
                    None => Ok(()),
                };
                let _ = reply.send(result);
            }
            OutputCommand::Stop => {
                if stream.take().is_some() {
                    debug!("Output stream closed");
                }
            }
            OutputCommand::Shutdown => break,
        }
    }

    drop(stream);
}

fn build_stream(device: &Device, config: &StreamConfig, shared: &Arc<Shared>) -> Result<Stream> {
    let channels = usize::from(config.channels);
    let for_callback = Arc::clone(shared);
    let for_errors = Arc::clone(shared);

    let stream = device.build_output_stream(
        config,
        move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
            for_callback.fill(data, channels);
        },
        move |err| {
            warn!("Audio stream error: {}", err);
            for_errors.device_failed.store(true, Ordering::Release);
        },
        None,
    )?;

    Ok(stream)
}
