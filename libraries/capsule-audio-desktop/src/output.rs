/// CPAL output stream and the desktop playback backend
use crate::decode::decode_file;
use crate::error::{AudioError, Result};
use crate::mixer::{Mixer, VoiceId};
use capsule_playback::{AudioBackend, Track, TrackPlayer};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use crossbeam_channel::{bounded, Receiver, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Commands sent to the audio thread
enum AudioCommand {
    /// Drop the stream and exit
    Shutdown,
}

/// CPAL output mixing every voice of a [`Mixer`]
///
/// **Architecture**: a dedicated audio thread owns the CPAL Stream (which is
/// not `Send` on every platform). The stream callback pulls from the shared
/// mixer; the owning side only talks to the thread through a channel.
pub struct MixerOutput {
    command_tx: Sender<AudioCommand>,
    sample_rate: u32,
    channels: u16,
    audio_thread: Option<JoinHandle<()>>,
}

impl MixerOutput {
    /// Open the default output device and start streaming `mixer`
    ///
    /// # Errors
    /// Returns an error if no audio device is found or the stream fails to start
    pub fn new(mixer: Arc<Mixer>) -> Result<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or(AudioError::DeviceNotFound)?;

        let config = device.default_output_config()?;
        let sample_rate = config.sample_rate();
        let channels = config.channels();
        let config = config.config();

        let (command_tx, command_rx) = bounded::<AudioCommand>(8);
        let (ready_tx, ready_rx) = bounded::<Result<()>>(1);

        let audio_thread = thread::Builder::new()
            .name("capsule-audio".to_string())
            .spawn(move || Self::audio_thread_run(device, config, mixer, command_rx, ready_tx))?;

        // Wait until the stream is actually running (or failed to start)
        ready_rx
            .recv()
            .map_err(|e| AudioError::ThreadError(e.to_string()))??;

        tracing::info!(
            "Audio output started: {} Hz, {} channels",
            sample_rate,
            channels
        );

        Ok(Self {
            command_tx,
            sample_rate,
            channels,
            audio_thread: Some(audio_thread),
        })
    }

    /// Output sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Output channel count
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Audio thread main loop
    ///
    /// Builds the stream, reports readiness, then parks on the command
    /// channel until shutdown.
    fn audio_thread_run(
        device: Device,
        config: StreamConfig,
        mixer: Arc<Mixer>,
        command_rx: Receiver<AudioCommand>,
        ready_tx: Sender<Result<()>>,
    ) {
        let stream = match Self::build_stream(&device, &config, mixer) {
            Ok(stream) => stream,
            Err(e) => {
                let _ = ready_tx.send(Err(e));
                return;
            }
        };
        let _ = ready_tx.send(Ok(()));

        while let Ok(cmd) = command_rx.recv() {
            match cmd {
                AudioCommand::Shutdown => break,
            }
        }

        drop(stream);
        tracing::debug!("Audio thread exiting");
    }

    fn build_stream(device: &Device, config: &StreamConfig, mixer: Arc<Mixer>) -> Result<Stream> {
        let channels = config.channels as usize;
        let stream = device.build_output_stream(
            config,
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                mixer.mix(data, channels);
            },
            |err| tracing::error!("Audio stream error: {}", err),
            None,
        )?;
        stream.play()?;
        Ok(stream)
    }
}

impl Drop for MixerOutput {
    fn drop(&mut self) {
        let _ = self.command_tx.send(AudioCommand::Shutdown);
        if let Some(handle) = self.audio_thread.take() {
            let _ = handle.join();
        }
    }
}

/// Desktop implementation of the playback collaborator
///
/// Each opened track is decoded fully and registered as a mixer voice.
pub struct DesktopBackend {
    mixer: Arc<Mixer>,
    sample_rate: u32,
    // Keeps the stream alive for as long as players may be used
    output: Option<MixerOutput>,
}

impl DesktopBackend {
    /// Start output on the default device
    pub fn new() -> Result<Self> {
        let mixer = Arc::new(Mixer::new());
        let output = MixerOutput::new(Arc::clone(&mixer))?;
        let sample_rate = output.sample_rate();

        Ok(Self {
            mixer,
            sample_rate,
            output: Some(output),
        })
    }

    /// Backend over an existing mixer with no device attached
    ///
    /// Clips are decoded to `sample_rate`; whoever owns the mixer is
    /// responsible for pulling samples from it.
    pub fn with_mixer(mixer: Arc<Mixer>, sample_rate: u32) -> Self {
        Self {
            mixer,
            sample_rate,
            output: None,
        }
    }

    pub fn mixer(&self) -> &Arc<Mixer> {
        &self.mixer
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Whether an output device is attached
    pub fn has_output(&self) -> bool {
        self.output.is_some()
    }
}

impl AudioBackend for DesktopBackend {
    fn open(&mut self, track: &Track) -> capsule_playback::Result<Box<dyn TrackPlayer>> {
        let clip = decode_file(&track.source, self.sample_rate)?;
        let id = self.mixer.add_voice(Arc::new(clip.samples));

        tracing::info!("Loaded {} as voice {}", track.name, id);
        Ok(Box::new(MixerVoice {
            mixer: Arc::clone(&self.mixer),
            id,
        }))
    }
}

/// Player handle for one mixer voice
pub struct MixerVoice {
    mixer: Arc<Mixer>,
    id: VoiceId,
}

impl TrackPlayer for MixerVoice {
    fn play(&mut self) -> capsule_playback::Result<()> {
        self.mixer.set_playing(self.id, true);
        Ok(())
    }

    fn pause(&mut self) -> capsule_playback::Result<()> {
        self.mixer.set_playing(self.id, false);
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) -> capsule_playback::Result<()> {
        self.mixer.set_gain(self.id, gain);
        Ok(())
    }

    fn set_looping(&mut self, looping: bool) -> capsule_playback::Result<()> {
        self.mixer.set_looping(self.id, looping);
        Ok(())
    }

    fn is_paused(&self) -> bool {
        !self.mixer.is_playing(self.id)
    }
}
