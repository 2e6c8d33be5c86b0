//! Multi-voice looping mixer
//!
//! Shared between the controller side (voice commands) and the real-time
//! audio callback (mixing). Each voice is one decoded track.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Index of a voice in the mixer
pub type VoiceId = usize;

/// One decoded track and its playback state
#[derive(Debug)]
struct Voice {
    /// Interleaved stereo samples - Arc so callers can share decoded clips
    samples: Arc<Vec<f32>>,
    /// Position in samples (not frames)
    position: usize,
    playing: bool,
    looping: bool,
    gain: f32,
}

/// Sum of all playing voices
#[derive(Debug, Default)]
pub struct Mixer {
    voices: Mutex<Vec<Voice>>,
}

impl Mixer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a decoded clip; the voice starts paused at unity gain
    pub fn add_voice(&self, samples: Arc<Vec<f32>>) -> VoiceId {
        let mut voices = self.voices();
        voices.push(Voice {
            samples,
            position: 0,
            playing: false,
            looping: false,
            gain: 1.0,
        });
        voices.len() - 1
    }

    pub fn set_playing(&self, id: VoiceId, playing: bool) {
        if let Some(voice) = self.voices().get_mut(id) {
            voice.playing = playing;
        }
    }

    pub fn set_gain(&self, id: VoiceId, gain: f32) {
        if let Some(voice) = self.voices().get_mut(id) {
            voice.gain = gain.clamp(0.0, 1.0);
        }
    }

    pub fn set_looping(&self, id: VoiceId, looping: bool) {
        if let Some(voice) = self.voices().get_mut(id) {
            voice.looping = looping;
        }
    }

    pub fn is_playing(&self, id: VoiceId) -> bool {
        self.voices().get(id).is_some_and(|v| v.playing)
    }

    pub fn voice_count(&self) -> usize {
        self.voices().len()
    }

    /// Mix every playing voice into `output`
    ///
    /// `output` is interleaved with `channels` channels per frame. Voices
    /// are stereo: mono outputs get the average, outputs with more than two
    /// channels get stereo on the first two. The result is clamped to
    /// `[-1.0, 1.0]`.
    pub fn mix(&self, output: &mut [f32], channels: usize) {
        output.fill(0.0);
        if channels == 0 {
            return;
        }

        let frames = output.len() / channels;
        let mut voices = self.voices();

        for voice in voices.iter_mut().filter(|v| v.playing) {
            let len = voice.samples.len();
            if len < 2 {
                continue;
            }

            let mut pos = voice.position;
            for frame in 0..frames {
                if pos + 1 >= len {
                    if voice.looping {
                        pos = 0;
                    } else {
                        // Reached end, stop the voice
                        voice.playing = false;
                        pos = 0;
                        break;
                    }
                }

                let left = voice.samples[pos] * voice.gain;
                let right = voice.samples[pos + 1] * voice.gain;
                pos += 2;

                let base = frame * channels;
                if channels == 1 {
                    output[base] += (left + right) * 0.5;
                } else {
                    output[base] += left;
                    output[base + 1] += right;
                }
            }
            voice.position = pos;
        }

        for sample in output.iter_mut() {
            *sample = sample.clamp(-1.0, 1.0);
        }
    }

    // Poisoning only means a panic elsewhere; the voice data is still usable
    fn voices(&self) -> MutexGuard<'_, Vec<Voice>> {
        self.voices.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
