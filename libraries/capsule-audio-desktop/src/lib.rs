//! Desktop audio playback for Peace Capsule
//!
//! This crate provides [`DesktopBackend`], the `AudioBackend` implementation
//! used on desktop:
//!
//! - Decoding of any Symphonia-supported format (MP3, FLAC, OGG, WAV, ...)
//! - Sample rate conversion to the device rate with Rubato
//! - A looping multi-voice mixer with per-voice gain
//! - Cross-platform output through CPAL
//!
//! # Example
//!
//! ```no_run
//! use capsule_audio_desktop::DesktopBackend;
//! use capsule_playback::{
//!     Controller, ManualScheduler, PlaybackConfig, SoundRegistry, Track,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = SoundRegistry::new(vec![Track::new("Lluvia", "sounds/lluvia.mp3")])?;
//! let mut backend = DesktopBackend::new()?;
//!
//! let mut controller = Controller::new(
//!     registry,
//!     &mut backend,
//!     Box::new(ManualScheduler),
//!     PlaybackConfig::default(),
//! );
//! controller.toggle("Lluvia");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

mod decode;
mod error;
mod mixer;
mod output;

pub use decode::{decode_file, decode_native, DecodedClip};
pub use error::{AudioError, Result};
pub use mixer::{Mixer, VoiceId};
pub use output::{DesktopBackend, MixerOutput, MixerVoice};
