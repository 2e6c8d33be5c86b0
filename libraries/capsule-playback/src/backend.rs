//! Platform-agnostic audio playback collaborator
//!
//! The controller never decodes or renders audio itself. It acquires one
//! [`TrackPlayer`] per registered track from an [`AudioBackend`] and issues
//! play/pause/gain commands to it (CPAL + Symphonia on desktop, an in-memory
//! stand-in for headless runs).

use crate::error::Result;
use crate::registry::Track;

/// Source of per-track playback handles
pub trait AudioBackend {
    /// Acquire a playable handle bound to the track's source
    ///
    /// # Returns
    /// * `Ok(player)` - Handle ready, initially paused
    /// * `Err(_)` - Source missing or undecodable
    fn open(&mut self, track: &Track) -> Result<Box<dyn TrackPlayer>>;
}

/// Playback handle for a single track
pub trait TrackPlayer: Send {
    /// Start (or resume) rendering the source
    fn play(&mut self) -> Result<()>;

    /// Pause rendering, keeping the position
    fn pause(&mut self) -> Result<()>;

    /// Set linear gain (0.0 - 1.0)
    fn set_gain(&mut self, gain: f32) -> Result<()>;

    /// Restart from the beginning when the source ends
    fn set_looping(&mut self, looping: bool) -> Result<()>;

    /// Check if the handle is currently paused
    fn is_paused(&self) -> bool;
}

/// Backend that renders nothing
///
/// Players remember their commands, so the rest of the system behaves the
/// same as with a real device. Used for `--silent` runs and tests.
#[derive(Debug, Default)]
pub struct SilentBackend {
    opened: usize,
}

impl SilentBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles handed out
    pub fn opened(&self) -> usize {
        self.opened
    }
}

impl AudioBackend for SilentBackend {
    fn open(&mut self, track: &Track) -> Result<Box<dyn TrackPlayer>> {
        tracing::debug!("Opening silent player for {}", track.name);
        self.opened += 1;
        Ok(Box::new(SilentPlayer::default()))
    }
}

/// In-memory player returned by [`SilentBackend`]
#[derive(Debug, Clone)]
pub struct SilentPlayer {
    paused: bool,
    gain: f32,
    looping: bool,
}

impl SilentPlayer {
    pub fn gain(&self) -> f32 {
        self.gain
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }
}

impl Default for SilentPlayer {
    fn default() -> Self {
        Self {
            paused: true,
            gain: 1.0,
            looping: false,
        }
    }
}

impl TrackPlayer for SilentPlayer {
    fn play(&mut self) -> Result<()> {
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        self.paused = true;
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) -> Result<()> {
        self.gain = gain;
        Ok(())
    }

    fn set_looping(&mut self, looping: bool) -> Result<()> {
        self.looping = looping;
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}
