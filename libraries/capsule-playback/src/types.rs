//! Core types for ambient playback

use crate::volume::{Volume, DEFAULT_VOLUME};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-track playback state owned by the controller
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackState {
    /// Whether the user has the track switched on
    pub is_playing: bool,

    /// Track volume
    pub volume: Volume,
}

impl TrackState {
    pub fn new(volume: Volume) -> Self {
        Self {
            is_playing: false,
            volume,
        }
    }
}

/// Snapshot of one track for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackStatus {
    /// Track name
    pub name: String,

    /// Whether the user has the track switched on
    pub is_playing: bool,

    /// Volume (0.0 - 1.0)
    pub volume: f32,

    /// Whether the collaborator is actually rendering audio
    ///
    /// `None` when no player could be acquired for the source.
    pub rendering: Option<bool>,
}

/// Configuration for the controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaybackConfig {
    /// Volume every track starts at (default: 0.5)
    pub initial_volume: f32,

    /// Countdown tick period (default: 1 second)
    pub tick_period: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            initial_volume: DEFAULT_VOLUME,
            tick_period: Duration::from_secs(1),
        }
    }
}
