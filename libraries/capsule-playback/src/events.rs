//! Controller events
//!
//! Event-based communication for presentation sync. The controller queues
//! events as state changes; the session drains them after each command or
//! tick and renders what changed.

use serde::{Deserialize, Serialize};

/// Events emitted by the controller
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ControllerEvent {
    /// A track was started or paused by the user
    TrackToggled {
        /// Track name
        name: String,
        /// New play state
        is_playing: bool,
    },

    /// A track's volume changed
    VolumeChanged {
        /// Track name
        name: String,
        /// New volume (0.0 - 1.0)
        volume: f32,
    },

    /// A countdown was started, replacing any running one
    CountdownStarted {
        /// Total length in seconds
        seconds: u32,
    },

    /// One second elapsed
    CountdownTick {
        /// Seconds left
        remaining_seconds: u32,
    },

    /// Countdown was cancelled before reaching zero
    CountdownCancelled {
        /// Seconds that were left
        remaining_seconds: u32,
    },

    /// Countdown reached zero
    CountdownFinished,

    /// Every track was paused
    AllStopped,
}
