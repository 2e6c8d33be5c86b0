//! Relaxation countdown state
//!
//! Pure state machine; the timer that drives it lives in [`crate::timer`].

use serde::{Deserialize, Serialize};

/// Preset durations offered to the user, in minutes
pub const DEFAULT_PRESETS: [u32; 4] = [5, 10, 15, 30];

/// Result of one countdown tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TickOutcome {
    /// Countdown is not running; nothing changed
    Idle,

    /// Countdown still running with this many seconds left
    Running(u32),

    /// Countdown reached zero on this tick
    Expired,
}

/// Countdown state: remaining time and whether it is running
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownState {
    remaining_seconds: u32,
    active: bool,
    /// Set once any countdown has been started this session
    started: bool,
}

impl CountdownState {
    /// Idle countdown
    pub fn new() -> Self {
        Self::default()
    }

    /// Start (or restart) from `minutes`
    ///
    /// Previous remaining time is discarded.
    pub fn start(&mut self, minutes: u32) {
        self.remaining_seconds = minutes.saturating_mul(60);
        self.active = self.remaining_seconds > 0;
        self.started = true;
    }

    /// Advance by one second
    pub fn tick(&mut self) -> TickOutcome {
        if !self.active {
            return TickOutcome::Idle;
        }

        if self.remaining_seconds <= 1 {
            self.remaining_seconds = 0;
            self.active = false;
            TickOutcome::Expired
        } else {
            self.remaining_seconds -= 1;
            TickOutcome::Running(self.remaining_seconds)
        }
    }

    /// Stop without expiring; remaining time is kept for display
    pub fn halt(&mut self) {
        self.active = false;
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether a countdown was ever started (the remaining-time display is shown from then on)
    pub fn has_started(&self) -> bool {
        self.started
    }

    /// Remaining time as `M:SS`
    pub fn format_remaining(&self) -> String {
        format_clock(self.remaining_seconds)
    }
}

/// Render seconds as `M:SS` (minutes unpadded, seconds zero-padded)
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
