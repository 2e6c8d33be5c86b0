//! Per-track volume
//!
//! Volume is a linear gain in `[0.0, 1.0]`, handed to the playback
//! collaborator as-is (the same scale a range slider produces).

use serde::{Deserialize, Serialize};

/// Default per-track volume
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Linear track volume, always within `[0.0, 1.0]`
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f32", into = "f32")]
pub struct Volume(f32);

impl Volume {
    /// Silence
    pub const MIN: Self = Self(0.0);

    /// Unity gain
    pub const MAX: Self = Self(1.0);

    /// Create a volume, clamping into range
    ///
    /// NaN maps to silence.
    pub fn new(value: f32) -> Self {
        if value.is_nan() {
            return Self::MIN;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Linear gain multiplier
    pub fn gain(self) -> f32 {
        self.0
    }

    /// Check if the track is silent at this volume
    pub fn is_silent(self) -> bool {
        self.0 == 0.0
    }

    /// Volume as a whole percentage (0-100), for display
    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self(DEFAULT_VOLUME)
    }
}

impl From<f32> for Volume {
    fn from(value: f32) -> Self {
        Self::new(value)
    }
}

impl From<Volume> for f32 {
    fn from(volume: Volume) -> Self {
        volume.0
    }
}
