//! Error types for ambient playback

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// Two registry entries share a name
    #[error("Duplicate track name: {0}")]
    DuplicateTrack(String),

    /// Track name is empty or blank
    #[error("Invalid track name: {0:?}")]
    InvalidTrackName(String),

    /// Countdown duration must be a positive number of minutes
    #[error("Invalid countdown duration: {0} minutes")]
    InvalidCountdown(u32),

    /// Audio source error (reported by the playback collaborator)
    #[error("Audio source error: {0}")]
    AudioSource(String),

    /// Invalid operation
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
