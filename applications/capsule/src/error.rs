/// Application errors
use capsule_playback::PlaybackError;
use thiserror::Error;

/// Result type for the application layer
pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// Playback layer error
    #[error(transparent)]
    Playback(#[from] PlaybackError),

    /// Terminal IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err.to_string())
    }
}
