//! Sound registry
//!
//! The fixed, ordered list of loopable tracks for a session.

use crate::error::{PlaybackError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A named, loopable audio source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Unique track name
    pub name: String,

    /// Location of the audio data, resolved by the playback collaborator
    pub source: PathBuf,
}

impl Track {
    pub fn new(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }
}

/// Ordered set of tracks, fixed at construction
#[derive(Debug, Clone, Default)]
pub struct SoundRegistry {
    tracks: Vec<Track>,
}

impl SoundRegistry {
    /// Build a registry from an ordered track list
    ///
    /// # Returns
    /// * `Err(DuplicateTrack)` - two tracks share a name
    /// * `Err(InvalidTrackName)` - a name is empty or blank
    pub fn new(tracks: Vec<Track>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(tracks.len());
        for track in &tracks {
            if track.name.trim().is_empty() {
                return Err(PlaybackError::InvalidTrackName(track.name.clone()));
            }
            if !seen.insert(track.name.as_str()) {
                return Err(PlaybackError::DuplicateTrack(track.name.clone()));
            }
        }

        Ok(Self { tracks })
    }

    /// Build a registry from `(name, file)` pairs, resolving relative files against `dir`
    pub fn from_dir<I, N, F>(dir: impl AsRef<Path>, entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, F)>,
        N: Into<String>,
        F: AsRef<Path>,
    {
        let dir = dir.as_ref();
        let tracks = entries
            .into_iter()
            .map(|(name, file)| Track::new(name, dir.join(file)))
            .collect();
        Self::new(tracks)
    }

    /// All tracks in registration order
    pub fn list_tracks(&self) -> &[Track] {
        &self.tracks
    }

    /// Look up a track by name
    pub fn get(&self, name: &str) -> Option<&Track> {
        self.tracks.iter().find(|t| t.name == name)
    }

    /// Registration index of a track
    pub fn position(&self, name: &str) -> Option<usize> {
        self.tracks.iter().position(|t| t.name == name)
    }

    /// Track names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tracks.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}
