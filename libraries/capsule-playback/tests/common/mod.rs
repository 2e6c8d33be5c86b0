//! Shared helpers for controller tests

#![allow(dead_code)]

use capsule_playback::{
    AudioBackend, Controller, ManualScheduler, PlaybackConfig, PlaybackError, SoundRegistry,
    Track, TrackPlayer,
};
use std::sync::{Arc, Mutex};

/// Command observed by a recording player
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Play,
    Pause,
    Gain(f32),
    Looping(bool),
}

/// Log of `(track name, call)` shared between backend and test
pub type CallLog = Arc<Mutex<Vec<(String, Call)>>>;

/// Backend whose players record every command
///
/// Tracks listed in `missing` fail to open, like a source that does not exist.
#[derive(Default)]
pub struct RecordingBackend {
    pub log: CallLog,
    pub missing: Vec<String>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_missing(names: &[&str]) -> Self {
        Self {
            log: CallLog::default(),
            missing: names.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl AudioBackend for RecordingBackend {
    fn open(&mut self, track: &Track) -> capsule_playback::Result<Box<dyn TrackPlayer>> {
        if self.missing.contains(&track.name) {
            return Err(PlaybackError::AudioSource(format!(
                "{} not found",
                track.source.display()
            )));
        }

        Ok(Box::new(RecordingPlayer {
            name: track.name.clone(),
            log: Arc::clone(&self.log),
            paused: true,
        }))
    }
}

pub struct RecordingPlayer {
    name: String,
    log: CallLog,
    paused: bool,
}

impl RecordingPlayer {
    fn record(&self, call: Call) {
        self.log.lock().unwrap().push((self.name.clone(), call));
    }
}

impl TrackPlayer for RecordingPlayer {
    fn play(&mut self) -> capsule_playback::Result<()> {
        self.paused = false;
        self.record(Call::Play);
        Ok(())
    }

    fn pause(&mut self) -> capsule_playback::Result<()> {
        self.paused = true;
        self.record(Call::Pause);
        Ok(())
    }

    fn set_gain(&mut self, gain: f32) -> capsule_playback::Result<()> {
        self.record(Call::Gain(gain));
        Ok(())
    }

    fn set_looping(&mut self, looping: bool) -> capsule_playback::Result<()> {
        self.record(Call::Looping(looping));
        Ok(())
    }

    fn is_paused(&self) -> bool {
        self.paused
    }
}

/// The five ambient sounds of the default capsule
pub fn ambient_registry() -> SoundRegistry {
    SoundRegistry::from_dir(
        "sounds",
        [
            ("Lluvia", "lluvia.mp3"),
            ("Mar", "mar.mp3"),
            ("Chimenea", "chimenea.mp3"),
            ("Bosque", "bosque.mp3"),
            ("Home", "home.mp3"),
        ],
    )
    .unwrap()
}

/// Manually ticked controller over a recording backend
pub fn recorded_controller(backend: &mut RecordingBackend) -> Controller {
    Controller::new(
        ambient_registry(),
        backend,
        Box::new(ManualScheduler),
        PlaybackConfig::default(),
    )
}

/// Calls recorded for one track
pub fn calls_for(log: &CallLog, name: &str) -> Vec<Call> {
    log.lock()
        .unwrap()
        .iter()
        .filter(|(n, _)| n == name)
        .map(|(_, c)| c.clone())
        .collect()
}
