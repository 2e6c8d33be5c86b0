/// Capsule configuration
use crate::error::{AppError, Result};
use capsule_playback::{PlaybackConfig, SoundRegistry, DEFAULT_PRESETS, DEFAULT_VOLUME};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "capsule.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CapsuleConfig {
    #[serde(default = "default_audio")]
    pub audio: AudioSettings,

    #[serde(default = "default_sounds")]
    pub sounds: Vec<SoundEntry>,

    #[serde(default = "default_timer")]
    pub timer: TimerSettings,

    #[serde(default = "default_content")]
    pub content: ContentSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AudioSettings {
    /// Render audio on the default output device
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_initial_volume")]
    pub initial_volume: f32,

    /// Directory relative sound files are resolved against
    #[serde(default = "default_sounds_dir")]
    pub sounds_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SoundEntry {
    pub name: String,
    pub file: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TimerSettings {
    /// Countdown presets offered in the status view, in minutes
    #[serde(default = "default_presets")]
    pub presets: Vec<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ContentSettings {
    #[serde(default = "default_affirmations")]
    pub affirmations: Vec<String>,

    #[serde(default = "default_message")]
    pub message: String,
}

impl CapsuleConfig {
    /// Load configuration from file and environment
    ///
    /// `path` must exist when given; otherwise `./capsule.toml` is used if
    /// present. Environment variables prefixed `CAPSULE_` override file
    /// values, with `__` between nesting levels (`CAPSULE_AUDIO__ENABLED`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) => {
                settings = settings.add_source(config::File::from(path.to_path_buf()));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        settings = settings.add_source(
            config::Environment::with_prefix("CAPSULE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Ok(settings.build()?.try_deserialize()?)
    }

    /// Parse configuration from TOML text (no environment overrides)
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    /// Render the effective configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| AppError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.sounds.is_empty() {
            return Err(AppError::Config("at least one sound is required".to_string()));
        }

        let mut names = HashSet::new();
        for sound in &self.sounds {
            if sound.name.trim().is_empty() {
                return Err(AppError::Config(format!(
                    "sound {:?} has an empty name",
                    sound.file
                )));
            }
            if !names.insert(sound.name.as_str()) {
                return Err(AppError::Config(format!(
                    "duplicate sound name {:?}",
                    sound.name
                )));
            }
        }

        let volume = self.audio.initial_volume;
        if !(0.0..=1.0).contains(&volume) {
            return Err(AppError::Config(format!(
                "initial_volume must be between 0.0 and 1.0, got {}",
                volume
            )));
        }

        if self.timer.presets.is_empty() || self.timer.presets.contains(&0) {
            return Err(AppError::Config(
                "timer presets must be a non-empty list of positive minutes".to_string(),
            ));
        }

        if self.content.affirmations.is_empty() {
            return Err(AppError::Config(
                "at least one affirmation is required".to_string(),
            ));
        }

        Ok(())
    }

    /// Sound registry with files resolved against `audio.sounds_dir`
    pub fn registry(&self) -> Result<SoundRegistry> {
        let entries = self
            .sounds
            .iter()
            .map(|sound| (sound.name.clone(), sound.file.clone()));
        Ok(SoundRegistry::from_dir(&self.audio.sounds_dir, entries)?)
    }

    /// Controller settings
    ///
    /// The countdown always ticks once per second.
    pub fn playback(&self) -> PlaybackConfig {
        PlaybackConfig {
            initial_volume: self.audio.initial_volume,
            ..PlaybackConfig::default()
        }
    }
}

// Default values
fn default_audio() -> AudioSettings {
    AudioSettings {
        enabled: default_enabled(),
        initial_volume: default_initial_volume(),
        sounds_dir: default_sounds_dir(),
    }
}

fn default_enabled() -> bool {
    true
}

fn default_initial_volume() -> f32 {
    DEFAULT_VOLUME
}

fn default_sounds_dir() -> PathBuf {
    PathBuf::from("sounds")
}

fn default_sounds() -> Vec<SoundEntry> {
    [
        ("Lluvia", "lluvia.mp3"),
        ("Mar", "mar.mp3"),
        ("Chimenea", "chimenea.mp3"),
        ("Bosque", "bosque.mp3"),
        ("Home", "home.mp3"),
    ]
    .into_iter()
    .map(|(name, file)| SoundEntry {
        name: name.to_string(),
        file: PathBuf::from(file),
    })
    .collect()
}

fn default_timer() -> TimerSettings {
    TimerSettings {
        presets: default_presets(),
    }
}

fn default_presets() -> Vec<u32> {
    DEFAULT_PRESETS.to_vec()
}

fn default_content() -> ContentSettings {
    ContentSettings {
        affirmations: default_affirmations(),
        message: default_message(),
    }
}

fn default_affirmations() -> Vec<String> {
    [
        "Respira profundo, estás haciendo lo mejor que puedes.",
        "Hoy es un buen día para regalarte calma.",
        "No tienes que poder con todo, solo contigo.",
        "Eres valiosa tal como eres.",
        "Permítete descansar, sin culpa.",
        "Todo está bien en este momento.",
        "Tu paz es prioridad.",
        "Cierra los ojos, el mundo puede esperar un momento.",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_message() -> String {
    "Querida alma valiente,\n\n\
     Sé que a veces el mundo puede ser abrumador, y que llevas más peso del que muchos \
     imaginan. Esta pequeña cápsula no es más que un recordatorio: mereces paz, calma y \
     momentos solo para ti.\n\n\
     Gracias por existir, por resistir y por seguir siendo tú.\n\n\
     Con mucho cariño,\n\
     Tu persona especial 💙"
        .to_string()
}

impl Default for CapsuleConfig {
    fn default() -> Self {
        Self {
            audio: default_audio(),
            sounds: default_sounds(),
            timer: default_timer(),
            content: default_content(),
        }
    }
}
