//! Configuration loading tests

use capsule_app::{AppError, CapsuleConfig};
use std::path::PathBuf;
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn partial_file_keeps_defaults() {
    let config = CapsuleConfig::from_toml_str(
        r#"
        [audio]
        enabled = false

        [timer]
        presets = [1, 2]
        "#,
    )
    .unwrap();
    config.validate().unwrap();

    assert!(!config.audio.enabled);
    assert_eq!(config.audio.initial_volume, 0.5);
    assert_eq!(config.audio.sounds_dir, PathBuf::from("sounds"));
    assert_eq!(config.timer.presets, vec![1, 2]);
    assert_eq!(config.sounds.len(), 5);
}

#[test]
fn custom_sounds_replace_defaults() {
    let config = CapsuleConfig::from_toml_str(
        r#"
        [audio]
        sounds_dir = "/srv/ambient"

        [[sounds]]
        name = "Lluvia"
        file = "rain.ogg"

        [[sounds]]
        name = "Viento"
        file = "/elsewhere/wind.flac"
        "#,
    )
    .unwrap();
    config.validate().unwrap();

    let registry = config.registry().unwrap();
    let names: Vec<&str> = registry.names().collect();
    assert_eq!(names, vec!["Lluvia", "Viento"]);
    assert_eq!(
        registry.get("Lluvia").unwrap().source,
        PathBuf::from("/srv/ambient/rain.ogg")
    );
    // Absolute files are kept as-is
    assert_eq!(
        registry.get("Viento").unwrap().source,
        PathBuf::from("/elsewhere/wind.flac")
    );
}

#[test]
fn countdown_ticks_once_per_second_regardless_of_file() {
    // Older files may still carry a tick period; it is not honoured
    let config =
        CapsuleConfig::from_toml_str("[timer]\npresets = [5]\ntick_millis = 250\n").unwrap();
    config.validate().unwrap();

    assert_eq!(config.playback().tick_period, Duration::from_secs(1));
    let text = config.to_toml_string().unwrap();
    assert!(!text.contains("tick"), "tick period leaked into config:\n{text}");
}

#[test]
fn validation_rejects_bad_values() {
    let cases = [
        "[audio]\ninitial_volume = 1.5",
        "[timer]\npresets = [5, 0]",
        concat!(
            "[[sounds]]\nname = \"Mar\"\nfile = \"a.mp3\"\n",
            "[[sounds]]\nname = \"Mar\"\nfile = \"b.mp3\"",
        ),
        "[[sounds]]\nname = \"  \"\nfile = \"a.mp3\"",
    ];

    for text in cases {
        let config = CapsuleConfig::from_toml_str(text).unwrap();
        assert!(
            matches!(config.validate(), Err(AppError::Config(_))),
            "accepted: {text}"
        );
    }
}

#[test]
fn effective_config_round_trips_through_toml() {
    let config = CapsuleConfig::default();
    let text = config.to_toml_string().unwrap();
    let parsed = CapsuleConfig::from_toml_str(&text).unwrap();

    assert_eq!(parsed.sounds.len(), config.sounds.len());
    assert_eq!(parsed.content.message, config.content.message);
    assert_eq!(parsed.timer.presets, config.timer.presets);
}

#[test]
fn load_reads_file_and_environment() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("capsule.toml");
    std::fs::write(&path, "[audio]\ninitial_volume = 0.25\n").unwrap();

    std::env::set_var("CAPSULE_AUDIO__ENABLED", "false");
    let config = CapsuleConfig::load(Some(&path));
    std::env::remove_var("CAPSULE_AUDIO__ENABLED");

    let config = config.unwrap();
    assert_eq!(config.audio.initial_volume, 0.25);
    assert!(!config.audio.enabled);

    let missing = CapsuleConfig::load(Some(&dir.path().join("nope.toml")));
    assert!(matches!(missing, Err(AppError::Config(_))));
}
