//! Integration tests for the playback & timer controller
//!
//! Drives the controller the way the session loop does and checks what the
//! audio collaborator was told to do.

mod common;

use capsule_playback::{ControllerEvent, TickOutcome};
use common::{calls_for, recorded_controller, Call, RecordingBackend};

#[test]
fn players_are_opened_looping_at_initial_volume() {
    let mut backend = RecordingBackend::new();
    let _ctl = recorded_controller(&mut backend);

    for name in ["Lluvia", "Mar", "Chimenea", "Bosque", "Home"] {
        assert_eq!(
            calls_for(&backend.log, name),
            vec![Call::Looping(true), Call::Gain(0.5)],
            "unexpected setup for {name}"
        );
    }
}

#[test]
fn toggle_drives_player() {
    let mut backend = RecordingBackend::new();
    let mut ctl = recorded_controller(&mut backend);

    ctl.toggle("Bosque");
    ctl.toggle("Bosque");

    let calls = calls_for(&backend.log, "Bosque");
    assert_eq!(&calls[2..], &[Call::Play, Call::Pause]);
}

#[test]
fn volume_propagates_while_paused() {
    let mut backend = RecordingBackend::new();
    let mut ctl = recorded_controller(&mut backend);

    assert_eq!(ctl.set_volume("Home", 0.2), Some(0.2));
    assert_eq!(ctl.is_playing("Home"), Some(false));

    let calls = calls_for(&backend.log, "Home");
    assert_eq!(calls.last(), Some(&Call::Gain(0.2)));
}

#[test]
fn toggle_unknown_changes_nothing() {
    let mut backend = RecordingBackend::new();
    let mut ctl = recorded_controller(&mut backend);
    ctl.toggle("Mar");
    ctl.drain_events();

    let before = ctl.tracks();
    let log_len = backend.log.lock().unwrap().len();

    assert_eq!(ctl.toggle("nonexistent"), None);

    assert_eq!(ctl.tracks(), before);
    assert_eq!(backend.log.lock().unwrap().len(), log_len);
    assert!(ctl.drain_events().is_empty());
}

#[test]
fn full_countdown_stops_all_exactly_once() {
    let mut backend = RecordingBackend::new();
    let mut ctl = recorded_controller(&mut backend);

    ctl.toggle("Lluvia");
    ctl.toggle("Chimenea");
    ctl.toggle("Home");
    ctl.start_countdown(5).unwrap();
    ctl.drain_events();

    for _ in 0..(5 * 60) {
        ctl.tick();
    }

    assert!(!ctl.countdown().is_active());
    assert_eq!(ctl.countdown().remaining_seconds(), 0);
    assert!(ctl.tracks().iter().all(|t| !t.is_playing));
    assert!(ctl.tracks().iter().all(|t| t.rendering == Some(false)));

    let events = ctl.drain_events();
    let stops = events
        .iter()
        .filter(|e| matches!(e, ControllerEvent::AllStopped))
        .count();
    assert_eq!(stops, 1);

    let ticks = events
        .iter()
        .filter(|e| matches!(e, ControllerEvent::CountdownTick { .. }))
        .count();
    assert_eq!(ticks, 300);

    // Every player got a pause on expiry
    for name in ["Lluvia", "Mar", "Chimenea", "Bosque", "Home"] {
        assert_eq!(calls_for(&backend.log, name).last(), Some(&Call::Pause));
    }

    // Extra ticks after expiry are inert
    assert_eq!(ctl.tick(), TickOutcome::Idle);
    assert!(ctl.drain_events().is_empty());
}

#[test]
fn expiry_with_nothing_playing_still_stops() {
    let mut backend = RecordingBackend::new();
    let mut ctl = recorded_controller(&mut backend);
    ctl.start_countdown(1).unwrap();

    let outcomes: Vec<_> = (0..60).map(|_| ctl.tick()).collect();
    assert_eq!(outcomes[0], TickOutcome::Running(59));
    assert_eq!(outcomes[58], TickOutcome::Running(1));
    assert_eq!(outcomes[59], TickOutcome::Expired);
    assert!(ctl.drain_events().contains(&ControllerEvent::AllStopped));
}

#[test]
fn second_preset_supersedes_first() {
    let mut backend = RecordingBackend::new();
    let mut ctl = recorded_controller(&mut backend);

    ctl.start_countdown(5).unwrap();
    let first = ctl.current_timer().unwrap();
    ctl.start_countdown(10).unwrap();

    assert!(ctl.countdown().is_active());
    assert_eq!(ctl.countdown().remaining_seconds(), 600);
    assert_eq!(ctl.format_remaining(), "10:00");

    // Ticks still in flight from the first timer are dropped
    for _ in 0..5 {
        assert_eq!(ctl.on_timer(first), TickOutcome::Idle);
    }
    assert_eq!(ctl.countdown().remaining_seconds(), 600);
}

#[test]
fn missing_source_keeps_state_only() {
    let mut backend = RecordingBackend::with_missing(&["Mar"]);
    let mut ctl = recorded_controller(&mut backend);

    assert_eq!(ctl.toggle("Mar"), Some(true));
    assert_eq!(ctl.set_volume("Mar", 0.9), Some(0.9));

    let mar = ctl.tracks().into_iter().find(|t| t.name == "Mar").unwrap();
    assert!(mar.is_playing);
    assert_eq!(mar.rendering, None);
    assert!(calls_for(&backend.log, "Mar").is_empty());

    // Other tracks are unaffected
    assert_eq!(ctl.toggle("Bosque"), Some(true));
    assert_eq!(calls_for(&backend.log, "Bosque").last(), Some(&Call::Play));
}

#[test]
fn drop_pauses_players() {
    let mut backend = RecordingBackend::new();
    {
        let mut ctl = recorded_controller(&mut backend);
        ctl.toggle("Lluvia");
    }

    assert_eq!(calls_for(&backend.log, "Lluvia").last(), Some(&Call::Pause));
}

#[test]
fn events_follow_user_actions() {
    let mut backend = RecordingBackend::new();
    let mut ctl = recorded_controller(&mut backend);

    ctl.toggle("Mar");
    ctl.set_volume("Mar", 0.75);
    ctl.start_countdown(15).unwrap();
    ctl.tick();

    assert_eq!(
        ctl.drain_events(),
        vec![
            ControllerEvent::TrackToggled {
                name: "Mar".to_string(),
                is_playing: true,
            },
            ControllerEvent::VolumeChanged {
                name: "Mar".to_string(),
                volume: 0.75,
            },
            ControllerEvent::CountdownStarted { seconds: 900 },
            ControllerEvent::CountdownTick {
                remaining_seconds: 899
            },
        ]
    );
}
