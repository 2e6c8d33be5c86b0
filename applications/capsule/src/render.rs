//! Text rendering for the terminal session

use capsule_playback::{format_clock, ControllerEvent, CountdownState, TrackStatus, Volume};

/// Seconds before expiry during which every tick is shown
const FINAL_SECONDS: u32 = 10;

pub fn banner(affirmation: Option<&str>) -> Vec<String> {
    let mut lines = vec![
        "Peace Capsule".to_string(),
        "A little corner of calm, just for you.".to_string(),
    ];
    if let Some(phrase) = affirmation {
        lines.push(String::new());
        lines.push(format!("  \"{}\"", phrase));
    }
    lines.push(String::new());
    lines.push("Type `help` for commands.".to_string());
    lines
}

/// One line per track, numbered from 1
pub fn track_list(tracks: &[TrackStatus]) -> Vec<String> {
    tracks
        .iter()
        .enumerate()
        .map(|(index, track)| {
            let state = if track.is_playing { "playing" } else { "paused " };
            let missing = if track.rendering.is_none() {
                "  (no audio)"
            } else {
                ""
            };
            format!(
                "  {}. {:<10} {}  {:>3}%{}",
                index + 1,
                track.name,
                state,
                Volume::new(track.volume).percent(),
                missing
            )
        })
        .collect()
}

pub fn countdown_line(countdown: &CountdownState, presets: &[u32]) -> String {
    let presets = presets
        .iter()
        .map(|m| format!("{}m", m))
        .collect::<Vec<_>>()
        .join(" ");

    if countdown.is_active() {
        format!("Timer: {} remaining", countdown.format_remaining())
    } else if countdown.has_started() {
        format!(
            "Timer: stopped at {} (presets: {})",
            countdown.format_remaining(),
            presets
        )
    } else {
        format!("Timer: off (presets: {})", presets)
    }
}

/// Line for a controller event, if it is worth showing
///
/// Countdown ticks are shown on whole minutes and through the final
/// seconds.
pub fn event_line(event: &ControllerEvent) -> Option<String> {
    match event {
        ControllerEvent::TrackToggled { name, is_playing } => Some(if *is_playing {
            format!("Playing {}", name)
        } else {
            format!("Paused {}", name)
        }),
        ControllerEvent::VolumeChanged { name, volume } => Some(format!(
            "{} volume {}%",
            name,
            Volume::new(*volume).percent()
        )),
        ControllerEvent::CountdownStarted { seconds } => {
            Some(format!("Timer started: {}", format_clock(*seconds)))
        }
        ControllerEvent::CountdownTick { remaining_seconds } => {
            let remaining = *remaining_seconds;
            let visible = remaining > 0 && (remaining % 60 == 0 || remaining <= FINAL_SECONDS);
            visible.then(|| format!("Remaining {}", format_clock(remaining)))
        }
        ControllerEvent::CountdownCancelled { remaining_seconds } => Some(format!(
            "Timer cancelled at {}",
            format_clock(*remaining_seconds)
        )),
        ControllerEvent::CountdownFinished => Some("Time is up. Take a deep breath.".to_string()),
        ControllerEvent::AllStopped => Some("All sounds stopped.".to_string()),
    }
}

pub fn help() -> Vec<String> {
    [
        "Commands:",
        "  list                     show sounds",
        "  toggle <n|name>          play or pause a sound",
        "  volume <n|name> <level>  set volume, 0.0-1.0 or 0-100%",
        "  timer <minutes>          start the relaxation timer",
        "  cancel                   cancel the timer, keep sounds playing",
        "  stop                     pause every sound",
        "  status                   show sounds and timer",
        "  affirm                   show another affirmation",
        "  letter                   show or hide the special message",
        "  help                     show this help",
        "  quit                     leave",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tick(remaining_seconds: u32) -> Option<String> {
        event_line(&ControllerEvent::CountdownTick { remaining_seconds })
    }

    #[test]
    fn ticks_shown_on_minutes_and_final_seconds() {
        assert_eq!(tick(240).as_deref(), Some("Remaining 4:00"));
        assert_eq!(tick(239), None);
        assert_eq!(tick(11), None);
        assert_eq!(tick(10).as_deref(), Some("Remaining 0:10"));
        assert_eq!(tick(1).as_deref(), Some("Remaining 0:01"));
        // Expiry is reported by CountdownFinished
        assert_eq!(tick(0), None);
    }

    #[test]
    fn track_list_numbers_from_one() {
        let tracks = vec![
            TrackStatus {
                name: "Lluvia".to_string(),
                is_playing: true,
                volume: 0.3,
                rendering: Some(true),
            },
            TrackStatus {
                name: "Mar".to_string(),
                is_playing: false,
                volume: 0.5,
                rendering: None,
            },
        ];

        let lines = track_list(&tracks);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  1. Lluvia"));
        assert!(lines[0].contains("playing"));
        assert!(lines[0].contains(" 30%"));
        assert!(lines[1].contains("(no audio)"));
    }

    #[test]
    fn countdown_line_states() {
        let mut countdown = CountdownState::new();
        assert_eq!(
            countdown_line(&countdown, &[5, 10]),
            "Timer: off (presets: 5m 10m)"
        );

        countdown.start(5);
        countdown.tick();
        assert_eq!(countdown_line(&countdown, &[5]), "Timer: 4:59 remaining");

        countdown.halt();
        assert_eq!(
            countdown_line(&countdown, &[5]),
            "Timer: stopped at 4:59 (presets: 5m)"
        );
    }

    #[test]
    fn banner_includes_affirmation() {
        let lines = banner(Some("Tu paz es prioridad."));
        assert!(lines.iter().any(|l| l.contains("Tu paz es prioridad.")));
        assert!(!banner(None).iter().any(|l| l.contains('"')));
    }
}
