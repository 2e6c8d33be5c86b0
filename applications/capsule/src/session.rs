//! Interactive session
//!
//! Owns the controller and the presentation content, turns commands and
//! timer ticks into output lines.

use crate::command::{Command, TrackRef};
use crate::config::CapsuleConfig;
use crate::error::Result;
use crate::render;
use capsule_playback::{
    Affirmations, AudioBackend, Controller, MessagePanel, TimerId, TokioTickScheduler,
};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tracing::{debug, info, warn};

/// Output of one command
#[derive(Debug, Default, PartialEq)]
pub struct Reply {
    pub lines: Vec<String>,
    /// End the session after writing the lines
    pub quit: bool,
}

impl Reply {
    fn say(lines: Vec<String>) -> Self {
        Self { lines, quit: false }
    }
}

pub struct Session {
    controller: Controller,
    ticks: UnboundedReceiver<TimerId>,
    affirmations: Affirmations,
    panel: MessagePanel,
    presets: Vec<u32>,
    // Commands run before reading input (from the command line)
    queued: Vec<Command>,
}

impl Session {
    /// Build a session, opening every configured sound through `backend`
    ///
    /// Countdowns may only be started from within a tokio runtime.
    pub fn new(config: &CapsuleConfig, backend: &mut dyn AudioBackend) -> Result<Self> {
        let (tick_tx, ticks) = mpsc::unbounded_channel();
        let controller = Controller::new(
            config.registry()?,
            backend,
            Box::new(TokioTickScheduler::new(tick_tx)),
            config.playback(),
        );

        Ok(Self {
            controller,
            ticks,
            affirmations: Affirmations::new(config.content.affirmations.clone()),
            panel: MessagePanel::new(config.content.message.clone()),
            presets: config.timer.presets.clone(),
            queued: Vec::new(),
        })
    }

    /// Run `command` first thing in [`Session::run`]
    pub fn queue(&mut self, command: Command) {
        self.queued.push(command);
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn affirmation(&self) -> Option<&str> {
        self.affirmations.current()
    }

    pub fn panel(&self) -> &MessagePanel {
        &self.panel
    }

    /// Nothing playing and no countdown running
    pub fn is_idle(&self) -> bool {
        !self.controller.countdown().is_active()
            && self.controller.tracks().iter().all(|t| !t.is_playing)
    }

    pub fn greeting(&self) -> Vec<String> {
        let mut lines = render::banner(self.affirmations.current());
        lines.push(String::new());
        lines.extend(render::track_list(&self.controller.tracks()));
        lines
    }

    /// Registry name for a track reference
    ///
    /// Exact names win over positions and case-insensitive matches, so a
    /// sound named `1984` is still reachable by name.
    fn resolve(&self, track: &TrackRef) -> Option<String> {
        let registry = self.controller.registry();
        match track {
            TrackRef::Index(index) => registry
                .get(&index.to_string())
                .or_else(|| registry.list_tracks().get(index.checked_sub(1)?))
                .map(|t| t.name.clone()),
            TrackRef::Name(name) => registry
                .get(name)
                .map(|t| t.name.clone())
                .or_else(|| {
                    registry
                        .names()
                        .find(|n| n.eq_ignore_ascii_case(name))
                        .map(String::from)
                }),
        }
    }

    pub fn handle(&mut self, command: Command) -> Reply {
        debug!("Handling {:?}", command);

        let mut reply = match command {
            Command::List => Reply::say(render::track_list(&self.controller.tracks())),
            Command::Toggle(track) => match self.resolve(&track) {
                Some(name) => {
                    self.controller.toggle(&name);
                    Reply::default()
                }
                None => Reply::say(vec![format!("No sound {}", track)]),
            },
            Command::Volume(track, level) => match self.resolve(&track) {
                Some(name) => {
                    self.controller.set_volume(&name, level);
                    Reply::default()
                }
                None => Reply::say(vec![format!("No sound {}", track)]),
            },
            Command::Timer(minutes) => match self.controller.start_countdown(minutes) {
                Ok(()) => Reply::default(),
                Err(e) => Reply::say(vec![format!("Cannot start timer: {}", e)]),
            },
            Command::Cancel => {
                if self.controller.cancel_countdown() {
                    Reply::default()
                } else {
                    Reply::say(vec!["No timer running.".to_string()])
                }
            }
            Command::Stop => {
                self.controller.stop_all();
                Reply::default()
            }
            Command::Status => {
                let mut lines = render::track_list(&self.controller.tracks());
                lines.push(render::countdown_line(
                    self.controller.countdown(),
                    &self.presets,
                ));
                lines.push(format!("[letter] {}", self.panel.toggle_label()));
                Reply::say(lines)
            }
            Command::Affirm => {
                let phrase = self.affirmations.rotate().unwrap_or_default();
                Reply::say(vec![format!("\"{}\"", phrase)])
            }
            Command::Letter => {
                self.panel.toggle();
                match self.panel.text() {
                    Some(text) => Reply::say(text.lines().map(String::from).collect()),
                    None => Reply::say(vec!["Message hidden.".to_string()]),
                }
            }
            Command::Help => Reply::say(render::help()),
            Command::Quit => Reply {
                lines: Vec::new(),
                quit: true,
            },
        };

        reply.lines.extend(self.event_lines());
        reply
    }

    /// Deliver a timer tick
    pub fn on_tick(&mut self, id: TimerId) -> Vec<String> {
        self.controller.on_timer(id);
        self.event_lines()
    }

    fn event_lines(&mut self) -> Vec<String> {
        self.controller
            .drain_events()
            .iter()
            .filter_map(render::event_line)
            .collect()
    }

    /// Drive the session until `quit`, Ctrl-C, or end of input
    ///
    /// After end of input the session keeps running while a countdown is
    /// active or any sound is playing. Every sound is paused on return.
    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        write_lines(&mut output, &self.greeting()).await?;

        let mut quit = false;
        for command in std::mem::take(&mut self.queued) {
            let reply = self.handle(command);
            write_lines(&mut output, &reply.lines).await?;
            if reply.quit {
                quit = true;
                break;
            }
        }

        let mut lines = input.lines();
        let mut input_open = true;

        let interrupt = tokio::signal::ctrl_c();
        tokio::pin!(interrupt);
        let mut interrupt_live = true;

        while !quit {
            if !input_open && self.is_idle() {
                debug!("Input closed and nothing left to do");
                break;
            }

            tokio::select! {
                line = lines.next_line(), if input_open => {
                    match line? {
                        Some(line) if line.trim().is_empty() => {}
                        Some(line) => match line.parse::<Command>() {
                            Ok(command) => {
                                let reply = self.handle(command);
                                write_lines(&mut output, &reply.lines).await?;
                                quit = reply.quit;
                            }
                            Err(e) => {
                                let message = format!("{}. Type `help` for commands.", e);
                                write_lines(&mut output, &[message]).await?;
                            }
                        },
                        None => input_open = false,
                    }
                }
                Some(id) = self.ticks.recv() => {
                    let tick_lines = self.on_tick(id);
                    write_lines(&mut output, &tick_lines).await?;
                }
                result = &mut interrupt, if interrupt_live => {
                    interrupt_live = false;
                    match result {
                        Ok(()) => {
                            info!("Interrupted");
                            quit = true;
                        }
                        Err(e) => warn!("Cannot listen for Ctrl-C: {}", e),
                    }
                }
            }
        }

        self.controller.shutdown();
        self.controller.drain_events();
        write_lines(&mut output, &["Take care.".to_string()]).await?;
        Ok(())
    }
}

async fn write_lines<W: AsyncWrite + Unpin>(output: &mut W, lines: &[String]) -> Result<()> {
    for line in lines {
        output.write_all(line.as_bytes()).await?;
        output.write_all(b"\n").await?;
    }
    output.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use capsule_playback::SilentBackend;

    fn session() -> Session {
        Session::new(&CapsuleConfig::default(), &mut SilentBackend::new()).unwrap()
    }

    #[test]
    fn resolves_by_index_and_name() {
        let session = session();
        assert_eq!(
            session.resolve(&TrackRef::Index(1)).as_deref(),
            Some("Lluvia")
        );
        assert_eq!(session.resolve(&TrackRef::Index(6)), None);
        assert_eq!(
            session.resolve(&TrackRef::Name("chimenea".to_string())).as_deref(),
            Some("Chimenea")
        );
        assert_eq!(session.resolve(&TrackRef::Name("Lago".to_string())), None);
    }

    #[test]
    fn numeric_names_win_over_positions() {
        let config = CapsuleConfig::from_toml_str(
            r#"
            [[sounds]]
            name = "Lluvia"
            file = "lluvia.mp3"

            [[sounds]]
            name = "1984"
            file = "radio.mp3"

            [[sounds]]
            name = "1"
            file = "one.mp3"
            "#,
        )
        .unwrap();
        let mut session = Session::new(&config, &mut SilentBackend::new()).unwrap();

        assert_eq!(
            session.resolve(&TrackRef::Index(1984)).as_deref(),
            Some("1984")
        );
        assert_eq!(session.resolve(&TrackRef::Index(1)).as_deref(), Some("1"));
        assert_eq!(session.resolve(&TrackRef::Index(2)).as_deref(), Some("1984"));

        let reply = session.handle("toggle 1984".parse().unwrap());
        assert_eq!(reply.lines, vec!["Playing 1984".to_string()]);
        assert_eq!(session.controller().is_playing("Lluvia"), Some(false));
    }

    #[test]
    fn toggle_reports_new_state() {
        let mut session = session();
        let reply = session.handle(Command::Toggle(TrackRef::Index(2)));
        assert_eq!(reply.lines, vec!["Playing Mar".to_string()]);
        assert!(!session.is_idle());

        let reply = session.handle(Command::Toggle(TrackRef::Name("mar".to_string())));
        assert_eq!(reply.lines, vec!["Paused Mar".to_string()]);
        assert!(session.is_idle());
    }

    #[test]
    fn unknown_track_changes_nothing() {
        let mut session = session();
        let reply = session.handle(Command::Volume(TrackRef::Name("Lago".to_string()), 0.2));
        assert_eq!(reply.lines, vec!["No sound Lago".to_string()]);
        assert!(session
            .controller()
            .tracks()
            .iter()
            .all(|t| t.volume == 0.5));
    }

    #[test]
    fn volume_is_clamped() {
        let mut session = session();
        let reply = session.handle(Command::Volume(TrackRef::Index(5), 1.5));
        assert_eq!(reply.lines, vec!["Home volume 100%".to_string()]);
        assert_eq!(session.controller().volume("Home"), Some(1.0));
    }

    #[test]
    fn letter_toggles_panel() {
        let mut session = session();
        let reply = session.handle(Command::Letter);
        assert!(session.panel().is_visible());
        assert_eq!(reply.lines[0], "Querida alma valiente,");

        let reply = session.handle(Command::Letter);
        assert!(!session.panel().is_visible());
        assert_eq!(reply.lines, vec!["Message hidden.".to_string()]);
    }

    #[test]
    fn affirm_changes_phrase() {
        let mut session = session();
        let before = session.affirmation().map(String::from);
        session.handle(Command::Affirm);
        assert_ne!(session.affirmation().map(String::from), before);
    }

    #[test]
    fn zero_minute_timer_is_refused() {
        let mut session = session();
        let reply = session.handle(Command::Timer(0));
        assert_eq!(reply.lines.len(), 1);
        assert!(reply.lines[0].starts_with("Cannot start timer"));
        assert!(!session.controller().countdown().is_active());
    }

    #[test]
    fn cancel_without_timer() {
        let mut session = session();
        assert_eq!(
            session.handle(Command::Cancel).lines,
            vec!["No timer running.".to_string()]
        );
    }

    #[test]
    fn quit_sets_flag() {
        let mut session = session();
        assert!(session.handle(Command::Quit).quit);
    }
}
