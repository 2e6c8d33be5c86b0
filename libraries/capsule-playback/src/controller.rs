//! Playback & timer controller - core orchestration
//!
//! Owns every piece of mutable session state: per-track play/volume state,
//! the playback handles, the countdown and its timer. All operations run on
//! the session's single logical thread.

use crate::{
    backend::{AudioBackend, TrackPlayer},
    countdown::{CountdownState, TickOutcome},
    error::{PlaybackError, Result},
    events::ControllerEvent,
    registry::SoundRegistry,
    timer::{TickScheduler, TimerHandle, TimerId},
    types::{PlaybackConfig, TrackState, TrackStatus},
    volume::Volume,
};
use std::time::Duration;
use tracing::{debug, info, warn};

/// State and playback handle for one registered track
struct TrackSlot {
    state: TrackState,
    player: Option<Box<dyn TrackPlayer>>,
}

/// Session controller
///
/// Lifecycle: [`Controller::new`] → handle events → [`Controller::shutdown`]
/// (also run on drop). Unknown track names are ignored: the call returns
/// `None` and nothing changes.
pub struct Controller {
    registry: SoundRegistry,

    // One slot per registry entry, same order
    slots: Vec<TrackSlot>,

    countdown: CountdownState,
    scheduler: Box<dyn TickScheduler>,
    timer: Option<Box<dyn TimerHandle>>,
    next_timer_id: TimerId,
    tick_period: Duration,

    // Event queue for presentation sync
    pending_events: Vec<ControllerEvent>,

    shut_down: bool,
}

impl Controller {
    /// Create a controller, acquiring one looping player per track
    ///
    /// Tracks whose source cannot be opened keep their state but have no
    /// player; commands for them only change state.
    pub fn new(
        registry: SoundRegistry,
        backend: &mut dyn AudioBackend,
        scheduler: Box<dyn TickScheduler>,
        config: PlaybackConfig,
    ) -> Self {
        let volume = Volume::new(config.initial_volume);

        let slots = registry
            .list_tracks()
            .iter()
            .map(|track| {
                let player = match backend.open(track) {
                    Ok(mut player) => {
                        if let Err(e) = player.set_looping(true) {
                            warn!("Failed to enable looping for {}: {}", track.name, e);
                        }
                        if let Err(e) = player.set_gain(volume.gain()) {
                            warn!("Failed to set initial gain for {}: {}", track.name, e);
                        }
                        Some(player)
                    }
                    Err(e) => {
                        warn!(
                            "No playback for {} ({}): {}",
                            track.name,
                            track.source.display(),
                            e
                        );
                        None
                    }
                };

                TrackSlot {
                    state: TrackState::new(volume),
                    player,
                }
            })
            .collect();

        info!("Controller ready with {} tracks", registry.len());

        Self {
            registry,
            slots,
            countdown: CountdownState::new(),
            scheduler,
            timer: None,
            next_timer_id: TimerId::new(1),
            tick_period: config.tick_period,
            pending_events: Vec::new(),
            shut_down: false,
        }
    }

    // ===== Tracks =====

    /// Flip play/pause for a track
    ///
    /// # Returns
    /// * `Some(is_playing)` - New state
    /// * `None` - Unknown track, nothing changed
    pub fn toggle(&mut self, name: &str) -> Option<bool> {
        let Some(index) = self.registry.position(name) else {
            debug!("Ignoring toggle for unknown track {:?}", name);
            return None;
        };

        let slot = &mut self.slots[index];
        let is_playing = !slot.state.is_playing;
        slot.state.is_playing = is_playing;

        if let Some(player) = slot.player.as_mut() {
            let result = if is_playing {
                player.play()
            } else {
                player.pause()
            };
            if let Err(e) = result {
                warn!("Playback command failed for {}: {}", name, e);
            }
        }

        debug!("{} is now {}", name, if is_playing { "playing" } else { "paused" });
        self.pending_events.push(ControllerEvent::TrackToggled {
            name: name.to_string(),
            is_playing,
        });

        Some(is_playing)
    }

    /// Set a track's volume, clamped to `[0.0, 1.0]`
    ///
    /// Applies immediately whether or not the track is playing.
    ///
    /// # Returns
    /// * `Some(volume)` - The clamped volume now in effect
    /// * `None` - Unknown track, nothing changed
    pub fn set_volume(&mut self, name: &str, value: f32) -> Option<f32> {
        let Some(index) = self.registry.position(name) else {
            debug!("Ignoring volume change for unknown track {:?}", name);
            return None;
        };

        let volume = Volume::new(value);
        let slot = &mut self.slots[index];
        slot.state.volume = volume;

        if let Some(player) = slot.player.as_mut() {
            if let Err(e) = player.set_gain(volume.gain()) {
                warn!("Failed to set gain for {}: {}", name, e);
            }
        }

        self.pending_events.push(ControllerEvent::VolumeChanged {
            name: name.to_string(),
            volume: volume.gain(),
        });

        Some(volume.gain())
    }

    /// Pause every track. Idempotent.
    pub fn stop_all(&mut self) {
        for (track, slot) in self.registry.list_tracks().iter().zip(&mut self.slots) {
            slot.state.is_playing = false;
            if let Some(player) = slot.player.as_mut() {
                if let Err(e) = player.pause() {
                    warn!("Failed to pause {}: {}", track.name, e);
                }
            }
        }

        debug!("All tracks stopped");
        self.pending_events.push(ControllerEvent::AllStopped);
    }

    pub fn is_playing(&self, name: &str) -> Option<bool> {
        self.slot(name).map(|slot| slot.state.is_playing)
    }

    pub fn volume(&self, name: &str) -> Option<f32> {
        self.slot(name).map(|slot| slot.state.volume.gain())
    }

    /// Snapshot of every track in registry order
    pub fn tracks(&self) -> Vec<TrackStatus> {
        self.registry
            .list_tracks()
            .iter()
            .zip(&self.slots)
            .map(|(track, slot)| TrackStatus {
                name: track.name.clone(),
                is_playing: slot.state.is_playing,
                volume: slot.state.volume.gain(),
                rendering: slot.player.as_ref().map(|p| !p.is_paused()),
            })
            .collect()
    }

    pub fn registry(&self) -> &SoundRegistry {
        &self.registry
    }

    fn slot(&self, name: &str) -> Option<&TrackSlot> {
        self.registry.position(name).map(|index| &self.slots[index])
    }

    // ===== Countdown =====

    /// Start a countdown of `minutes`, replacing any running one
    ///
    /// The previous timer is cancelled before the new one is scheduled.
    pub fn start_countdown(&mut self, minutes: u32) -> Result<()> {
        if minutes == 0 {
            return Err(PlaybackError::InvalidCountdown(minutes));
        }
        if self.shut_down {
            return Err(PlaybackError::InvalidOperation(
                "controller is shut down".to_string(),
            ));
        }

        self.cancel_timer();
        self.countdown.start(minutes);

        let id = self.next_timer_id;
        self.next_timer_id = id.next();
        self.timer = Some(self.scheduler.schedule(id, self.tick_period));

        info!("Countdown started: {} minutes", minutes);
        self.pending_events.push(ControllerEvent::CountdownStarted {
            seconds: self.countdown.remaining_seconds(),
        });

        Ok(())
    }

    /// Advance the countdown by one second
    ///
    /// On the tick that reaches zero the timer is cancelled and every track
    /// is stopped before returning.
    pub fn tick(&mut self) -> TickOutcome {
        let outcome = self.countdown.tick();

        match outcome {
            TickOutcome::Idle => {}
            TickOutcome::Running(remaining_seconds) => {
                self.pending_events
                    .push(ControllerEvent::CountdownTick { remaining_seconds });
            }
            TickOutcome::Expired => {
                self.cancel_timer();
                info!("Countdown finished, stopping all tracks");
                self.pending_events.push(ControllerEvent::CountdownTick {
                    remaining_seconds: 0,
                });
                self.pending_events.push(ControllerEvent::CountdownFinished);
                self.stop_all();
            }
        }

        outcome
    }

    /// Tick delivered by the scheduler
    ///
    /// Ticks from a timer that has since been replaced or cancelled are
    /// ignored.
    pub fn on_timer(&mut self, id: TimerId) -> TickOutcome {
        if self.current_timer() != Some(id) {
            debug!("Dropping tick from stale timer {}", id.raw());
            return TickOutcome::Idle;
        }
        self.tick()
    }

    /// Stop the countdown without stopping playback
    ///
    /// # Returns
    /// `true` if a countdown was running
    pub fn cancel_countdown(&mut self) -> bool {
        if !self.countdown.is_active() {
            return false;
        }

        self.cancel_timer();
        self.countdown.halt();

        info!("Countdown cancelled at {}", self.countdown.format_remaining());
        self.pending_events.push(ControllerEvent::CountdownCancelled {
            remaining_seconds: self.countdown.remaining_seconds(),
        });
        true
    }

    pub fn countdown(&self) -> &CountdownState {
        &self.countdown
    }

    /// Remaining countdown time as `M:SS`
    pub fn format_remaining(&self) -> String {
        self.countdown.format_remaining()
    }

    /// Id of the live timer, if a countdown is running
    pub fn current_timer(&self) -> Option<TimerId> {
        self.timer.as_ref().map(|t| t.id())
    }

    fn cancel_timer(&mut self) {
        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
    }

    // ===== Events =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<ControllerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Lifecycle =====

    /// End the session: cancel the timer and pause every track
    ///
    /// Idempotent. Later ticks are ignored and new countdowns are refused.
    pub fn shutdown(&mut self) {
        if self.shut_down {
            return;
        }

        self.cancel_timer();
        self.countdown.halt();
        self.stop_all();
        self.shut_down = true;

        info!("Controller shut down");
    }

    pub fn is_shut_down(&self) -> bool {
        self.shut_down
    }
}

impl Drop for Controller {
    fn drop(&mut self) {
        self.shutdown();
    }
}
