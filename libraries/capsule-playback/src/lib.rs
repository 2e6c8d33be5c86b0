//! Peace Capsule - Ambient Playback
//!
//! Platform-agnostic playback and relaxation-timer management.
//!
//! This crate provides:
//! - Sound registry (fixed, ordered, uniquely named tracks)
//! - Per-track play/pause and volume (linear, clamped to 0.0-1.0)
//! - Relaxation countdown that stops every track when it reaches zero
//! - Cancellable tick timer (tokio-backed or manually driven)
//! - Affirmations and the message panel as injected content
//!
//! # Architecture
//!
//! `capsule-playback` does no audio I/O:
//! - No dependency on CPAL or Symphonia
//! - Audio rendering is provided through the [`AudioBackend`] / [`TrackPlayer`] traits
//! - Ticks are provided through the [`TickScheduler`] / [`TimerHandle`] traits
//!
//! # Example: Basic Session
//!
//! ```rust
//! use capsule_playback::{
//!     Controller, ManualScheduler, PlaybackConfig, SilentBackend, SoundRegistry, Track,
//!     TickOutcome,
//! };
//!
//! let registry = SoundRegistry::new(vec![
//!     Track::new("Lluvia", "sounds/lluvia.mp3"),
//!     Track::new("Mar", "sounds/mar.mp3"),
//! ])
//! .unwrap();
//!
//! let mut controller = Controller::new(
//!     registry,
//!     &mut SilentBackend::new(),
//!     Box::new(ManualScheduler),
//!     PlaybackConfig::default(),
//! );
//!
//! controller.toggle("Lluvia");
//! controller.set_volume("Lluvia", 0.8);
//!
//! controller.start_countdown(5).unwrap();
//! assert_eq!(controller.format_remaining(), "5:00");
//! assert_eq!(controller.tick(), TickOutcome::Running(299));
//! assert_eq!(controller.format_remaining(), "4:59");
//! ```
//!
//! # Example: Tokio Timer
//!
//! ```rust,no_run
//! use capsule_playback::{
//!     Controller, PlaybackConfig, SilentBackend, SoundRegistry, TokioTickScheduler,
//! };
//! use tokio::sync::mpsc;
//!
//! # async fn run(registry: SoundRegistry) {
//! let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
//! let mut controller = Controller::new(
//!     registry,
//!     &mut SilentBackend::new(),
//!     Box::new(TokioTickScheduler::new(tick_tx)),
//!     PlaybackConfig::default(),
//! );
//!
//! controller.start_countdown(10).unwrap();
//! while let Some(id) = tick_rx.recv().await {
//!     controller.on_timer(id);
//!     println!("{}", controller.format_remaining());
//! }
//! # }
//! ```

pub mod backend;
mod content;
mod controller;
pub mod countdown;
mod error;
pub mod events;
mod registry;
pub mod timer;
pub mod types;
mod volume;

// Public exports
pub use backend::{AudioBackend, SilentBackend, TrackPlayer};
pub use content::{Affirmations, MessagePanel};
pub use controller::Controller;
pub use countdown::{format_clock, CountdownState, TickOutcome, DEFAULT_PRESETS};
pub use error::{PlaybackError, Result};
pub use events::ControllerEvent;
pub use registry::{SoundRegistry, Track};
pub use timer::{ManualScheduler, TickScheduler, TimerHandle, TimerId};
#[cfg(feature = "tokio-timer")]
pub use timer::{TokioTickScheduler, TokioTimer};
pub use types::{PlaybackConfig, TrackState, TrackStatus};
pub use volume::{Volume, DEFAULT_VOLUME};
