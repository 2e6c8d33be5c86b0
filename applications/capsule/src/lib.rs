//! Peace Capsule terminal application
//!
//! Library half of the `capsule` binary: configuration, command parsing,
//! rendering and the interactive session loop.

pub mod command;
pub mod config;
pub mod error;
pub mod render;
pub mod session;

pub use command::{Command, CommandError, TrackRef};
pub use config::CapsuleConfig;
pub use error::{AppError, Result};
pub use session::{Reply, Session};
