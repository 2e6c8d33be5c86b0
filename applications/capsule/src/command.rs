//! Session command parsing
//!
//! One command per input line. Tracks can be addressed by their 1-based
//! position in the list or by name (case-insensitive). A number that is
//! also a sound's exact name refers to that sound.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// How a command refers to a track
#[derive(Debug, Clone, PartialEq)]
pub enum TrackRef {
    /// 1-based position in the registry
    Index(usize),
    Name(String),
}

impl fmt::Display for TrackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackRef::Index(index) => write!(f, "#{}", index),
            TrackRef::Name(name) => f.write_str(name),
        }
    }
}

impl FromStr for TrackRef {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CommandError::MissingArgument("track"));
        }
        // A number may still be a sound's name; the session checks names first
        match s.parse::<usize>() {
            Ok(index) if index > 0 => Ok(TrackRef::Index(index)),
            _ => Ok(TrackRef::Name(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Show every track with its state
    List,
    Toggle(TrackRef),
    /// Set volume (0.0 - 1.0)
    Volume(TrackRef, f32),
    /// Start a countdown in minutes
    Timer(u32),
    Cancel,
    Stop,
    Status,
    /// Show a different affirmation
    Affirm,
    /// Show or hide the message panel
    Letter,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    Unknown(String),

    #[error("missing {0}")]
    MissingArgument(&'static str),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "list" | "ls" | "l" => Ok(Command::List),
            "toggle" | "t" | "play" | "pause" => Ok(Command::Toggle(rest.parse()?)),
            "volume" | "vol" | "v" => {
                // Track names may contain spaces, the level is the last word
                let (track, level) = rest
                    .rsplit_once(char::is_whitespace)
                    .ok_or(CommandError::MissingArgument("volume level"))?;
                Ok(Command::Volume(track.parse()?, parse_level(level)?))
            }
            "timer" | "countdown" => {
                if rest.is_empty() {
                    return Err(CommandError::MissingArgument("minutes"));
                }
                let minutes = rest
                    .parse::<u32>()
                    .map_err(|_| CommandError::InvalidArgument(rest.to_string()))?;
                Ok(Command::Timer(minutes))
            }
            "cancel" => Ok(Command::Cancel),
            "stop" => Ok(Command::Stop),
            "status" | "s" => Ok(Command::Status),
            "affirm" | "a" => Ok(Command::Affirm),
            "letter" | "message" | "m" => Ok(Command::Letter),
            "help" | "h" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

/// Parse `0.3` or `30%`
fn parse_level(text: &str) -> Result<f32, CommandError> {
    let invalid = || CommandError::InvalidArgument(text.to_string());

    let level = match text.strip_suffix('%') {
        Some(percent) => percent.parse::<f32>().map_err(|_| invalid())? / 100.0,
        None => text.parse::<f32>().map_err(|_| invalid())?,
    };

    if level.is_finite() {
        Ok(level)
    } else {
        Err(invalid())
    }
}
