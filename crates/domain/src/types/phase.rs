use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// Server-declared stage of a game round.
///
/// The client never invents a phase: values only ever come from a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Setup,
    Day,
    Vote,
    Night,
    #[serde(rename = "gameover")]
    GameOver,
}

impl Phase {
    /// Wire name used by the server.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Setup => "setup",
            Phase::Day => "day",
            Phase::Vote => "vote",
            Phase::Night => "night",
            Phase::GameOver => "gameover",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Phase {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "setup" => Ok(Phase::Setup),
            "day" => Ok(Phase::Day),
            "vote" => Ok(Phase::Vote),
            "night" => Ok(Phase::Night),
            "gameover" | "game_over" => Ok(Phase::GameOver),
            other => Err(DomainError::parse(format!("Unknown phase: {other}"))),
        }
    }
}

/// One activation of a phase: the same phase on a different day is a new
/// activation, and so is a different phase on the same day.
///
/// Selections are scoped to an activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Activation {
    pub day: u32,
    pub phase: Phase,
}

impl Activation {
    pub fn new(day: u32, phase: Phase) -> Self {
        Self { day, phase }
    }
}
