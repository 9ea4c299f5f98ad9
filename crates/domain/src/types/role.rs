use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DomainError;

/// A player's hidden game function, or `Observer` for a session that is not
/// bound to any assigned player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Villager,
    Seer,
    Werewolf,
    Observer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Villager => "villager",
            Role::Seer => "seer",
            Role::Werewolf => "werewolf",
            Role::Observer => "observer",
        }
    }

    /// Roles that take part in the game (and therefore may submit actions).
    pub fn is_participant(&self) -> bool {
        !matches!(self, Role::Observer)
    }

    pub fn has_night_ability(&self) -> bool {
        matches!(self, Role::Seer | Role::Werewolf)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "villager" => Ok(Role::Villager),
            "seer" => Ok(Role::Seer),
            "werewolf" => Ok(Role::Werewolf),
            "observer" => Ok(Role::Observer),
            other => Err(DomainError::parse(format!("Unknown role: {other}"))),
        }
    }
}
