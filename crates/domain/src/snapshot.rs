//! The authoritative game snapshot as seen by one viewer.
//!
//! A snapshot is replaced wholesale on every sync; nothing in the client
//! patches one in place.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Activation, DomainError, Phase, PlayerId, Role};

/// One roster entry.
///
/// `role` is present only when the viewer is entitled to see it. `None`
/// means "unknown to this viewer", not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerView {
    pub player_id: PlayerId,
    pub name: String,
    pub is_alive: bool,
    pub role: Option<Role>,
}

impl PlayerView {
    /// The role as visible to the local viewer.
    ///
    /// Both the player list and the night-target filtering go through this
    /// accessor so they can never disagree.
    pub fn visible_role(&self) -> Option<Role> {
        self.role
    }

    pub fn is_visibly(&self, role: Role) -> bool {
        self.visible_role() == Some(role)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscussionEntry {
    pub player_id: PlayerId,
    pub player_name: String,
    pub content: String,
}

/// A player killed during the previous night, with the role the server revealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeathRecord {
    pub player_id: PlayerId,
    pub name: String,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub day: u32,
    pub phase: Phase,
    pub players: Vec<PlayerView>,
    pub current_discussions: Vec<DiscussionEntry>,
    pub player_history: Vec<String>,
    pub last_night_deaths: Vec<DeathRecord>,
    pub winner: Option<String>,
    pub game_over: bool,
    pub is_all_ai: bool,
    pub local_player_role: Option<Role>,
}

impl GameSnapshot {
    /// Check the invariants the client relies on.
    pub fn validate(&self) -> Result<(), DomainError> {
        let mut seen = HashSet::with_capacity(self.players.len());
        for player in &self.players {
            if !seen.insert(player.player_id) {
                return Err(DomainError::validation(format!(
                    "duplicate player id {} in snapshot",
                    player.player_id
                )));
            }
        }
        Ok(())
    }

    /// The phase the client should act on: a snapshot flagged `game_over`
    /// is terminal whatever its `phase` says.
    pub fn effective_phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else {
            self.phase
        }
    }

    pub fn activation(&self) -> Activation {
        Activation::new(self.day, self.effective_phase())
    }

    pub fn player(&self, player_id: PlayerId) -> Option<&PlayerView> {
        self.players.iter().find(|p| p.player_id == player_id)
    }

    pub fn alive_players(&self) -> impl Iterator<Item = &PlayerView> {
        self.players.iter().filter(|p| p.is_alive)
    }

    pub fn alive_count(&self) -> usize {
        self.alive_players().count()
    }
}
