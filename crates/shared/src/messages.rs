//! Push channel message types
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Renaming variants is a breaking change
//! - Unknown event kinds deserialize to `Unknown` for forward compatibility

use serde::{Deserialize, Serialize};

// =============================================================================
// Client Messages (Player → Server)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Subscribe this connection to the events of one game.
    JoinGame { game_id: String },
    /// Keep-alive
    Heartbeat,
}

// =============================================================================
// Server Events (Server → Player)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    /// The game state changed; carries nothing but the game it concerns.
    GameUpdate { game_id: String },
    /// A chat line, delivered only through this channel.
    ChatMessage {
        game_id: String,
        player_name: String,
        player_id: u32,
        message: String,
    },
    /// Unknown event kind for forward compatibility
    #[serde(other)]
    Unknown,
}

impl ServerEvent {
    pub fn game_id(&self) -> Option<&str> {
        match self {
            ServerEvent::GameUpdate { game_id } | ServerEvent::ChatMessage { game_id, .. } => {
                Some(game_id.as_str())
            }
            ServerEvent::Unknown => None,
        }
    }
}
