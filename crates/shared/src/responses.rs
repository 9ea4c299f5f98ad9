//! Response envelopes returned by the game server.

use serde::{Deserialize, Serialize};

use crate::GameStateDto;

/// Envelope of the snapshot fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStateResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_state: Option<GameStateDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl GameStateResponse {
    pub fn ok(game_state: GameStateDto) -> Self {
        Self {
            success: true,
            game_state: Some(game_state),
            error: None,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            game_state: None,
            error: Some(error.into()),
        }
    }
}

/// Envelope of action and chat submissions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(error.into()),
        }
    }

    /// The server's error text, if this is a rejection.
    ///
    /// A rejection without an `error` field still counts as a rejection.
    pub fn rejection(&self) -> Option<&str> {
        if self.success {
            None
        } else {
            Some(self.error.as_deref().unwrap_or("request rejected"))
        }
    }
}
