//! Request bodies posted to the game server.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The four kinds of action a client may post.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Discussion,
    Vote,
    NightAction,
    NextPhase,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Discussion => "discussion",
            ActionType::Vote => "vote",
            ActionType::NightAction => "night_action",
            ActionType::NextPhase => "next_phase",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `POST /api/game/{id}/action`
///
/// `content` is free text for discussion, the stringified target id for
/// vote/night_action, and empty for next_phase or a night pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRequest {
    pub action_type: ActionType,
    pub content: String,
}

impl ActionRequest {
    pub fn new(action_type: ActionType, content: impl Into<String>) -> Self {
        Self {
            action_type,
            content: content.into(),
        }
    }

    pub fn discussion(text: impl Into<String>) -> Self {
        Self::new(ActionType::Discussion, text)
    }

    pub fn vote(target_player_id: u32) -> Self {
        Self::new(ActionType::Vote, target_player_id.to_string())
    }

    pub fn night_action(target_player_id: Option<u32>) -> Self {
        let content = target_player_id.map(|id| id.to_string()).unwrap_or_default();
        Self::new(ActionType::NightAction, content)
    }

    pub fn next_phase() -> Self {
        Self::new(ActionType::NextPhase, "")
    }
}

/// `POST /api/game/{id}/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}
