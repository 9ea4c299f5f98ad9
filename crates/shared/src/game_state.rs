//! Snapshot payload as sent by the server.
//!
//! Every collection and flag defaults when absent so an older server that
//! omits a field still produces a usable snapshot.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDto {
    pub player_id: u32,
    pub name: String,
    pub is_alive: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionDto {
    pub player_id: u32,
    pub player_name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeathDto {
    pub player_id: u32,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GameStateDto {
    #[serde(default)]
    pub day: u32,
    pub phase: String,
    #[serde(default)]
    pub players: Vec<PlayerDto>,
    #[serde(default)]
    pub current_discussions: Vec<DiscussionDto>,
    #[serde(default)]
    pub player_history: Vec<String>,
    #[serde(default)]
    pub last_night_deaths: Vec<DeathDto>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<String>,
    #[serde(default)]
    pub game_over: bool,
    #[serde(default)]
    pub is_all_ai: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_player_role: Option<String>,
}
