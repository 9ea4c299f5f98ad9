//! Player events - outbound port data types for push notifications
//!
//! The WebSocket adapter translates raw `ServerEvent`s into these before they
//! reach the application layer. Events for other games are still delivered;
//! filtering by game id is the notification channel's job.

use wolfpack_domain::{GameId, PlayerId};

/// A chat line relayed by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatNotice {
    pub game_id: GameId,
    /// `None` for system lines the server sends without a seat.
    pub player_id: Option<PlayerId>,
    pub player_name: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// The push channel (re)connected and joined the game room.
    Connected,
    /// "Something changed in this game": carries no state.
    GameUpdate { game_id: GameId },
    Chat(ChatNotice),
}

impl PushEvent {
    pub fn game_id(&self) -> Option<&GameId> {
        match self {
            PushEvent::Connected => None,
            PushEvent::GameUpdate { game_id } => Some(game_id),
            PushEvent::Chat(notice) => Some(&notice.game_id),
        }
    }
}
