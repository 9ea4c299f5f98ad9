//! Out-of-game chat
//!
//! Chat lines arrive only through the push channel; sending one is a plain
//! POST whose echo comes back as a push event like everyone else's.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{broadcast, RwLock};
use wolfpack_domain::{GameId, PlayerId};
use wolfpack_shared::ChatRequest;

use crate::ports::outbound::{ApiError, ChatNotice, GameApiPort};

/// Oldest lines are dropped beyond this.
pub const MAX_CHAT_MESSAGES: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub player_id: Option<PlayerId>,
    pub player_name: String,
    pub message: String,
    pub received_at: DateTime<Utc>,
}

impl ChatEntry {
    pub fn from_notice(notice: ChatNotice, received_at: DateTime<Utc>) -> Self {
        Self {
            player_id: notice.player_id,
            player_name: notice.player_name,
            message: notice.message,
            received_at,
        }
    }
}

/// Bounded chat history plus a broadcast of new lines.
#[derive(Clone)]
pub struct ChatLog {
    entries: Arc<RwLock<VecDeque<ChatEntry>>>,
    tx: broadcast::Sender<ChatEntry>,
}

impl ChatLog {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(64);
        Self {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            tx,
        }
    }

    pub async fn append(&self, entry: ChatEntry) {
        {
            let mut entries = self.entries.write().await;
            if entries.len() == MAX_CHAT_MESSAGES {
                entries.pop_front();
            }
            entries.push_back(entry.clone());
        }
        // No receivers is fine.
        let _ = self.tx.send(entry);
    }

    pub async fn entries(&self) -> Vec<ChatEntry> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChatEntry> {
        self.tx.subscribe()
    }
}

impl Default for ChatLog {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("chat message is empty")]
    Empty,
    #[error("{0}")]
    Rejected(String),
    #[error("could not reach the game server: {0}")]
    Transport(#[from] ApiError),
}

pub struct ChatService {
    api: Arc<dyn GameApiPort>,
    game_id: GameId,
}

impl ChatService {
    pub fn new(api: Arc<dyn GameApiPort>, game_id: GameId) -> Self {
        Self { api, game_id }
    }

    pub async fn send(&self, message: &str) -> Result<(), ChatError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ChatError::Empty);
        }

        let ack = self
            .api
            .send_chat(
                &self.game_id,
                &ChatRequest {
                    message: message.to_string(),
                },
            )
            .await?;
        match ack.rejection() {
            Some(reason) => Err(ChatError::Rejected(reason.to_string())),
            None => Ok(()),
        }
    }
}
