//! Game API Port - request/response boundary to the game server
//!
//! Application services hold an `Arc<dyn GameApiPort>`; the composition root
//! decides whether that is the HTTP adapter or a test double.

use async_trait::async_trait;
use wolfpack_domain::GameId;
use wolfpack_shared::{AckResponse, ActionRequest, ChatRequest, GameStateResponse};

use super::ApiError;

/// Every call is a single request. Callers decide what to do with failures;
/// implementations never retry on their own.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameApiPort: Send + Sync {
    /// Fetch the authoritative snapshot for `game_id`, as seen by this client.
    async fn fetch_state(&self, game_id: &GameId) -> Result<GameStateResponse, ApiError>;

    /// Submit a typed action. Success only means the server accepted it.
    async fn submit_action(
        &self,
        game_id: &GameId,
        request: &ActionRequest,
    ) -> Result<AckResponse, ApiError>;

    /// Post a chat line. The line itself comes back through the push channel.
    async fn send_chat(
        &self,
        game_id: &GameId,
        request: &ChatRequest,
    ) -> Result<AckResponse, ApiError>;
}
