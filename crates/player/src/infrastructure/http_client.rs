//! HTTP adapter for the game server's JSON API

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use wolfpack_domain::GameId;
use wolfpack_shared::{AckResponse, ActionRequest, ChatRequest, GameStateResponse};

use crate::ports::outbound::{ApiError, GameApiPort};

/// Default game server base URL.
pub const DEFAULT_SERVER_URL: &str = "http://localhost:5000";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client for the game server's `/api/game/{id}/...` endpoints
#[derive(Clone)]
pub struct HttpGameApi {
    client: Client,
    base_url: String,
}

impl HttpGameApi {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, game_id: &GameId, resource: &str) -> String {
        format!("{}/api/game/{}/{}", self.base_url, game_id, resource)
    }

    /// Decode a response body.
    ///
    /// Error statuses that still carry the JSON envelope are returned as a
    /// normal envelope so the server's own error message reaches the user.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        if status.is_success() {
            return serde_json::from_str(&body).map_err(|e| ApiError::InvalidResponse(e.to_string()));
        }

        match serde_json::from_str::<T>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) => Err(ApiError::HttpStatus {
                status: status.as_u16(),
                message: body,
            }),
        }
    }
}

impl Default for HttpGameApi {
    fn default() -> Self {
        Self::new(DEFAULT_SERVER_URL, DEFAULT_REQUEST_TIMEOUT)
    }
}

#[async_trait]
impl GameApiPort for HttpGameApi {
    async fn fetch_state(&self, game_id: &GameId) -> Result<GameStateResponse, ApiError> {
        let url = self.endpoint(game_id, "state");
        tracing::debug!(%url, "Fetching game state");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Self::decode(response).await
    }

    async fn submit_action(
        &self,
        game_id: &GameId,
        request: &ActionRequest,
    ) -> Result<AckResponse, ApiError> {
        let url = self.endpoint(game_id, "action");
        tracing::debug!(%url, action_type = %request.action_type, "Submitting action");

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Self::decode(response).await
    }

    async fn send_chat(
        &self,
        game_id: &GameId,
        request: &ChatRequest,
    ) -> Result<AckResponse, ApiError> {
        let url = self.endpoint(game_id, "chat");

        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(|e| ApiError::RequestFailed(e.to_string()))?;

        Self::decode(response).await
    }
}
