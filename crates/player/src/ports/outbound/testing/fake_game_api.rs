//! Scripted `GameApiPort` double.
//!
//! Fetches are answered from a queue of scripted responses (each with an
//! optional delay) and fall back to a fixed state once the queue is empty.
//! Submissions and chat lines are recorded at the moment they are sent.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;
use wolfpack_domain::GameId;
use wolfpack_shared::{AckResponse, ActionRequest, ChatRequest, GameStateDto, GameStateResponse};

use crate::ports::outbound::{ApiError, GameApiPort};

/// One scripted answer to `fetch_state`.
#[derive(Debug, Clone)]
pub struct ScriptedFetch {
    pub delay: Duration,
    pub response: Result<GameStateResponse, ApiError>,
}

impl ScriptedFetch {
    pub fn state(dto: GameStateDto) -> Self {
        Self {
            delay: Duration::ZERO,
            response: Ok(GameStateResponse::ok(dto)),
        }
    }

    pub fn failure(error: ApiError) -> Self {
        Self {
            delay: Duration::ZERO,
            response: Err(error),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            delay: Duration::ZERO,
            response: Ok(GameStateResponse::failed(message)),
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type ScriptedAck = (Duration, Result<AckResponse, ApiError>);

#[derive(Default)]
struct State {
    fetches: VecDeque<ScriptedFetch>,
    fallback: Option<GameStateDto>,
    action_acks: VecDeque<ScriptedAck>,
    chat_acks: VecDeque<ScriptedAck>,
    submitted: Vec<ActionRequest>,
    chats: Vec<String>,
    fetch_count: usize,
}

#[derive(Clone, Default)]
pub struct FakeGameApi {
    state: Arc<Mutex<State>>,
}

impl FakeGameApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fake whose fetches always return `dto` unless something is scripted.
    pub fn with_state(dto: GameStateDto) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                fallback: Some(dto),
                ..State::default()
            })),
        }
    }

    pub async fn set_state(&self, dto: GameStateDto) {
        self.state.lock().await.fallback = Some(dto);
    }

    pub async fn push_fetch(&self, fetch: ScriptedFetch) {
        self.state.lock().await.fetches.push_back(fetch);
    }

    pub async fn push_action_ack(&self, ack: Result<AckResponse, ApiError>) {
        self.push_action_ack_after(Duration::ZERO, ack).await;
    }

    pub async fn push_action_ack_after(
        &self,
        delay: Duration,
        ack: Result<AckResponse, ApiError>,
    ) {
        self.state.lock().await.action_acks.push_back((delay, ack));
    }

    pub async fn push_chat_ack(&self, ack: Result<AckResponse, ApiError>) {
        self.state
            .lock()
            .await
            .chat_acks
            .push_back((Duration::ZERO, ack));
    }

    pub async fn submitted(&self) -> Vec<ActionRequest> {
        self.state.lock().await.submitted.clone()
    }

    pub async fn chats(&self) -> Vec<String> {
        self.state.lock().await.chats.clone()
    }

    pub async fn fetch_count(&self) -> usize {
        self.state.lock().await.fetch_count
    }
}

#[async_trait]
impl GameApiPort for FakeGameApi {
    async fn fetch_state(&self, _game_id: &GameId) -> Result<GameStateResponse, ApiError> {
        let scripted = {
            let mut s = self.state.lock().await;
            s.fetch_count += 1;
            match s.fetches.pop_front() {
                Some(fetch) => fetch,
                None => match s.fallback.clone() {
                    Some(dto) => ScriptedFetch::state(dto),
                    None => ScriptedFetch::failure(ApiError::request_failed("no state scripted")),
                },
            }
        };
        if !scripted.delay.is_zero() {
            tokio::time::sleep(scripted.delay).await;
        }
        scripted.response
    }

    async fn submit_action(
        &self,
        _game_id: &GameId,
        request: &ActionRequest,
    ) -> Result<AckResponse, ApiError> {
        let (delay, ack) = {
            let mut s = self.state.lock().await;
            s.submitted.push(request.clone());
            s.action_acks
                .pop_front()
                .unwrap_or((Duration::ZERO, Ok(AckResponse::ok())))
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        ack
    }

    async fn send_chat(
        &self,
        _game_id: &GameId,
        request: &ChatRequest,
    ) -> Result<AckResponse, ApiError> {
        let (delay, ack) = {
            let mut s = self.state.lock().await;
            s.chats.push(request.message.clone());
            s.chat_acks
                .pop_front()
                .unwrap_or((Duration::ZERO, Ok(AckResponse::ok())))
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        ack
    }
}
