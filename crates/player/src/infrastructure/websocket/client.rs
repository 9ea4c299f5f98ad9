//! Push notification client using tokio-tungstenite

use std::sync::atomic::AtomicU8;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::oneshot;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use wolfpack_domain::GameId;
use wolfpack_shared::ClientMessage;

use crate::infrastructure::message_translator::translate_event;
use crate::infrastructure::messaging::{
    set_connection_state, ConnectionHandle, ConnectionState, EventBus,
};
use crate::infrastructure::websocket::shared::{
    parse_server_event, HEARTBEAT_INTERVAL_SECS, MAX_RETRY_ATTEMPTS,
};
use crate::infrastructure::websocket::BackoffState;
use crate::ports::outbound::PushEvent;

/// WebSocket client for the game server's push channel.
///
/// Joins one game's room and forwards every translated event to the
/// `EventBus`. Reconnects with exponential backoff; each successful
/// (re)connect dispatches `PushEvent::Connected` so subscribers can resync.
pub struct NotificationClient {
    url: String,
    game_id: GameId,
    events: EventBus,
    state: Arc<AtomicU8>,
}

impl NotificationClient {
    pub fn new(url: impl Into<String>, game_id: GameId, events: EventBus) -> Self {
        Self {
            url: url.into(),
            game_id,
            events,
            state: Arc::new(AtomicU8::new(ConnectionState::Disconnected.to_u8())),
        }
    }

    /// Spawn the connection task. The returned handle stops it.
    pub fn spawn(self) -> ConnectionHandle {
        let (disconnect_tx, disconnect_rx) = oneshot::channel::<()>();
        let handle = ConnectionHandle::new(Arc::clone(&self.state), disconnect_tx);

        tokio::spawn(async move {
            tokio::select! {
                _ = self.run() => {}
                Ok(()) = disconnect_rx => {
                    tracing::info!(game_id = %self.game_id, "Push channel disconnect requested");
                }
            }
            set_connection_state(&self.state, ConnectionState::Disconnected);
        });

        handle
    }

    async fn run(&self) {
        let mut backoff = BackoffState::default();

        loop {
            match self.connect_once().await {
                Ok(()) => {
                    backoff.reset();
                    tracing::info!("Push channel closed, reconnecting");
                }
                Err(e) => {
                    tracing::warn!(url = %self.url, error = %e, "Push channel connection failed");
                }
            }

            set_connection_state(&self.state, ConnectionState::Reconnecting);
            let Some(delay) = backoff.next_delay_and_advance() else {
                tracing::error!("Max reconnection attempts reached, giving up");
                set_connection_state(&self.state, ConnectionState::Failed);
                return;
            };
            tracing::info!(
                attempt = backoff.attempts(),
                max_attempts = MAX_RETRY_ATTEMPTS,
                delay_ms = delay,
                "Reconnecting push channel"
            );
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }

    /// One connection lifetime.
    ///
    /// `Ok` once an established connection ends for any reason; `Err` if it
    /// was never established.
    async fn connect_once(&self) -> Result<()> {
        set_connection_state(&self.state, ConnectionState::Connecting);

        let (ws_stream, _) = connect_async(self.url.as_str()).await?;
        let (mut write, mut read) = ws_stream.split();

        let join = serde_json::to_string(&ClientMessage::JoinGame {
            game_id: self.game_id.to_string(),
        })?;
        write.send(Message::Text(join)).await?;

        set_connection_state(&self.state, ConnectionState::Connected);
        tracing::info!(url = %self.url, game_id = %self.game_id, "Push channel connected");
        self.events.dispatch(PushEvent::Connected).await;

        let mut heartbeat = tokio::time::interval(Duration::from_secs(HEARTBEAT_INTERVAL_SECS));
        // The first tick completes immediately.
        heartbeat.tick().await;

        loop {
            tokio::select! {
                msg = read.next() => match msg {
                    Some(Ok(Message::Text(text))) => self.handle_text(&text).await,
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("Server closed push channel");
                        return Ok(());
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "WebSocket error");
                        return Ok(());
                    }
                },
                _ = heartbeat.tick() => {
                    let beat = serde_json::to_string(&ClientMessage::Heartbeat)?;
                    if let Err(e) = write.send(Message::Text(beat)).await {
                        tracing::warn!(error = %e, "Failed to send heartbeat");
                        return Ok(());
                    }
                }
            }
        }
    }

    async fn handle_text(&self, text: &str) {
        match parse_server_event(text) {
            Ok(event) => {
                if let Some(event) = translate_event(event) {
                    self.events.dispatch(event).await;
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to parse push event"),
        }
    }
}
