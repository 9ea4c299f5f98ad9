//! Push notification routing
//!
//! Game updates never carry state: each one for the viewed game schedules a
//! refresh. Chat lines go straight into the chat log. Events for any other
//! game are ignored.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::chat::{ChatEntry, ChatLog};
use crate::application::sync::SyncEngine;
use crate::infrastructure::messaging::EventBus;
use crate::ports::outbound::PushEvent;

#[derive(Debug)]
pub enum Routed {
    /// A refresh is running on this task.
    Refresh(JoinHandle<()>),
    ChatAppended,
    Ignored,
}

pub struct NotificationChannel {
    sync: Arc<SyncEngine>,
    chat: ChatLog,
}

impl NotificationChannel {
    pub fn new(sync: Arc<SyncEngine>, chat: ChatLog) -> Self {
        Self { sync, chat }
    }

    pub async fn handle(&self, event: PushEvent) -> Routed {
        if let Some(game_id) = event.game_id() {
            if game_id != self.sync.game_id() {
                tracing::trace!(%game_id, "Ignoring push event for another game");
                return Routed::Ignored;
            }
        }

        match event {
            PushEvent::Connected => {
                tracing::debug!("Push channel connected, resyncing");
                Routed::Refresh(self.spawn_refresh())
            }
            PushEvent::GameUpdate { .. } => Routed::Refresh(self.spawn_refresh()),
            PushEvent::Chat(notice) => {
                self.chat
                    .append(ChatEntry::from_notice(notice, chrono::Utc::now()))
                    .await;
                Routed::ChatAppended
            }
        }
    }

    /// Refreshes run concurrently and may overlap; the sync engine keeps
    /// the newest arrival.
    fn spawn_refresh(&self) -> JoinHandle<()> {
        let sync = Arc::clone(&self.sync);
        tokio::spawn(async move {
            if let Err(e) = sync.refresh().await {
                tracing::debug!(error = %e, "Notification-triggered refresh failed");
            }
        })
    }

    /// Subscribe to `bus` and route every event until the bus goes away.
    pub async fn attach(self: Arc<Self>, bus: &EventBus) -> JoinHandle<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<PushEvent>();
        bus.subscribe(move |event| {
            let _ = tx.send(event);
        })
        .await;

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                self.handle(event).await;
            }
        })
    }
}
