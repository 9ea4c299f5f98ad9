//! One client's view of one game.
//!
//! `GameSession` wires the sync engine, selection, submitter and chat for a
//! fixed `(game, local player, mode)` triple. The mode never changes during
//! a session.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use wolfpack_domain::{GameId, LocalSession, PlayerId};

use crate::application::auto_pass::spawn_auto_pass;
use crate::application::chat::{ChatError, ChatLog, ChatService};
use crate::application::notifications::NotificationChannel;
use crate::application::policy::ActionKind;
use crate::application::selection::SelectionError;
use crate::application::submitter::{ActionSubmitter, SubmitError, SubmitReceipt, SubmitRequest};
use crate::application::sync::{
    spawn_polling, ClientFrame, FrameReceiver, RefreshOutcome, SyncEngine, SyncError,
};
use crate::ports::outbound::GameApiPort;

/// Background tasks owned by a running session.
pub struct BackgroundTasks {
    handles: Vec<JoinHandle<()>>,
}

impl BackgroundTasks {
    pub fn push(&mut self, handle: JoinHandle<()>) {
        self.handles.push(handle);
    }

    pub fn abort_all(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for BackgroundTasks {
    fn drop(&mut self) {
        self.abort_all();
    }
}

#[derive(Clone)]
pub struct GameSession {
    sync: Arc<SyncEngine>,
    submitter: Arc<ActionSubmitter>,
    chat: Arc<ChatService>,
    chat_log: ChatLog,
}

impl GameSession {
    pub fn new(api: Arc<dyn GameApiPort>, game_id: GameId, session: LocalSession) -> Self {
        let sync = Arc::new(SyncEngine::new(
            Arc::clone(&api),
            game_id.clone(),
            session,
        ));
        let submitter = Arc::new(ActionSubmitter::new(Arc::clone(&api), Arc::clone(&sync)));
        let chat = Arc::new(ChatService::new(api, game_id));
        Self {
            sync,
            submitter,
            chat,
            chat_log: ChatLog::new(),
        }
    }

    pub fn sync(&self) -> Arc<SyncEngine> {
        Arc::clone(&self.sync)
    }

    pub fn submitter(&self) -> Arc<ActionSubmitter> {
        Arc::clone(&self.submitter)
    }

    pub fn chat_log(&self) -> ChatLog {
        self.chat_log.clone()
    }

    pub fn local_session(&self) -> LocalSession {
        *self.sync.session()
    }

    pub fn notification_channel(&self) -> NotificationChannel {
        NotificationChannel::new(self.sync(), self.chat_log())
    }

    pub fn frames(&self) -> FrameReceiver {
        self.sync.subscribe()
    }

    pub fn current_frame(&self) -> Option<Arc<ClientFrame>> {
        self.sync.current_frame()
    }

    pub async fn refresh(&self) -> Result<RefreshOutcome, SyncError> {
        self.sync.refresh().await
    }

    pub async fn select(&self, kind: ActionKind, target: PlayerId) -> Result<(), SelectionError> {
        self.sync.update_selection(|s| s.select(kind, target)).await
    }

    /// Select whichever target surface is open right now.
    pub async fn select_current(&self, target: PlayerId) -> Result<(), SelectionError> {
        let kind = match self.current_frame() {
            Some(frame) if frame.surfaces.candidates(ActionKind::NightAction).is_some() => {
                ActionKind::NightAction
            }
            _ => ActionKind::Vote,
        };
        self.select(kind, target).await
    }

    pub async fn set_draft(&self, text: impl Into<String>) {
        let text = text.into();
        self.sync.update_selection(move |s| s.set_draft(text)).await;
    }

    pub async fn submit(&self, request: SubmitRequest) -> Result<SubmitReceipt, SubmitError> {
        self.submitter.submit(request).await
    }

    /// Put `text` in the draft and submit it as a discussion line.
    pub async fn say(&self, text: impl Into<String>) -> Result<SubmitReceipt, SubmitError> {
        self.set_draft(text).await;
        self.submit(SubmitRequest::Discussion).await
    }

    pub async fn confirm(&self) -> Result<SubmitReceipt, SubmitError> {
        self.submitter.confirm().await
    }

    pub async fn send_chat(&self, message: &str) -> Result<(), ChatError> {
        self.chat.send(message).await
    }

    /// Start auto-pass and (when `poll_interval` is set) polling.
    pub fn spawn_background(
        &self,
        auto_pass_delay: Duration,
        poll_interval: Option<Duration>,
    ) -> BackgroundTasks {
        let mut tasks = BackgroundTasks {
            handles: vec![spawn_auto_pass(
                self.sync(),
                self.submitter(),
                auto_pass_delay,
            )],
        };
        if let Some(period) = poll_interval {
            tasks.push(spawn_polling(self.sync(), period));
        }
        tasks
    }

    pub async fn end(&self) {
        self.sync.end_session().await;
    }
}
