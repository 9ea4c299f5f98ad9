//! Snapshot synchronization
//!
//! `SyncEngine::refresh` is the only way a snapshot enters the client. Every
//! trigger (push notification, reconnect, post-submit, poll, manual refresh)
//! goes through it, and refreshes may overlap freely:
//!
//! - each response is stamped when it arrives
//! - applying a response (store, selection sync, frame publication) happens
//!   under one gate, and a stamp older than the applied one is discarded
//!
//! so the last response to arrive is what the UI shows.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use wolfpack_domain::{DomainError, GameId, GameSnapshot, LocalSession, PlayerId};
use wolfpack_shared::GameStateResponse;

use crate::application::policy::{derive_surfaces, ActionKind, ActionSurfaces};
use crate::application::selection::{SelectionController, SelectionState};
use crate::application::store::GameStateStore;
use crate::infrastructure::message_translator::translate_state;
use crate::ports::outbound::{ApiError, GameApiPort};

/// Poll cadence used when nothing else is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("snapshot fetch failed: {0}")]
    Transport(#[from] ApiError),
    #[error("server refused the snapshot fetch: {0}")]
    Rejected(String),
    #[error("server reported success without a game state")]
    MissingState,
    #[error("snapshot could not be interpreted: {0}")]
    Desync(#[from] DomainError),
    #[error("the game session has ended")]
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Applied { stamp: u64 },
    /// A response that arrived later was applied first.
    Superseded { stamp: u64, current: u64 },
}

/// Everything the presentation layer needs, published atomically.
#[derive(Debug, Clone)]
pub struct ClientFrame {
    pub stamp: u64,
    pub snapshot: Arc<GameSnapshot>,
    pub surfaces: Arc<ActionSurfaces>,
    pub selection: SelectionState,
}

pub type FrameReceiver = watch::Receiver<Option<Arc<ClientFrame>>>;

pub struct SyncEngine {
    api: Arc<dyn GameApiPort>,
    game_id: GameId,
    session: LocalSession,
    store: GameStateStore,
    selection: Mutex<SelectionController>,
    arrivals: AtomicU64,
    ended: AtomicBool,
    apply_gate: Mutex<()>,
    frames: watch::Sender<Option<Arc<ClientFrame>>>,
}

impl SyncEngine {
    pub fn new(api: Arc<dyn GameApiPort>, game_id: GameId, session: LocalSession) -> Self {
        let (frames, _) = watch::channel(None);
        Self {
            api,
            game_id,
            session,
            store: GameStateStore::new(),
            selection: Mutex::new(SelectionController::new()),
            arrivals: AtomicU64::new(0),
            ended: AtomicBool::new(false),
            apply_gate: Mutex::new(()),
            frames,
        }
    }

    pub fn game_id(&self) -> &GameId {
        &self.game_id
    }

    pub fn session(&self) -> &LocalSession {
        &self.session
    }

    pub fn store(&self) -> &GameStateStore {
        &self.store
    }

    pub fn subscribe(&self) -> FrameReceiver {
        self.frames.subscribe()
    }

    pub fn current_frame(&self) -> Option<Arc<ClientFrame>> {
        self.frames.borrow().clone()
    }

    /// Fetch the snapshot once and apply it if it is still the newest.
    ///
    /// On any failure the previous snapshot stays in place.
    #[tracing::instrument(skip(self), fields(game_id = %self.game_id))]
    pub async fn refresh(&self) -> Result<RefreshOutcome, SyncError> {
        if self.ended.load(Ordering::SeqCst) {
            return Err(SyncError::Ended);
        }
        let response = match self.api.fetch_state(&self.game_id).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "Snapshot fetch failed, keeping previous snapshot");
                return Err(e.into());
            }
        };
        let stamp = self.arrivals.fetch_add(1, Ordering::SeqCst) + 1;

        let snapshot = self.interpret(response).inspect_err(|e| {
            tracing::warn!(error = %e, "Discarding unusable snapshot");
        })?;
        self.apply(stamp, snapshot).await
    }

    fn interpret(&self, response: GameStateResponse) -> Result<GameSnapshot, SyncError> {
        if !response.success {
            return Err(SyncError::Rejected(
                response.error.unwrap_or_else(|| "unknown error".to_string()),
            ));
        }
        let dto = response.game_state.ok_or(SyncError::MissingState)?;
        let snapshot = translate_state(dto)?;
        if snapshot.is_all_ai != self.session.is_all_ai_mode() {
            tracing::warn!(
                server_all_ai = snapshot.is_all_ai,
                session_all_ai = self.session.is_all_ai_mode(),
                "Server mode flag disagrees with this session; keeping session mode"
            );
        }
        Ok(snapshot)
    }

    async fn apply(&self, stamp: u64, snapshot: GameSnapshot) -> Result<RefreshOutcome, SyncError> {
        let _gate = self.apply_gate.lock().await;
        if self.ended.load(Ordering::SeqCst) {
            tracing::debug!(stamp, "Dropping snapshot that arrived after session end");
            return Err(SyncError::Ended);
        }

        let snapshot = Arc::new(snapshot);
        if !self.store.apply(stamp, Arc::clone(&snapshot)).await {
            let current = self.store.applied_stamp().await;
            tracing::debug!(stamp, current, "Discarding superseded snapshot");
            return Ok(RefreshOutcome::Superseded { stamp, current });
        }

        let surfaces = Arc::new(derive_surfaces(&snapshot, &self.session));
        let selection = {
            let mut controller = self.selection.lock().await;
            controller.sync(snapshot.activation(), &surfaces);
            controller.state()
        };

        tracing::debug!(
            stamp,
            day = snapshot.day,
            phase = %snapshot.effective_phase(),
            "Applied snapshot"
        );
        self.frames.send_replace(Some(Arc::new(ClientFrame {
            stamp,
            snapshot,
            surfaces,
            selection,
        })));
        Ok(RefreshOutcome::Applied { stamp })
    }

    /// Run `f` against the selection controller and republish the frame if
    /// the visible selection changed.
    pub async fn update_selection<R>(&self, f: impl FnOnce(&mut SelectionController) -> R) -> R {
        let _gate = self.apply_gate.lock().await;

        let (result, selection) = {
            let mut controller = self.selection.lock().await;
            let result = f(&mut controller);
            (result, controller.state())
        };

        if let Some(frame) = self.current_frame() {
            if frame.selection != selection {
                self.frames.send_replace(Some(Arc::new(ClientFrame {
                    selection,
                    ..(*frame).clone()
                })));
            }
        }
        result
    }

    pub async fn selected(&self, kind: ActionKind) -> Option<PlayerId> {
        self.selection.lock().await.selected(kind)
    }

    pub async fn draft(&self) -> String {
        self.selection.lock().await.draft().to_string()
    }

    /// Drop the snapshot and stop publishing frames. Later refreshes fail
    /// with [`SyncError::Ended`].
    pub async fn end_session(&self) {
        let _gate = self.apply_gate.lock().await;
        self.ended.store(true, Ordering::SeqCst);
        self.store.clear().await;
        self.frames.send_replace(None);
        tracing::info!(game_id = %self.game_id, "Game session ended");
    }
}

/// Periodically refresh as a fallback for missed push notifications.
///
/// The first refresh happens one `period` after spawning.
pub fn spawn_polling(sync: Arc<SyncEngine>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            if let Err(e) = sync.refresh().await {
                tracing::debug!(error = %e, "Polling refresh failed");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::{
        game_id, local_session, pid, standard_state_dto,
    };
    use crate::ports::outbound::testing::{FakeGameApi, ScriptedFetch};
    use crate::ports::outbound::MockGameApiPort;
    use wolfpack_domain::Phase;

    fn engine(api: &FakeGameApi) -> Arc<SyncEngine> {
        Arc::new(SyncEngine::new(
            Arc::new(api.clone()),
            game_id(),
            local_session(),
        ))
    }

    #[tokio::test]
    async fn refresh_publishes_a_frame() {
        let api = FakeGameApi::with_state(standard_state_dto(1, "vote", "villager"));
        let sync = engine(&api);
        let mut frames = sync.subscribe();
        assert!(frames.borrow().is_none());

        let outcome = sync.refresh().await.expect("refresh");

        assert_eq!(outcome, RefreshOutcome::Applied { stamp: 1 });
        assert!(frames.has_changed().expect("sender alive"));
        let frame = frames.borrow_and_update().clone().expect("frame");
        assert_eq!(frame.snapshot.phase, Phase::Vote);
        assert!(frame.surfaces.vote.is_some());
    }

    #[tokio::test]
    async fn failed_fetch_keeps_previous_snapshot() {
        let api = FakeGameApi::new();
        api.push_fetch(ScriptedFetch::state(standard_state_dto(2, "day", "seer")))
            .await;
        api.push_fetch(ScriptedFetch::failure(ApiError::request_failed("offline")))
            .await;
        api.push_fetch(ScriptedFetch::rejected("game not found")).await;
        let sync = engine(&api);

        sync.refresh().await.expect("first refresh");
        assert!(matches!(sync.refresh().await, Err(SyncError::Transport(_))));
        assert!(matches!(sync.refresh().await, Err(SyncError::Rejected(m)) if m == "game not found"));

        let current = sync.store().current().await.expect("snapshot kept");
        assert_eq!(current.day, 2);
    }

    #[tokio::test]
    async fn unknown_phase_is_a_desync() {
        let api = FakeGameApi::with_state(standard_state_dto(1, "twilight", "villager"));
        let sync = engine(&api);

        assert!(matches!(sync.refresh().await, Err(SyncError::Desync(_))));
        assert!(sync.current_frame().is_none());
    }

    #[tokio::test]
    async fn success_without_state_is_rejected() {
        let mut mock = MockGameApiPort::new();
        mock.expect_fetch_state().times(1).returning(|_| {
            Ok(GameStateResponse {
                success: true,
                game_state: None,
                error: None,
            })
        });
        let sync = SyncEngine::new(Arc::new(mock), game_id(), local_session());

        assert!(matches!(sync.refresh().await, Err(SyncError::MissingState)));
    }

    #[tokio::test(start_paused = true)]
    async fn later_arriving_response_wins() {
        let api = FakeGameApi::new();
        // A is requested first but answers last.
        api.push_fetch(
            ScriptedFetch::state(standard_state_dto(1, "day", "villager"))
                .after(Duration::from_millis(200)),
        )
        .await;
        api.push_fetch(
            ScriptedFetch::state(standard_state_dto(2, "day", "villager"))
                .after(Duration::from_millis(10)),
        )
        .await;
        let sync = engine(&api);

        let (a, b) = tokio::join!(sync.refresh(), sync.refresh());

        assert_eq!(b.expect("b"), RefreshOutcome::Applied { stamp: 1 });
        assert_eq!(a.expect("a"), RefreshOutcome::Applied { stamp: 2 });
        let frame = sync.current_frame().expect("frame");
        assert_eq!(frame.snapshot.day, 1);
        assert_eq!(frame.stamp, 2);
    }

    #[tokio::test]
    async fn selection_changes_republish_the_frame() {
        let api = FakeGameApi::with_state(standard_state_dto(1, "vote", "villager"));
        let sync = engine(&api);
        sync.refresh().await.expect("refresh");
        let mut frames = sync.subscribe();
        frames.borrow_and_update();

        sync.update_selection(|s| s.select(ActionKind::Vote, pid(3)))
            .await
            .expect("candidate");

        assert!(frames.has_changed().expect("sender alive"));
        let frame = frames.borrow_and_update().clone().expect("frame");
        assert_eq!(frame.selection.vote, Some(pid(3)));
        assert_eq!(frame.stamp, 1);
    }

    #[tokio::test]
    async fn phase_change_clears_selection_in_the_frame() {
        let api = FakeGameApi::with_state(standard_state_dto(1, "vote", "villager"));
        let sync = engine(&api);
        sync.refresh().await.expect("refresh");
        sync.update_selection(|s| s.select(ActionKind::Vote, pid(2)))
            .await
            .expect("candidate");

        api.set_state(standard_state_dto(1, "night", "villager")).await;
        sync.refresh().await.expect("refresh");

        let frame = sync.current_frame().expect("frame");
        assert_eq!(frame.selection.vote, None);
        assert_eq!(sync.selected(ActionKind::Vote).await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn polling_refreshes_on_its_period() {
        let api = FakeGameApi::with_state(standard_state_dto(1, "day", "villager"));
        let sync = engine(&api);

        let poller = spawn_polling(Arc::clone(&sync), Duration::from_secs(5));
        tokio::time::sleep(Duration::from_millis(11_000)).await;
        poller.abort();

        assert_eq!(api.fetch_count().await, 2);
        assert!(sync.current_frame().is_some());
    }

    #[tokio::test]
    async fn end_session_clears_frames() {
        let api = FakeGameApi::with_state(standard_state_dto(1, "day", "villager"));
        let sync = engine(&api);
        sync.refresh().await.expect("refresh");

        sync.end_session().await;

        assert!(sync.current_frame().is_none());
        assert!(sync.store().current().await.is_none());
        assert!(matches!(sync.refresh().await, Err(SyncError::Ended)));
        assert!(sync.current_frame().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn response_in_flight_at_session_end_is_dropped() {
        let api = FakeGameApi::new();
        api.push_fetch(
            ScriptedFetch::state(standard_state_dto(1, "day", "villager"))
                .after(Duration::from_millis(100)),
        )
        .await;
        let sync = engine(&api);

        let pending = tokio::spawn({
            let sync = Arc::clone(&sync);
            async move { sync.refresh().await }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        sync.end_session().await;

        let result = pending.await.expect("refresh task");
        assert!(matches!(result, Err(SyncError::Ended)));
        assert!(sync.current_frame().is_none());
    }
}
