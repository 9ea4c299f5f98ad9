//! Action submission
//!
//! Builds a typed request from the current frame and selection, refuses it
//! locally when the current surfaces do not permit it, sends it, and
//! triggers exactly one refresh once the server accepts it. A failed
//! submission leaves the selection and draft untouched so the user can retry.

use std::sync::Arc;

use dashmap::DashSet;
use thiserror::Error;
use tokio::sync::Mutex;
use wolfpack_domain::Activation;
use wolfpack_shared::{ActionRequest, ActionType};

use crate::application::policy::ActionKind;
use crate::application::selection::SelectionController;
use crate::application::sync::{ClientFrame, RefreshOutcome, SyncEngine};
use crate::ports::outbound::{ApiError, GameApiPort};

/// What the user asked to submit. Targets and text come from the
/// selection controller, not from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitRequest {
    Discussion,
    Vote,
    NightAction,
    /// Empty night action for roles without a night ability.
    NightPass,
    NextPhase,
}

impl SubmitRequest {
    pub fn action_type(self) -> ActionType {
        match self {
            SubmitRequest::Discussion => ActionType::Discussion,
            SubmitRequest::Vote => ActionType::Vote,
            SubmitRequest::NightAction | SubmitRequest::NightPass => ActionType::NightAction,
            SubmitRequest::NextPhase => ActionType::NextPhase,
        }
    }
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("no game state has been received yet")]
    NotSynced,
    #[error("the game is over")]
    GameOver,
    #[error("{0} is not available right now")]
    NotAvailable(ActionType),
    #[error("there is nothing to confirm right now")]
    NothingToConfirm,
    #[error("discussion message is empty")]
    EmptyDiscussion,
    #[error("choose a {0:?} target first")]
    NoSelection(ActionKind),
    #[error("a {0} submission is already in flight")]
    AlreadyPending(ActionType),
    #[error("you have already passed this night")]
    AlreadyPassed,
    #[error("{0}")]
    Rejected(String),
    #[error("could not reach the game server: {0}")]
    Transport(#[from] ApiError),
}

/// Result of an accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReceipt {
    pub action_type: ActionType,
    /// `None` when the follow-up refresh failed; the next trigger will catch up.
    pub refresh: Option<RefreshOutcome>,
}

struct Prepared {
    request: ActionRequest,
    /// What to clear once the server accepts.
    clears: Clears,
}

enum Clears {
    Nothing,
    Draft(String),
    Selection(ActionKind),
}

impl Clears {
    fn apply(self, controller: &mut SelectionController) {
        match self {
            Clears::Nothing => {}
            Clears::Draft(sent) => controller.clear_draft_if(&sent),
            Clears::Selection(kind) => controller.reset(kind),
        }
    }
}

/// Releases the in-flight marker for an action type when dropped.
struct InFlight<'a> {
    set: &'a DashSet<ActionType>,
    action_type: ActionType,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.set.remove(&self.action_type);
    }
}

pub struct ActionSubmitter {
    api: Arc<dyn GameApiPort>,
    sync: Arc<SyncEngine>,
    in_flight: DashSet<ActionType>,
    /// Night activation whose pass the server accepted.
    passed: Mutex<Option<Activation>>,
}

impl ActionSubmitter {
    pub fn new(api: Arc<dyn GameApiPort>, sync: Arc<SyncEngine>) -> Self {
        Self {
            api,
            sync,
            in_flight: DashSet::new(),
            passed: Mutex::new(None),
        }
    }

    pub fn is_pending(&self, action_type: ActionType) -> bool {
        self.in_flight.contains(&action_type)
    }

    pub async fn has_passed(&self, activation: Activation) -> bool {
        *self.passed.lock().await == Some(activation)
    }

    #[tracing::instrument(skip(self), fields(game_id = %self.sync.game_id()))]
    pub async fn submit(&self, request: SubmitRequest) -> Result<SubmitReceipt, SubmitError> {
        let frame = self.sync.current_frame().ok_or(SubmitError::NotSynced)?;
        if frame.surfaces.is_terminal() {
            return Err(SubmitError::GameOver);
        }

        let action_type = request.action_type();
        let prepared = self.prepare(request, &frame).await?;
        let guard = self.claim(action_type)?;

        let ack = match self.api.submit_action(self.sync.game_id(), &prepared.request).await {
            Ok(ack) => ack,
            Err(e) => {
                tracing::warn!(%action_type, error = %e, "Action submission failed");
                return Err(SubmitError::Transport(e));
            }
        };
        if let Some(reason) = ack.rejection() {
            tracing::warn!(%action_type, reason, "Server rejected action");
            return Err(SubmitError::Rejected(reason.to_string()));
        }

        tracing::info!(%action_type, "Action accepted");
        if request == SubmitRequest::NightPass {
            *self.passed.lock().await = Some(frame.snapshot.activation());
        }
        let clears = prepared.clears;
        self.sync.update_selection(|s| clears.apply(s)).await;
        drop(guard);

        let refresh = match self.sync.refresh().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::warn!(%action_type, error = %e, "Refresh after submission failed");
                None
            }
        };
        Ok(SubmitReceipt {
            action_type,
            refresh,
        })
    }

    /// Pick the target-collecting submission that fits the current surfaces.
    pub async fn confirm(&self) -> Result<SubmitReceipt, SubmitError> {
        let frame = self.sync.current_frame().ok_or(SubmitError::NotSynced)?;
        let surfaces = &frame.surfaces;
        let request = if surfaces.vote.is_some() {
            SubmitRequest::Vote
        } else if surfaces.candidates(ActionKind::NightAction).is_some() {
            SubmitRequest::NightAction
        } else if surfaces.auto_pass() {
            SubmitRequest::NightPass
        } else if surfaces.is_terminal() {
            return Err(SubmitError::GameOver);
        } else {
            return Err(SubmitError::NothingToConfirm);
        };
        self.submit(request).await
    }

    async fn prepare(
        &self,
        request: SubmitRequest,
        frame: &ClientFrame,
    ) -> Result<Prepared, SubmitError> {
        let surfaces = &frame.surfaces;
        let action_type = request.action_type();

        match request {
            SubmitRequest::Discussion => {
                if !surfaces.can_discuss() {
                    return Err(SubmitError::NotAvailable(action_type));
                }
                let draft = self.sync.draft().await;
                let text = draft.trim();
                if text.is_empty() {
                    return Err(SubmitError::EmptyDiscussion);
                }
                Ok(Prepared {
                    request: ActionRequest::discussion(text),
                    clears: Clears::Draft(text.to_string()),
                })
            }
            SubmitRequest::Vote | SubmitRequest::NightAction => {
                let kind = match request {
                    SubmitRequest::Vote => ActionKind::Vote,
                    _ => ActionKind::NightAction,
                };
                if surfaces.candidates(kind).is_none() {
                    return Err(SubmitError::NotAvailable(action_type));
                }
                let target = self
                    .sync
                    .selected(kind)
                    .await
                    .ok_or(SubmitError::NoSelection(kind))?;
                let request = match kind {
                    ActionKind::Vote => ActionRequest::vote(target.get()),
                    ActionKind::NightAction => ActionRequest::night_action(Some(target.get())),
                };
                Ok(Prepared {
                    request,
                    clears: Clears::Selection(kind),
                })
            }
            SubmitRequest::NightPass => {
                if !surfaces.auto_pass() {
                    return Err(SubmitError::NotAvailable(action_type));
                }
                if self.has_passed(frame.snapshot.activation()).await {
                    return Err(SubmitError::AlreadyPassed);
                }
                Ok(Prepared {
                    request: ActionRequest::night_action(None),
                    clears: Clears::Nothing,
                })
            }
            SubmitRequest::NextPhase => {
                if !surfaces.can_advance() {
                    return Err(SubmitError::NotAvailable(action_type));
                }
                Ok(Prepared {
                    request: ActionRequest::next_phase(),
                    clears: Clears::Nothing,
                })
            }
        }
    }

    fn claim(&self, action_type: ActionType) -> Result<InFlight<'_>, SubmitError> {
        if !self.in_flight.insert(action_type) {
            tracing::debug!(%action_type, "Ignoring duplicate submission");
            return Err(SubmitError::AlreadyPending(action_type));
        }
        Ok(InFlight {
            set: &self.in_flight,
            action_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::{
        api_request_failed, game_id, local_session, pid, standard_state_dto,
    };
    use crate::ports::outbound::testing::FakeGameApi;
    use std::time::Duration;
    use wolfpack_domain::LocalSession;
    use wolfpack_shared::AckResponse;

    async fn synced(
        dto: wolfpack_shared::GameStateDto,
        session: LocalSession,
    ) -> (FakeGameApi, Arc<SyncEngine>, ActionSubmitter) {
        let api = FakeGameApi::with_state(dto);
        let port: Arc<dyn GameApiPort> = Arc::new(api.clone());
        let sync = Arc::new(SyncEngine::new(Arc::clone(&port), game_id(), session));
        sync.refresh().await.expect("initial refresh");
        let submitter = ActionSubmitter::new(port, Arc::clone(&sync));
        (api, sync, submitter)
    }

    #[tokio::test]
    async fn vote_sends_selected_target_and_refreshes_once() {
        let (api, sync, submitter) =
            synced(standard_state_dto(1, "vote", "villager"), local_session()).await;
        sync.update_selection(|s| s.select(ActionKind::Vote, pid(3)))
            .await
            .expect("candidate");

        let receipt = submitter.submit(SubmitRequest::Vote).await.expect("accepted");

        assert_eq!(api.submitted().await, vec![ActionRequest::vote(3)]);
        assert_eq!(api.fetch_count().await, 2);
        assert_eq!(receipt.refresh, Some(RefreshOutcome::Applied { stamp: 2 }));
        assert_eq!(sync.selected(ActionKind::Vote).await, None);
    }

    #[tokio::test]
    async fn vote_without_selection_is_refused_locally() {
        let (api, _sync, submitter) =
            synced(standard_state_dto(1, "vote", "villager"), local_session()).await;

        let err = submitter.submit(SubmitRequest::Vote).await.expect_err("refused");

        assert!(matches!(err, SubmitError::NoSelection(ActionKind::Vote)));
        assert!(api.submitted().await.is_empty());
    }

    #[tokio::test]
    async fn failed_submission_keeps_selection_and_skips_refresh() {
        let (api, sync, submitter) =
            synced(standard_state_dto(1, "night", "werewolf"), local_session()).await;
        sync.update_selection(|s| s.select(ActionKind::NightAction, pid(3)))
            .await
            .expect("candidate");
        api.push_action_ack(Err(api_request_failed("connection reset")))
            .await;

        let err = submitter
            .submit(SubmitRequest::NightAction)
            .await
            .expect_err("transport failure");

        assert!(matches!(err, SubmitError::Transport(_)));
        assert_eq!(sync.selected(ActionKind::NightAction).await, Some(pid(3)));
        assert_eq!(api.fetch_count().await, 1);
    }

    #[tokio::test]
    async fn server_rejection_is_surfaced_verbatim() {
        let (api, sync, submitter) =
            synced(standard_state_dto(1, "vote", "villager"), local_session()).await;
        sync.update_selection(|s| s.select(ActionKind::Vote, pid(2)))
            .await
            .expect("candidate");
        api.push_action_ack(Ok(AckResponse::rejected("已經投過票了"))).await;

        let err = submitter.submit(SubmitRequest::Vote).await.expect_err("rejected");

        assert_eq!(err.to_string(), "已經投過票了");
        assert_eq!(sync.selected(ActionKind::Vote).await, Some(pid(2)));
    }

    #[tokio::test]
    async fn discussion_trims_and_clears_the_draft() {
        let (api, sync, submitter) =
            synced(standard_state_dto(1, "day", "villager"), local_session()).await;

        sync.update_selection(|s| s.set_draft("   ")).await;
        assert!(matches!(
            submitter.submit(SubmitRequest::Discussion).await,
            Err(SubmitError::EmptyDiscussion)
        ));

        sync.update_selection(|s| s.set_draft("  Bo is lying  ")).await;
        submitter
            .submit(SubmitRequest::Discussion)
            .await
            .expect("accepted");

        assert_eq!(
            api.submitted().await,
            vec![ActionRequest::discussion("Bo is lying")]
        );
        assert_eq!(sync.draft().await, "");
    }

    #[tokio::test]
    async fn actions_outside_their_phase_are_not_available() {
        let (api, _sync, submitter) =
            synced(standard_state_dto(1, "day", "seer"), local_session()).await;

        assert!(matches!(
            submitter.submit(SubmitRequest::NightAction).await,
            Err(SubmitError::NotAvailable(ActionType::NightAction))
        ));
        assert!(matches!(
            submitter.submit(SubmitRequest::Vote).await,
            Err(SubmitError::NotAvailable(ActionType::Vote))
        ));
        assert!(matches!(
            submitter.submit(SubmitRequest::NightPass).await,
            Err(SubmitError::NotAvailable(ActionType::NightAction))
        ));
        assert!(api.submitted().await.is_empty());
    }

    #[tokio::test]
    async fn ending_discussion_sends_next_phase() {
        let (api, _sync, submitter) =
            synced(standard_state_dto(1, "day", "villager"), local_session()).await;

        submitter
            .submit(SubmitRequest::NextPhase)
            .await
            .expect("accepted");

        assert_eq!(api.submitted().await, vec![ActionRequest::next_phase()]);
    }

    #[tokio::test]
    async fn nothing_is_sent_after_game_over() {
        let mut dto = standard_state_dto(5, "gameover", "villager");
        dto.game_over = true;
        let (api, _sync, submitter) = synced(dto, local_session()).await;

        assert!(matches!(
            submitter.submit(SubmitRequest::Discussion).await,
            Err(SubmitError::GameOver)
        ));
        assert!(matches!(submitter.confirm().await, Err(SubmitError::GameOver)));
        assert!(api.submitted().await.is_empty());
    }

    #[tokio::test]
    async fn submitting_before_first_sync_is_refused() {
        let api = FakeGameApi::new();
        let port: Arc<dyn GameApiPort> = Arc::new(api.clone());
        let sync = Arc::new(SyncEngine::new(Arc::clone(&port), game_id(), local_session()));
        let submitter = ActionSubmitter::new(port, sync);

        assert!(matches!(
            submitter.submit(SubmitRequest::NextPhase).await,
            Err(SubmitError::NotSynced)
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn second_submission_while_pending_is_dropped() {
        let mut dto = standard_state_dto(1, "day", "villager");
        dto.is_all_ai = true;
        let (api, _sync, submitter) = synced(dto, LocalSession::all_ai(pid(1))).await;
        api.push_action_ack_after(Duration::from_millis(500), Ok(AckResponse::ok()))
            .await;

        let (first, second) = tokio::join!(
            submitter.submit(SubmitRequest::NextPhase),
            submitter.submit(SubmitRequest::NextPhase)
        );

        assert!(first.is_ok());
        assert!(matches!(
            second,
            Err(SubmitError::AlreadyPending(ActionType::NextPhase))
        ));
        assert_eq!(api.submitted().await, vec![ActionRequest::next_phase()]);
        assert!(!submitter.is_pending(ActionType::NextPhase));
    }

    #[tokio::test]
    async fn confirm_passes_for_roles_without_a_night_ability() {
        let (api, _sync, submitter) =
            synced(standard_state_dto(2, "night", "villager"), local_session()).await;

        let receipt = submitter.confirm().await.expect("accepted");

        assert_eq!(receipt.action_type, ActionType::NightAction);
        assert_eq!(api.submitted().await, vec![ActionRequest::night_action(None)]);
    }

    #[tokio::test]
    async fn night_pass_is_accepted_once_per_night() {
        let (api, sync, submitter) =
            synced(standard_state_dto(1, "night", "villager"), local_session()).await;
        api.push_action_ack(Err(api_request_failed("offline"))).await;

        assert!(matches!(
            submitter.submit(SubmitRequest::NightPass).await,
            Err(SubmitError::Transport(_))
        ));
        assert!(!submitter
            .has_passed(Activation::new(1, wolfpack_domain::Phase::Night))
            .await);

        submitter.confirm().await.expect("accepted");
        assert!(matches!(
            submitter.submit(SubmitRequest::NightPass).await,
            Err(SubmitError::AlreadyPassed)
        ));

        api.set_state(standard_state_dto(2, "night", "villager")).await;
        sync.refresh().await.expect("refresh");
        submitter
            .submit(SubmitRequest::NightPass)
            .await
            .expect("next night passes again");

        assert_eq!(api.submitted().await.len(), 3);
    }
}
