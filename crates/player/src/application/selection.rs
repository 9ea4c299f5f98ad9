//! Per-activation target selection and the discussion draft.
//!
//! Selections belong to one phase activation: when `(day, phase)` changes,
//! every selection is dropped. A selection also disappears when its target
//! stops being a candidate in a newer snapshot of the same activation.

use thiserror::Error;
use wolfpack_domain::{Activation, PlayerId};

use crate::application::policy::{ActionKind, ActionSurfaces};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("no {0:?} target can be chosen right now")]
    Closed(ActionKind),
    #[error("player {target} is not a valid {kind:?} target")]
    NotACandidate { kind: ActionKind, target: PlayerId },
}

/// What is currently selected, as published to the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub vote: Option<PlayerId>,
    pub night: Option<PlayerId>,
}

impl SelectionState {
    pub fn get(&self, kind: ActionKind) -> Option<PlayerId> {
        match kind {
            ActionKind::Vote => self.vote,
            ActionKind::NightAction => self.night,
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    candidates: Option<Vec<PlayerId>>,
    chosen: Option<PlayerId>,
}

impl Slot {
    fn offer(&mut self, candidates: Option<&[PlayerId]>) {
        match candidates {
            Some(candidates) => {
                if self.chosen.is_some_and(|c| !candidates.contains(&c)) {
                    self.chosen = None;
                }
                self.candidates = Some(candidates.to_vec());
            }
            None => *self = Self::default(),
        }
    }

    fn clear(&mut self) {
        self.chosen = None;
    }
}

#[derive(Debug, Default)]
pub struct SelectionController {
    activation: Option<Activation>,
    vote: Slot,
    night: Slot,
    draft: String,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bring selections in line with a freshly applied snapshot.
    pub fn sync(&mut self, activation: Activation, surfaces: &ActionSurfaces) {
        if self.activation != Some(activation) {
            if let Some(previous) = self.activation {
                tracing::debug!(
                    from_day = previous.day,
                    from_phase = %previous.phase,
                    to_day = activation.day,
                    to_phase = %activation.phase,
                    "Phase activation changed, dropping selections"
                );
            }
            self.activation = Some(activation);
            self.vote.clear();
            self.night.clear();
        }
        self.vote.offer(surfaces.candidates(ActionKind::Vote));
        self.night.offer(surfaces.candidates(ActionKind::NightAction));
    }

    /// Choose a target. Choosing a different one replaces the first.
    pub fn select(&mut self, kind: ActionKind, target: PlayerId) -> Result<(), SelectionError> {
        let slot = self.slot_mut(kind);
        let candidates = slot
            .candidates
            .as_deref()
            .ok_or(SelectionError::Closed(kind))?;
        if !candidates.contains(&target) {
            return Err(SelectionError::NotACandidate { kind, target });
        }
        slot.chosen = Some(target);
        Ok(())
    }

    pub fn reset(&mut self, kind: ActionKind) {
        self.slot_mut(kind).clear();
    }

    pub fn selected(&self, kind: ActionKind) -> Option<PlayerId> {
        self.slot(kind).chosen
    }

    pub fn is_submit_enabled(&self, kind: ActionKind) -> bool {
        self.selected(kind).is_some()
    }

    /// Candidates in server order with a "selected" mark each.
    pub fn marks(&self, kind: ActionKind) -> Vec<(PlayerId, bool)> {
        let slot = self.slot(kind);
        slot.candidates
            .iter()
            .flatten()
            .map(|c| (*c, slot.chosen == Some(*c)))
            .collect()
    }

    pub fn state(&self) -> SelectionState {
        SelectionState {
            vote: self.vote.chosen,
            night: self.night.chosen,
        }
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// Clear the draft unless it was edited after `submitted` was sent.
    pub fn clear_draft_if(&mut self, submitted: &str) {
        if self.draft.trim() == submitted {
            self.draft.clear();
        }
    }

    fn slot(&self, kind: ActionKind) -> &Slot {
        match kind {
            ActionKind::Vote => &self.vote,
            ActionKind::NightAction => &self.night,
        }
    }

    fn slot_mut(&mut self, kind: ActionKind) -> &mut Slot {
        match kind {
            ActionKind::Vote => &mut self.vote,
            ActionKind::NightAction => &mut self.night,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::policy::derive_surfaces;
    use crate::infrastructure::testing::fixtures::{local_session, pid, standard_snapshot};
    use wolfpack_domain::{GameSnapshot, Phase, Role};

    fn synced(snap: &GameSnapshot) -> SelectionController {
        let mut controller = SelectionController::new();
        controller.sync(snap.activation(), &derive_surfaces(snap, &local_session()));
        controller
    }

    #[test]
    fn selecting_twice_keeps_only_the_second() {
        let mut controller = synced(&standard_snapshot(1, Phase::Vote, Role::Villager));

        controller.select(ActionKind::Vote, pid(2)).expect("candidate");
        controller.select(ActionKind::Vote, pid(3)).expect("candidate");

        assert_eq!(controller.selected(ActionKind::Vote), Some(pid(3)));
        assert_eq!(
            controller.marks(ActionKind::Vote),
            vec![(pid(2), false), (pid(3), true)]
        );
    }

    #[test]
    fn rejects_non_candidates_and_closed_surfaces() {
        let mut controller = synced(&standard_snapshot(1, Phase::Vote, Role::Villager));

        assert_eq!(
            controller.select(ActionKind::Vote, pid(4)),
            Err(SelectionError::NotACandidate {
                kind: ActionKind::Vote,
                target: pid(4)
            })
        );
        assert_eq!(
            controller.select(ActionKind::NightAction, pid(2)),
            Err(SelectionError::Closed(ActionKind::NightAction))
        );
        assert!(!controller.is_submit_enabled(ActionKind::Vote));
    }

    #[test]
    fn new_activation_drops_selection() {
        let vote = standard_snapshot(1, Phase::Vote, Role::Villager);
        let mut controller = synced(&vote);
        controller.select(ActionKind::Vote, pid(2)).expect("candidate");

        // Same phase, next day: a new activation.
        let next_day = standard_snapshot(2, Phase::Vote, Role::Villager);
        controller.sync(
            next_day.activation(),
            &derive_surfaces(&next_day, &local_session()),
        );

        assert_eq!(controller.selected(ActionKind::Vote), None);
        assert!(!controller.is_submit_enabled(ActionKind::Vote));
    }

    #[test]
    fn same_activation_keeps_selection_until_target_dies() {
        let mut snap = standard_snapshot(1, Phase::Vote, Role::Villager);
        let mut controller = synced(&snap);
        controller.select(ActionKind::Vote, pid(2)).expect("candidate");

        controller.sync(snap.activation(), &derive_surfaces(&snap, &local_session()));
        assert_eq!(controller.selected(ActionKind::Vote), Some(pid(2)));

        snap.players[1].is_alive = false;
        controller.sync(snap.activation(), &derive_surfaces(&snap, &local_session()));
        assert_eq!(controller.selected(ActionKind::Vote), None);
    }

    #[test]
    fn reset_then_select_behaves_like_fresh() {
        let snap = standard_snapshot(1, Phase::Night, Role::Seer);
        let mut used = synced(&snap);
        used.select(ActionKind::NightAction, pid(3)).expect("candidate");
        used.reset(ActionKind::NightAction);
        used.select(ActionKind::NightAction, pid(2)).expect("candidate");

        let mut fresh = synced(&snap);
        fresh.select(ActionKind::NightAction, pid(2)).expect("candidate");

        assert_eq!(used.state(), fresh.state());
        assert_eq!(
            used.marks(ActionKind::NightAction),
            fresh.marks(ActionKind::NightAction)
        );
    }

    #[test]
    fn draft_survives_until_submitted_text_matches() {
        let mut controller = SelectionController::new();
        controller.set_draft("  I trust Bo ");

        controller.clear_draft_if("something else");
        assert_eq!(controller.draft(), "  I trust Bo ");

        controller.clear_draft_if("I trust Bo");
        assert_eq!(controller.draft(), "");
    }
}
