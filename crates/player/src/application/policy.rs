//! Phase action policy
//!
//! Decides which action surfaces the local participant gets for a snapshot.
//! Everything here is a pure function of `(GameSnapshot, LocalSession)`; the
//! server still validates every action, this only keeps illegal ones out of
//! reach.

use wolfpack_domain::{GameSnapshot, LocalSession, Phase, PlayerId, PlayerView, Role};

/// The two surfaces that collect a target before submitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Vote,
    NightAction,
}

/// The local player's role and life as this viewer knows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalStanding {
    pub role: Option<Role>,
    pub is_alive: bool,
}

impl LocalStanding {
    /// `local_player_role` wins over the roster entry: the roster may hide
    /// the local role from some server versions.
    pub fn resolve(snapshot: &GameSnapshot, session: &LocalSession) -> Self {
        let local = snapshot.player(session.local_player_id());
        let role = snapshot
            .local_player_role
            .or_else(|| local.and_then(PlayerView::visible_role));
        Self {
            role,
            is_alive: local.is_some_and(|p| p.is_alive),
        }
    }

    pub fn is_observer(&self) -> bool {
        self.role.is_some_and(|r| !r.is_participant())
    }

    /// Alive and taking part in the game.
    pub fn can_act(&self) -> bool {
        self.is_alive && !self.is_observer()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscussionSurface {
    pub input_enabled: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvanceKind {
    /// Day: close discussion and move to the vote.
    EndDiscussion,
    /// All-AI mode: step the game one phase.
    NextPhase,
    /// All-AI mode after the game ended.
    GameEnded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdvanceSurface {
    pub kind: AdvanceKind,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteSurface {
    pub candidates: Vec<PlayerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NightAbility {
    Kill,
    Inspect,
    NoAbility,
}

impl NightAbility {
    pub fn takes_target(self) -> bool {
        !matches!(self, NightAbility::NoAbility)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NightSurface {
    pub ability: NightAbility,
    pub candidates: Vec<PlayerId>,
    /// Submit an empty night action on the player's behalf.
    pub auto_pass: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultSurface {
    pub winner: Option<String>,
}

/// Everything the local participant may do right now. `None` means the
/// surface is not shown at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionSurfaces {
    pub discussion: Option<DiscussionSurface>,
    pub advance: Option<AdvanceSurface>,
    pub vote: Option<VoteSurface>,
    pub night: Option<NightSurface>,
    pub result: Option<ResultSurface>,
}

impl ActionSurfaces {
    pub fn is_terminal(&self) -> bool {
        self.result.is_some()
    }

    pub fn can_discuss(&self) -> bool {
        self.discussion.is_some_and(|d| d.input_enabled)
    }

    pub fn can_advance(&self) -> bool {
        self.advance.is_some_and(|a| a.enabled)
    }

    /// Open target selection for `kind`, if any.
    pub fn candidates(&self, kind: ActionKind) -> Option<&[PlayerId]> {
        match kind {
            ActionKind::Vote => self.vote.as_ref().map(|v| v.candidates.as_slice()),
            ActionKind::NightAction => self
                .night
                .as_ref()
                .filter(|n| n.ability.takes_target())
                .map(|n| n.candidates.as_slice()),
        }
    }

    pub fn auto_pass(&self) -> bool {
        self.night.as_ref().is_some_and(|n| n.auto_pass)
    }
}

/// Derive the action surfaces for one snapshot.
pub fn derive_surfaces(snapshot: &GameSnapshot, session: &LocalSession) -> ActionSurfaces {
    let phase = snapshot.effective_phase();

    if session.is_all_ai_mode() {
        return spectator_surfaces(snapshot, phase);
    }

    let standing = LocalStanding::resolve(snapshot, session);
    match phase {
        Phase::Setup => ActionSurfaces::default(),
        Phase::Day => ActionSurfaces {
            discussion: Some(DiscussionSurface {
                input_enabled: standing.can_act(),
            }),
            advance: Some(AdvanceSurface {
                kind: AdvanceKind::EndDiscussion,
                enabled: true,
            }),
            ..ActionSurfaces::default()
        },
        Phase::Vote if standing.can_act() => ActionSurfaces {
            vote: Some(VoteSurface {
                candidates: living_others(snapshot, session).map(|p| p.player_id).collect(),
            }),
            ..ActionSurfaces::default()
        },
        Phase::Vote => ActionSurfaces::default(),
        Phase::Night => ActionSurfaces {
            night: Some(night_surface(snapshot, session, standing)),
            ..ActionSurfaces::default()
        },
        Phase::GameOver => ActionSurfaces {
            result: Some(ResultSurface {
                winner: snapshot.winner.clone(),
            }),
            ..ActionSurfaces::default()
        },
    }
}

/// All-AI mode: the local user only watches and steps phases.
fn spectator_surfaces(snapshot: &GameSnapshot, phase: Phase) -> ActionSurfaces {
    let over = phase.is_terminal();
    ActionSurfaces {
        discussion: Some(DiscussionSurface {
            input_enabled: false,
        }),
        advance: Some(if over {
            AdvanceSurface {
                kind: AdvanceKind::GameEnded,
                enabled: false,
            }
        } else {
            AdvanceSurface {
                kind: AdvanceKind::NextPhase,
                enabled: true,
            }
        }),
        result: over.then(|| ResultSurface {
            winner: snapshot.winner.clone(),
        }),
        ..ActionSurfaces::default()
    }
}

fn night_surface(
    snapshot: &GameSnapshot,
    session: &LocalSession,
    standing: LocalStanding,
) -> NightSurface {
    let ability = match standing
        .role
        .filter(|r| standing.is_alive && r.has_night_ability())
    {
        Some(Role::Werewolf) => NightAbility::Kill,
        Some(Role::Seer) => NightAbility::Inspect,
        _ => NightAbility::NoAbility,
    };

    let candidates = match ability {
        // Fellow werewolves are never kill targets.
        NightAbility::Kill => living_others(snapshot, session)
            .filter(|p| !p.is_visibly(Role::Werewolf))
            .map(|p| p.player_id)
            .collect(),
        NightAbility::Inspect => living_others(snapshot, session).map(|p| p.player_id).collect(),
        NightAbility::NoAbility => Vec::new(),
    };

    NightSurface {
        ability,
        candidates,
        auto_pass: ability == NightAbility::NoAbility && !standing.is_observer(),
    }
}

fn living_others<'a>(
    snapshot: &'a GameSnapshot,
    session: &'a LocalSession,
) -> impl Iterator<Item = &'a PlayerView> + 'a {
    snapshot
        .alive_players()
        .filter(move |p| !session.is_self(p.player_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::fixtures::{
        local_session, pid, player, snapshot, standard_snapshot,
    };

    #[test]
    fn living_villager_sees_open_discussion_and_end_discussion() {
        let surfaces = derive_surfaces(
            &standard_snapshot(1, Phase::Day, Role::Villager),
            &local_session(),
        );

        assert!(surfaces.can_discuss());
        assert_eq!(
            surfaces.advance,
            Some(AdvanceSurface {
                kind: AdvanceKind::EndDiscussion,
                enabled: true
            })
        );
        assert!(surfaces.vote.is_none());
        assert!(surfaces.night.is_none());
    }

    #[test]
    fn vote_candidates_exclude_self_and_dead() {
        let surfaces = derive_surfaces(
            &standard_snapshot(1, Phase::Vote, Role::Villager),
            &local_session(),
        );

        let vote = surfaces.vote.expect("vote surface");
        assert_eq!(vote.candidates, vec![pid(2), pid(3)]);
    }

    #[test]
    fn full_table_vote_offers_every_other_living_player() {
        let players = ["Ann", "Bo", "Cy", "Di", "Ed"]
            .iter()
            .zip(1..)
            .map(|(name, id)| player(id, name, true, None))
            .collect();
        let surfaces = derive_surfaces(&snapshot(1, Phase::Vote, players), &local_session());

        let vote = surfaces.vote.expect("vote surface");
        assert_eq!(vote.candidates, vec![pid(2), pid(3), pid(4), pid(5)]);
        assert!(!vote.candidates.contains(&pid(1)));
    }

    #[test]
    fn werewolf_kill_candidates_skip_visible_packmates() {
        let surfaces = derive_surfaces(
            &standard_snapshot(1, Phase::Night, Role::Werewolf),
            &local_session(),
        );

        let night = surfaces.night.expect("night surface");
        assert_eq!(night.ability, NightAbility::Kill);
        assert_eq!(night.candidates, vec![pid(3)]);
        assert!(!night.auto_pass);
    }

    #[test]
    fn seer_may_inspect_any_living_other() {
        let surfaces = derive_surfaces(
            &standard_snapshot(1, Phase::Night, Role::Seer),
            &local_session(),
        );

        let night = surfaces.night.expect("night surface");
        assert_eq!(night.ability, NightAbility::Inspect);
        assert_eq!(night.candidates, vec![pid(2), pid(3)]);
    }

    #[test]
    fn villager_night_auto_passes_without_targets() {
        let surfaces = derive_surfaces(
            &standard_snapshot(1, Phase::Night, Role::Villager),
            &local_session(),
        );

        assert!(surfaces.auto_pass());
        assert_eq!(surfaces.candidates(ActionKind::NightAction), None);
    }

    #[test]
    fn dead_player_cannot_vote_or_speak() {
        let mut snap = standard_snapshot(2, Phase::Day, Role::Seer);
        snap.players[0].is_alive = false;
        let session = local_session();

        let day = derive_surfaces(&snap, &session);
        assert_eq!(day.discussion, Some(DiscussionSurface { input_enabled: false }));

        snap.phase = Phase::Vote;
        assert!(derive_surfaces(&snap, &session).vote.is_none());

        snap.phase = Phase::Night;
        let night = derive_surfaces(&snap, &session).night.expect("night surface");
        assert_eq!(night.ability, NightAbility::NoAbility);
        assert!(night.auto_pass);
    }

    #[test]
    fn observer_gets_no_auto_pass() {
        let mut snap = standard_snapshot(1, Phase::Night, Role::Observer);
        snap.players[0].role = Some(Role::Observer);

        let night = derive_surfaces(&snap, &local_session())
            .night
            .expect("night surface");
        assert_eq!(night.ability, NightAbility::NoAbility);
        assert!(!night.auto_pass);
    }

    #[test]
    fn game_over_flag_overrides_phase() {
        let mut snap = standard_snapshot(3, Phase::Night, Role::Werewolf);
        snap.game_over = true;
        snap.winner = Some("狼人".into());

        let surfaces = derive_surfaces(&snap, &local_session());
        assert!(surfaces.is_terminal());
        assert!(surfaces.night.is_none());
        assert_eq!(
            surfaces.result.and_then(|r| r.winner),
            Some("狼人".to_string())
        );
    }

    #[test]
    fn all_ai_mode_only_steps_phases() {
        let session = LocalSession::all_ai(pid(1));

        let night = derive_surfaces(&standard_snapshot(1, Phase::Night, Role::Werewolf), &session);
        assert!(night.night.is_none());
        assert!(!night.can_discuss());
        assert_eq!(
            night.advance,
            Some(AdvanceSurface {
                kind: AdvanceKind::NextPhase,
                enabled: true
            })
        );

        let over = derive_surfaces(&standard_snapshot(4, Phase::GameOver, Role::Werewolf), &session);
        assert!(over.is_terminal());
        assert!(!over.can_advance());
    }

    #[test]
    fn setup_offers_nothing() {
        let surfaces = derive_surfaces(
            &standard_snapshot(0, Phase::Setup, Role::Villager),
            &local_session(),
        );
        assert_eq!(surfaces, ActionSurfaces::default());
    }

    #[test]
    fn roster_role_is_used_when_snapshot_omits_local_role() {
        let snap = snapshot(
            1,
            Phase::Night,
            vec![
                player(1, "Ann", true, Some(Role::Seer)),
                player(2, "Bo", true, None),
            ],
        );

        let night = derive_surfaces(&snap, &local_session())
            .night
            .expect("night surface");
        assert_eq!(night.ability, NightAbility::Inspect);
    }

    #[test]
    fn targets_never_include_self_or_the_dead() {
        let phases = [Phase::Day, Phase::Vote, Phase::Night];
        let roles = [Role::Villager, Role::Seer, Role::Werewolf, Role::Observer];

        for phase in phases {
            for role in roles {
                for local_alive in [true, false] {
                    let mut snap = standard_snapshot(1, phase, role);
                    snap.players[0].is_alive = local_alive;
                    let surfaces = derive_surfaces(&snap, &local_session());

                    for kind in [ActionKind::Vote, ActionKind::NightAction] {
                        for target in surfaces.candidates(kind).unwrap_or_default() {
                            let view = snap.player(*target).expect("candidate is on roster");
                            assert!(view.is_alive, "{phase:?}/{role:?}: dead target {target}");
                            assert_ne!(*target, pid(1), "{phase:?}/{role:?}: self target");
                        }
                    }
                }
            }
        }
    }
}
