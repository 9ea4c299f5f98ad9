//! Frame to view-model projection.
//!
//! `derive_view` is pure: the same frame, session and locale always give the
//! same view. Renderers only format what is here.

use wolfpack_domain::{GameSnapshot, LocalSession, Phase, PlayerId};

use crate::application::policy::{ActionKind, ActionSurfaces};
use crate::application::sync::ClientFrame;

use super::labels::{self, Locale};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerRow {
    pub player_id: PlayerId,
    /// Name with the self marker appended for the local player.
    pub display_name: String,
    pub is_alive: bool,
    pub life_label: &'static str,
    pub role_label: &'static str,
    pub is_self: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionLine {
    pub speaker: String,
    pub content: String,
    pub is_self: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscussionPanel {
    pub lines: Vec<DiscussionLine>,
    pub input_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetOption {
    pub player_id: PlayerId,
    pub label: String,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetPanel {
    pub prompt: &'static str,
    pub options: Vec<TargetOption>,
    pub submit_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdvanceButton {
    pub label: &'static str,
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameView {
    pub header: String,
    pub phase: Phase,
    pub alive_summary: String,
    pub players: Vec<PlayerRow>,
    pub discussion: Option<DiscussionPanel>,
    pub history: Vec<String>,
    /// Only filled on Day 2 onwards when someone died.
    pub last_night_deaths: Vec<String>,
    pub vote: Option<TargetPanel>,
    pub night: Option<TargetPanel>,
    /// Shown instead of a night panel when there is nothing to choose.
    pub night_notice: Option<&'static str>,
    pub advance: Option<AdvanceButton>,
    pub result: Option<String>,
}

pub fn derive_view(frame: &ClientFrame, session: &LocalSession, locale: Locale) -> GameView {
    let snapshot = frame.snapshot.as_ref();
    let surfaces = frame.surfaces.as_ref();
    let phase = snapshot.effective_phase();

    let players = snapshot
        .players
        .iter()
        .map(|p| {
            let is_self = session.is_self(p.player_id);
            PlayerRow {
                player_id: p.player_id,
                display_name: with_marker(locale, &p.name, is_self),
                is_alive: p.is_alive,
                life_label: labels::life_label(locale, p.is_alive),
                role_label: labels::role_label(locale, p.visible_role()),
                is_self,
            }
        })
        .collect();

    let discussion = surfaces.discussion.map(|d| DiscussionPanel {
        lines: snapshot
            .current_discussions
            .iter()
            .map(|entry| {
                let is_self = session.is_self(entry.player_id);
                DiscussionLine {
                    speaker: with_marker(locale, &entry.player_name, is_self),
                    content: entry.content.clone(),
                    is_self,
                }
            })
            .collect(),
        input_enabled: d.input_enabled,
    });

    let last_night_deaths = if phase == Phase::Day {
        snapshot
            .last_night_deaths
            .iter()
            .map(|d| labels::name_with_role(locale, &d.name, d.role))
            .collect()
    } else {
        Vec::new()
    };

    let (night, night_notice) = match &surfaces.night {
        Some(n) if n.ability.takes_target() => (
            Some(target_panel(
                snapshot,
                surfaces,
                frame,
                ActionKind::NightAction,
                labels::night_prompt(locale, n.ability),
            )),
            None,
        ),
        Some(n) => (None, Some(labels::night_prompt(locale, n.ability))),
        None => (None, None),
    };

    GameView {
        header: format!(
            "{} · {}",
            labels::day_label(locale, snapshot.day),
            labels::phase_label(locale, phase)
        ),
        phase,
        alive_summary: labels::alive_summary(locale, snapshot.alive_count(), snapshot.players.len()),
        players,
        discussion,
        history: snapshot.player_history.clone(),
        last_night_deaths,
        vote: surfaces.vote.as_ref().map(|_| {
            target_panel(
                snapshot,
                surfaces,
                frame,
                ActionKind::Vote,
                labels::vote_prompt(locale),
            )
        }),
        night,
        night_notice,
        advance: surfaces.advance.map(|a| AdvanceButton {
            label: labels::advance_label(locale, a.kind),
            enabled: a.enabled,
        }),
        result: surfaces
            .result
            .as_ref()
            .map(|r| labels::winner_text(locale, r.winner.as_deref())),
    }
}

fn with_marker(locale: Locale, name: &str, is_self: bool) -> String {
    if is_self {
        format!("{name}{}", labels::self_marker(locale))
    } else {
        name.to_string()
    }
}

fn target_panel(
    snapshot: &GameSnapshot,
    surfaces: &ActionSurfaces,
    frame: &ClientFrame,
    kind: ActionKind,
    prompt: &'static str,
) -> TargetPanel {
    let selected = frame.selection.get(kind);
    let options = surfaces
        .candidates(kind)
        .unwrap_or_default()
        .iter()
        .map(|id| TargetOption {
            player_id: *id,
            label: snapshot
                .player(*id)
                .map(|p| format!("{} ({})", p.name, id))
                .unwrap_or_else(|| id.to_string()),
            selected: selected == Some(*id),
        })
        .collect();

    TargetPanel {
        prompt,
        options,
        submit_enabled: selected.is_some(),
    }
}
