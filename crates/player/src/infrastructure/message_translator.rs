//! Translates wire types from the shared crate into domain and port types
//!
//! The application layer never sees `GameStateDto` or `ServerEvent`. Anything
//! that cannot be interpreted stops here: an unknown phase is a desync error,
//! an unknown role is treated as hidden.

use wolfpack_domain::{
    DeathRecord, DiscussionEntry, DomainError, GameId, GameSnapshot, Phase, PlayerId, PlayerView,
    Role,
};
use wolfpack_shared::{DeathDto, DiscussionDto, GameStateDto, PlayerDto, ServerEvent};

use crate::ports::outbound::{ChatNotice, PushEvent};

/// Translate a snapshot DTO into a validated domain snapshot.
pub fn translate_state(dto: GameStateDto) -> Result<GameSnapshot, DomainError> {
    let phase: Phase = dto.phase.parse()?;

    let snapshot = GameSnapshot {
        day: dto.day,
        phase,
        players: dto
            .players
            .into_iter()
            .map(translate_player)
            .collect::<Result<_, _>>()?,
        current_discussions: dto
            .current_discussions
            .into_iter()
            .map(translate_discussion)
            .collect::<Result<_, _>>()?,
        player_history: dto.player_history,
        last_night_deaths: dto
            .last_night_deaths
            .into_iter()
            .map(translate_death)
            .collect::<Result<_, _>>()?,
        winner: dto.winner.filter(|w| !w.trim().is_empty()),
        game_over: dto.game_over,
        is_all_ai: dto.is_all_ai,
        local_player_role: translate_role(dto.local_player_role),
    };
    snapshot.validate()?;
    Ok(snapshot)
}

/// Translate a push event. Returns `None` for events the client has no use for.
pub fn translate_event(event: ServerEvent) -> Option<PushEvent> {
    match event {
        ServerEvent::GameUpdate { game_id } => match GameId::new(game_id) {
            Ok(game_id) => Some(PushEvent::GameUpdate { game_id }),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping game_update with invalid game id");
                None
            }
        },
        ServerEvent::ChatMessage {
            game_id,
            player_name,
            player_id,
            message,
        } => match GameId::new(game_id) {
            Ok(game_id) => Some(PushEvent::Chat(ChatNotice {
                game_id,
                player_id: PlayerId::new(player_id).ok(),
                player_name,
                message,
            })),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping chat_message with invalid game id");
                None
            }
        },
        ServerEvent::Unknown => {
            tracing::debug!("Ignoring unknown push event");
            None
        }
    }
}

fn translate_player(dto: PlayerDto) -> Result<PlayerView, DomainError> {
    Ok(PlayerView {
        player_id: PlayerId::new(dto.player_id)?,
        name: dto.name,
        is_alive: dto.is_alive,
        role: translate_role(dto.role),
    })
}

fn translate_discussion(dto: DiscussionDto) -> Result<DiscussionEntry, DomainError> {
    Ok(DiscussionEntry {
        player_id: PlayerId::new(dto.player_id)?,
        player_name: dto.player_name,
        content: dto.content,
    })
}

fn translate_death(dto: DeathDto) -> Result<DeathRecord, DomainError> {
    Ok(DeathRecord {
        player_id: PlayerId::new(dto.player_id)?,
        name: dto.name,
        role: translate_role(dto.role),
    })
}

/// Missing, empty, or unrecognised roles all mean "not visible to this viewer".
fn translate_role(raw: Option<String>) -> Option<Role> {
    let raw = raw?;
    if raw.trim().is_empty() {
        return None;
    }
    match raw.parse::<Role>() {
        Ok(role) => Some(role),
        Err(e) => {
            tracing::warn!(role = %raw, error = %e, "Treating unrecognised role as hidden");
            None
        }
    }
}
