//! Simple test fixtures used across unit tests.
//!
//! Wire-level builders (`*_dto`) feed the fake API; domain-level builders
//! feed the pure policy and presentation functions directly.

use wolfpack_domain::{GameId, GameSnapshot, LocalSession, Phase, PlayerId, PlayerView, Role};
use wolfpack_shared::{DiscussionDto, GameStateDto, PlayerDto};

use crate::ports::outbound::ApiError;

pub fn api_request_failed(msg: &str) -> ApiError {
    ApiError::RequestFailed(msg.to_string())
}

pub fn game_id() -> GameId {
    GameId::new("test-game").unwrap_or_else(|e| panic!("fixture game id: {e}"))
}

pub fn pid(raw: u32) -> PlayerId {
    PlayerId::new(raw).unwrap_or_else(|_| panic!("fixture player id {raw} must be non-zero"))
}

pub fn player_dto(player_id: u32, name: &str, is_alive: bool, role: Option<&str>) -> PlayerDto {
    PlayerDto {
        player_id,
        name: name.to_string(),
        is_alive,
        role: role.map(str::to_string),
    }
}

pub fn state_dto(day: u32, phase: &str, players: Vec<PlayerDto>) -> GameStateDto {
    GameStateDto {
        day,
        phase: phase.to_string(),
        players,
        ..GameStateDto::default()
    }
}

pub fn discussion_dto(player_id: u32, player_name: &str, content: &str) -> DiscussionDto {
    DiscussionDto {
        player_id,
        player_name: player_name.to_string(),
        content: content.to_string(),
    }
}

/// Four seats: 1 is the local player, 2 is a fellow werewolf, 3 is alive, 4 is dead.
pub fn standard_roster_dto(local_role: &str) -> Vec<PlayerDto> {
    let partner_role = (local_role == "werewolf").then_some("werewolf");
    vec![
        player_dto(1, "Ann", true, Some(local_role)),
        player_dto(2, "Bo", true, partner_role),
        player_dto(3, "Cy", true, None),
        player_dto(4, "Di", false, Some("villager")),
    ]
}

pub fn standard_state_dto(day: u32, phase: &str, local_role: &str) -> GameStateDto {
    let mut dto = state_dto(day, phase, standard_roster_dto(local_role));
    dto.local_player_role = Some(local_role.to_string());
    dto
}

pub fn player(player_id: u32, name: &str, is_alive: bool, role: Option<Role>) -> PlayerView {
    PlayerView {
        player_id: pid(player_id),
        name: name.to_string(),
        is_alive,
        role,
    }
}

pub fn snapshot(day: u32, phase: Phase, players: Vec<PlayerView>) -> GameSnapshot {
    GameSnapshot {
        day,
        phase,
        players,
        current_discussions: Vec::new(),
        player_history: Vec::new(),
        last_night_deaths: Vec::new(),
        winner: None,
        game_over: phase == Phase::GameOver,
        is_all_ai: false,
        local_player_role: None,
    }
}

/// Domain version of `standard_state_dto`.
pub fn standard_snapshot(day: u32, phase: Phase, local_role: Role) -> GameSnapshot {
    let partner = (local_role == Role::Werewolf).then_some(Role::Werewolf);
    let mut snap = snapshot(
        day,
        phase,
        vec![
            player(1, "Ann", true, Some(local_role)),
            player(2, "Bo", true, partner),
            player(3, "Cy", true, None),
            player(4, "Di", false, Some(Role::Villager)),
        ],
    );
    snap.local_player_role = Some(local_role);
    snap
}

pub fn local_session() -> LocalSession {
    LocalSession::player(pid(1))
}
