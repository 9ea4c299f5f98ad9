//! Session-related domain types

use crate::PlayerId;

/// Who the local client is for the lifetime of one game session.
///
/// Fixed at construction. In all-AI mode there is no distinguished local
/// player, so [`LocalSession::is_self`] is false for every player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalSession {
    local_player_id: PlayerId,
    all_ai: bool,
}

impl LocalSession {
    /// Session bound to a human participant.
    pub fn player(local_player_id: PlayerId) -> Self {
        Self {
            local_player_id,
            all_ai: false,
        }
    }

    /// Spectating session for a game played entirely by AI players.
    pub fn all_ai(local_player_id: PlayerId) -> Self {
        Self {
            local_player_id,
            all_ai: true,
        }
    }

    pub fn new(local_player_id: PlayerId, all_ai: bool) -> Self {
        Self {
            local_player_id,
            all_ai,
        }
    }

    pub fn local_player_id(&self) -> PlayerId {
        self.local_player_id
    }

    pub fn is_all_ai_mode(&self) -> bool {
        self.all_ai
    }

    /// "Is this the viewer" predicate, globally suppressed in all-AI mode.
    pub fn is_self(&self, player_id: PlayerId) -> bool {
        !self.all_ai && player_id == self.local_player_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(n: u32) -> PlayerId {
        PlayerId::new(n).unwrap()
    }

    #[test]
    fn is_self_matches_local_player() {
        let session = LocalSession::player(pid(1));
        assert!(session.is_self(pid(1)));
        assert!(!session.is_self(pid(2)));
    }

    #[test]
    fn all_ai_mode_suppresses_is_self() {
        let session = LocalSession::all_ai(pid(1));
        assert!(session.is_all_ai_mode());
        assert!(!session.is_self(pid(1)));
    }
}
