//! Wolfpack Domain - vocabulary and snapshot model for the werewolf client.
//!
//! Everything here is pure data plus invariants. The server is the sole
//! source of truth for these values; the client only reads them.

pub mod types;

pub mod error;
pub mod ids;
pub mod snapshot;

pub use error::DomainError;
pub use ids::{GameId, PlayerId};
pub use snapshot::{DeathRecord, DiscussionEntry, GameSnapshot, PlayerView};
pub use types::{Activation, LocalSession, Phase, Role};
