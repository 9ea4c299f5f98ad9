//! Wolfpack Protocol - wire types exchanged with the game server
//!
//! This crate contains the JSON shapes of:
//! - the snapshot fetch (`GameStateResponse` wrapping `GameStateDto`)
//! - action and chat submission (`ActionRequest`, `ChatRequest`, `AckResponse`)
//! - the push channel (`ServerEvent` inbound, `ClientMessage` outbound)
//!
//! ## Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and serde_json
//! 2. **No business logic** - Pure data types and serialization
//! 3. **Stringly wire vocabulary** - phases and roles stay `String` here;
//!    the player crate translates them into closed domain enums

pub mod game_state;
pub mod messages;
pub mod requests;
pub mod responses;

pub use game_state::{DeathDto, DiscussionDto, GameStateDto, PlayerDto};
pub use messages::{ClientMessage, ServerEvent};
pub use requests::{ActionRequest, ActionType, ChatRequest};
pub use responses::{AckResponse, GameStateResponse};
