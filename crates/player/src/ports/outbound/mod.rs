//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing application services to talk to the game server without depending
//! on a concrete HTTP or WebSocket client.

pub mod api_port;
pub mod game_api_port;
pub mod player_events;

pub mod testing;

pub use api_port::ApiError;
pub use game_api_port::GameApiPort;
pub use player_events::{ChatNotice, PushEvent};

#[cfg(test)]
pub use game_api_port::MockGameApiPort;
