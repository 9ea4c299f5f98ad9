//! Shared helpers for the WebSocket client.
//!
//! Runtime-agnostic (no tokio) so the parsing and constants can be tested
//! without a socket.

use wolfpack_shared::ServerEvent;

// Reconnection constants
pub const INITIAL_RETRY_DELAY_MS: u64 = 1_000;
pub const MAX_RETRY_DELAY_MS: u64 = 30_000;
pub const MAX_RETRY_ATTEMPTS: u32 = 10;
pub const BACKOFF_MULTIPLIER: f64 = 2.0;

/// Keep-alive cadence for an otherwise idle connection.
pub const HEARTBEAT_INTERVAL_SECS: u64 = 30;

pub fn parse_server_event(text: &str) -> Result<ServerEvent, serde_json::Error> {
    serde_json::from_str(text)
}
