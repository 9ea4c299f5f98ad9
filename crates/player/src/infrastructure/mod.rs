pub mod http_client;
pub mod message_translator;
pub mod messaging;
pub mod websocket;

pub mod testing;

// Re-export messaging types
pub use messaging::{ConnectionState, EventBus};
