//! Push-channel messaging infrastructure.
//!
//! - `EventBus`: fan out push events to subscribers (push-based subscription)
//! - `ConnectionHandle`: manage the push connection's lifecycle
//!
//! The WebSocket client (in the websocket module) feeds the bus from the transport.

pub mod connection;
pub mod event_bus;

pub use connection::{
    set_connection_state, ConnectionHandle, ConnectionState, ConnectionStateObserver,
};
pub use event_bus::EventBus;
