//! WebSocket client for the push notification channel
//!
//! - `client`: tokio-tungstenite connection task feeding the `EventBus`
//! - `core`: reconnection backoff math, free of any runtime dependency
//! - `shared`: constants and frame parsing

mod client;
mod core;
mod shared;

pub use client::NotificationClient;

pub(crate) use self::core::BackoffState;
