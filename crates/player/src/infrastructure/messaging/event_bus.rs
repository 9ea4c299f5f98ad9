//! Event Bus for receiving push notifications from the game server.
//!
//! Subscribers register callbacks that are invoked when events arrive.
//! Callbacks must not block; hand the event to a channel or spawn.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::ports::outbound::PushEvent;

type Subscriber = Box<dyn FnMut(PushEvent) + Send + 'static>;

/// Event bus for push events.
///
/// The bus holds strong references to subscribers, so they persist until
/// the bus is dropped.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl EventBus {
    /// Create a new EventBus with no subscribers.
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Subscribe to all events.
    ///
    /// The callback will be invoked for every event, including events for
    /// games other than the one this client is viewing.
    pub async fn subscribe(&self, callback: impl FnMut(PushEvent) + Send + 'static) {
        self.subscribers.lock().await.push(Box::new(callback));
    }

    /// Dispatch an event to all subscribers.
    ///
    /// Each subscriber's callback is invoked with a clone of the event.
    pub async fn dispatch(&self, event: PushEvent) {
        let mut subscribers = self.subscribers.lock().await;
        for subscriber in subscribers.iter_mut() {
            subscriber(event.clone());
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
