//! Event publication
//!
//! A small publish/subscribe bus: each [`Topic`] maps to a list of
//! subscribers, and [`EventBus::publish`] hands an [`Event`] to every
//! subscriber of its topic.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::QueryError;
use crate::protocol::Command;
use crate::session::Notification;

/// Something a client reports to its subscribers
#[derive(Debug)]
pub enum Event {
    /// Greeting consumed, the session accepts commands
    Connect,

    /// Transport closed; carries the commands that were never dispatched
    Close(Vec<Command>),

    /// Transport error; the session is faulted
    Error(QueryError),

    /// Server-pushed notification
    Notification(Notification),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Connect => Topic::Connect,
            Event::Close(_) => Topic::Close,
            Event::Error(_) => Topic::Error,
            Event::Notification(n) => Topic::Notification(n.name.clone()),
        }
    }
}

/// Subscription key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Topic {
    Connect,
    Close,
    Error,

    /// Notifications with this event name
    Notification(String),

    /// Every notification, whatever its name
    AnyNotification,
}

/// Handle returned by [`EventBus::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Arc<dyn Fn(&Event) + Send + Sync + 'static>;

/// Topic → subscribers
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<HashMap<Topic, Vec<(SubscriptionId, Handler)>>>,
    next_id: AtomicU64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&self, topic: Topic, handler: F) -> SubscriptionId
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.subscribers
            .write()
            .entry(topic)
            .or_default()
            .push((id, Arc::new(handler)));
        id
    }

    /// Remove a subscriber. Returns false if it was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.subscribers.write();
        let mut removed = false;
        for handlers in subscribers.values_mut() {
            let before = handlers.len();
            handlers.retain(|(sid, _)| *sid != id);
            removed |= handlers.len() != before;
        }
        subscribers.retain(|_, handlers| !handlers.is_empty());
        removed
    }

    /// Deliver `event` to the subscribers of its topic. Returns how many
    /// handlers ran.
    ///
    /// Handlers run without the bus lock held, so they may subscribe or
    /// unsubscribe.
    pub fn publish(&self, event: &Event) -> usize {
        let handlers = self.handlers_for(event);
        for handler in &handlers {
            handler(event);
        }
        handlers.len()
    }

    pub fn subscriber_count(&self, topic: &Topic) -> usize {
        self.subscribers.read().get(topic).map_or(0, Vec::len)
    }

    fn handlers_for(&self, event: &Event) -> Vec<Handler> {
        let subscribers = self.subscribers.read();
        let topic = event.topic();
        let mut handlers: Vec<Handler> = subscribers
            .get(&topic)
            .map(|hs| hs.iter().map(|(_, h)| Arc::clone(h)).collect())
            .unwrap_or_default();
        if matches!(topic, Topic::Notification(_)) {
            if let Some(any) = subscribers.get(&Topic::AnyNotification) {
                handlers.extend(any.iter().map(|(_, h)| Arc::clone(h)));
            }
        }
        handlers
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let subscribers = self.subscribers.read();
        let topics: Vec<_> = subscribers.iter().map(|(t, hs)| (t.clone(), hs.len())).collect();
        f.debug_struct("EventBus").field("topics", &topics).finish()
    }
}
