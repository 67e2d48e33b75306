//! Owned publish/subscribe channel.
//!
//! Each controller holds one [`EventEmitter`]. Folds publish through their
//! controller; external code subscribes with [`EventEmitter::on`] or
//! [`EventEmitter::on_any`] and unsubscribes with the returned id.

use crate::model::{Event, EventKind};
use std::fmt;
use tracing::trace;

pub type Listener = Box<dyn FnMut(&Event)>;

/// Subscription handle returned by [`EventEmitter::on`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Subscription {
    id: ListenerId,
    /// `None` receives every kind.
    kind: Option<EventKind>,
    listener: Listener,
}

#[derive(Default)]
pub struct EventEmitter {
    next_id: u64,
    subscriptions: Vec<Subscription>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to one kind of event.
    pub fn on(&mut self, kind: EventKind, listener: impl FnMut(&Event) + 'static) -> ListenerId {
        self.subscribe(Some(kind), Box::new(listener))
    }

    /// Subscribe to every event.
    pub fn on_any(&mut self, listener: impl FnMut(&Event) + 'static) -> ListenerId {
        self.subscribe(None, Box::new(listener))
    }

    /// Returns whether the subscription existed.
    pub fn off(&mut self, id: ListenerId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|s| s.id != id);
        self.subscriptions.len() != before
    }

    /// Deliver `event` to matching listeners in subscription order.
    pub fn emit(&mut self, event: Event) {
        trace!(event = %event.kind, fold = ?event.fold, "emit");
        for subscription in &mut self.subscriptions {
            if subscription.kind.is_none_or(|kind| kind == event.kind) {
                (subscription.listener)(&event);
            }
        }
    }

    pub fn listener_count(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    fn subscribe(&mut self, kind: Option<EventKind>, listener: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.subscriptions.push(Subscription { id, kind, listener });
        id
    }
}

impl fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventEmitter")
            .field("listeners", &self.subscriptions.len())
            .finish()
    }
}
