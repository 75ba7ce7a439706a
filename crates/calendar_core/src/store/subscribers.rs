//! Change subscriber registry.

use crate::model::event::{Event, EventId};
use std::collections::BTreeMap;

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Mutation that triggered a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Created(EventId),
    Updated(EventId),
    Deleted(EventId),
}

impl StoreChange {
    pub fn event_id(&self) -> EventId {
        match self {
            Self::Created(id) | Self::Updated(id) | Self::Deleted(id) => *id,
        }
    }
}

type Callback = Box<dyn FnMut(&StoreChange, &[Event])>;

/// Callbacks keyed by subscription, invoked in subscription order.
#[derive(Default)]
pub struct Subscribers {
    callbacks: BTreeMap<SubscriptionId, Callback>,
    next_id: u64,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one callback.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&StoreChange, &[Event]) + 'static,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.callbacks.insert(id, Box::new(callback));
        id
    }

    /// Removes one callback. Returns `false` when the ID is unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.callbacks.remove(&id).is_some()
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    /// Invokes every callback with the change and the current snapshot.
    pub fn notify(&mut self, change: &StoreChange, snapshot: &[Event]) {
        for callback in self.callbacks.values_mut() {
            callback(change, snapshot);
        }
    }
}
