//! Event store with write-through persistence.
//!
//! # Responsibility
//! - Provide create/update/delete entry points for callers.
//! - Re-serialize and write the full event set after every mutation.
//!
//! # Invariants
//! - Persistence is best-effort: a failed write is logged and recorded, the
//!   in-memory mutation still stands.
//! - Update/delete of an unknown ID is a no-op: nothing is written and no
//!   subscriber is notified.
//! - The store never reorders events.

use crate::model::event::{Event, EventId, EventPatch, EventValidationError, NewEvent};
use crate::persistence::codec;
use crate::storage::KeyValueStorage;
use crate::store::subscribers::{StoreChange, SubscriptionId, Subscribers};
use log::{debug, error, info, warn};
use uuid::Uuid;

/// Storage slot used when callers do not name one.
pub const DEFAULT_STORAGE_KEY: &str = "calendarEvents";

/// Single owner of the live event set.
pub struct EventStore<S: KeyValueStorage> {
    storage: S,
    key: String,
    events: Vec<Event>,
    subscribers: Subscribers,
    last_persist_error: Option<String>,
}

impl<S: KeyValueStorage> EventStore<S> {
    /// Opens the store over the default slot.
    pub fn open_default(storage: S) -> Self {
        Self::open(storage, DEFAULT_STORAGE_KEY)
    }

    /// Opens the store and loads the slot named `key`.
    ///
    /// Missing, unreadable or malformed content loads as an empty set.
    pub fn open(storage: S, key: impl Into<String>) -> Self {
        let key = key.into();
        let events = load_events(&storage, &key);
        info!(
            "event=store_open module=store status=ok count={}",
            events.len()
        );

        Self {
            storage,
            key,
            events,
            subscribers: Subscribers::new(),
            last_persist_error: None,
        }
    }

    /// Current snapshot in insertion order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.iter().find(|event| event.id == id)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn storage_key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Message of the most recent failed write-through, cleared by the next
    /// successful one.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// Registers a callback invoked after every effective mutation.
    pub fn subscribe(
        &mut self,
        callback: impl FnMut(&StoreChange, &[Event]) + 'static,
    ) -> SubscriptionId {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Appends a new event with a freshly minted ID.
    ///
    /// # Errors
    /// - `EmptyTitle` when the title is blank; the set is left untouched.
    pub fn create(&mut self, new_event: NewEvent) -> Result<Event, EventValidationError> {
        new_event.validate()?;

        let event = Event::from_new(self.mint_id(), new_event);
        self.events.push(event.clone());
        self.commit(StoreChange::Created(event.id));
        Ok(event)
    }

    /// Merges `patch` over the event with `id`.
    ///
    /// # Errors
    /// - `EmptyTitle` when the merged event would have a blank title; the
    ///   stored event is left untouched.
    pub fn update(&mut self, id: EventId, patch: EventPatch) -> Result<(), EventValidationError> {
        let Some(index) = self.position(id) else {
            debug!("event=store_update module=store status=skip reason=not_found id={id}");
            return Ok(());
        };

        let merged = patch.apply_to(&self.events[index]);
        merged.validate()?;
        self.events[index] = merged;
        self.commit(StoreChange::Updated(id));
        Ok(())
    }

    /// Removes the event with `id` when present.
    pub fn delete(&mut self, id: EventId) {
        let Some(index) = self.position(id) else {
            debug!("event=store_delete module=store status=skip reason=not_found id={id}");
            return;
        };

        self.events.remove(index);
        self.commit(StoreChange::Deleted(id));
    }

    fn position(&self, id: EventId) -> Option<usize> {
        self.events.iter().position(|event| event.id == id)
    }

    fn mint_id(&self) -> EventId {
        loop {
            let id = Uuid::new_v4();
            if self.position(id).is_none() {
                return id;
            }
        }
    }

    fn commit(&mut self, change: StoreChange) {
        self.persist();
        debug!(
            "event=store_notify module=store status=ok id={} subscribers={}",
            change.event_id(),
            self.subscribers.len()
        );
        self.subscribers.notify(&change, &self.events);
    }

    fn persist(&mut self) {
        let result = codec::serialize(&self.events)
            .map_err(|err| err.to_string())
            .and_then(|text| {
                self.storage
                    .set_item(&self.key, &text)
                    .map(|()| text.len())
                    .map_err(|err| err.to_string())
            });

        match result {
            Ok(bytes) => {
                debug!(
                    "event=store_persist module=store status=ok count={} bytes={}",
                    self.events.len(),
                    bytes
                );
                self.last_persist_error = None;
            }
            Err(message) => {
                error!(
                    "event=store_persist module=store status=error count={} error={}",
                    self.events.len(),
                    message
                );
                self.last_persist_error = Some(message);
            }
        }
    }
}

fn load_events(storage: &impl KeyValueStorage, key: &str) -> Vec<Event> {
    match storage.get_item(key) {
        Ok(Some(text)) => codec::deserialize(&text),
        Ok(None) => Vec::new(),
        Err(err) => {
            warn!("event=store_load module=store status=error fallback=empty error={err}");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{EventStore, DEFAULT_STORAGE_KEY};
    use crate::model::event::NewEvent;
    use crate::storage::MemoryStorage;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn create_keeps_insertion_order() {
        let mut store = EventStore::open_default(MemoryStorage::new());
        let late = store
            .create(NewEvent::new("late", day(20), "18:00", "19:00"))
            .unwrap();
        let early = store
            .create(NewEvent::new("early", day(1), "08:00", "09:00"))
            .unwrap();

        let ids: Vec<_> = store.events().iter().map(|event| event.id).collect();
        assert_eq!(ids, vec![late.id, early.id]);
        assert_eq!(store.storage_key(), DEFAULT_STORAGE_KEY);
    }

    #[test]
    fn failed_write_is_recorded_and_cleared() {
        let mut store = EventStore::open_default(MemoryStorage::new());
        store.storage().set_writable(false);

        store
            .create(NewEvent::new("offline", day(2), "10:00", "11:00"))
            .unwrap();
        assert_eq!(store.len(), 1);
        assert!(store.last_persist_error().is_some());

        store.storage().set_writable(true);
        store
            .create(NewEvent::new("online", day(3), "10:00", "11:00"))
            .unwrap();
        assert!(store.last_persist_error().is_none());
    }
}
