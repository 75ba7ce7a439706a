//! Observable event store.
//!
//! # Responsibility
//! - Own the canonical, insertion-ordered event list.
//! - Write every mutation through to durable storage.
//! - Notify subscribers so readers can re-derive their views.
//!
//! # Invariants
//! - Event IDs are unique across the live set.
//! - Readers only ever receive `&[Event]` snapshots.

pub mod event_store;
pub mod subscribers;
