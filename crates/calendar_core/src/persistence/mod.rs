//! Persisted text format for the event set.
//!
//! # Responsibility
//! - Convert the in-memory event list to and from the durable text blob.
//!
//! # Invariants
//! - Writers always emit the current schema version.
//! - Readers never fail the caller; unreadable content loads as no events.

pub mod codec;
