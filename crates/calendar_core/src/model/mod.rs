//! Calendar domain model.
//!
//! # Responsibility
//! - Define the canonical event record and its creation/patch payloads.
//! - Provide time-of-day helpers used by hour bucketing.
//!
//! # Invariants
//! - Every event is identified by a stable `EventId` minted by the store.
//! - Event data carries no timezone; dates are plain calendar dates.

pub mod event;
pub mod time_of_day;
