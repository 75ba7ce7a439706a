//! Derived calendar views.
//!
//! # Responsibility
//! - Bucket event snapshots by day and hour for grid cells.
//! - Provide the date arithmetic behind month/week/day navigation.
//!
//! # Invariants
//! - Every function here is pure and takes snapshots by shared reference.

pub mod navigation;
pub mod occupancy;
