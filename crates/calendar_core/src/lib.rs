//! Core domain logic for the calendar.
//! This crate is the single source of truth for event invariants, occupancy
//! bucketing and navigation arithmetic.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod persistence;
pub mod storage;
pub mod store;
pub mod view;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, init_logging_from_config, logging_status};
pub use model::event::{Event, EventId, EventPatch, EventValidationError, NewEvent};
pub use model::time_of_day::{hour_label, parse_hour, HOURS_PER_DAY};
pub use persistence::codec::{deserialize, serialize, try_deserialize, CodecError};
pub use storage::{
    KeyValueStorage, MemoryStorage, SqliteKeyValueStorage, StorageError, StorageResult,
};
pub use store::event_store::{EventStore, DEFAULT_STORAGE_KEY};
pub use store::subscribers::{StoreChange, SubscriptionId};
pub use view::navigation::{
    month_cells, month_layout, shift, week_days, MonthLayout, ParseViewKindError, ViewKind,
    ViewState,
};
pub use view::occupancy::{events_at_hour, events_on_date, hourly_occupancy, HourSlot};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
