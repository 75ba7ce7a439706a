//! Event domain model.
//!
//! # Responsibility
//! - Define the canonical event record owned by the event store.
//! - Define the creation payload (`NewEvent`) and the explicit update payload
//!   (`EventPatch`) with its merge rule.
//!
//! # Invariants
//! - `id` is never nil and never changes after creation.
//! - `title` is non-empty after trimming whitespace.
//! - `start_time`/`end_time` are stored verbatim; `end_time < start_time` is
//!   not rejected.

use crate::model::time_of_day::parse_hour;
use chrono::NaiveDate;
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for every event.
pub type EventId = Uuid;

/// Validation failures for event data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventValidationError {
    /// Title is empty or whitespace only.
    EmptyTitle,
    /// Event ID is the nil UUID.
    NilId,
}

impl Display for EventValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "event title must not be empty"),
            Self::NilId => write!(f, "event id must not be nil"),
        }
    }
}

impl Error for EventValidationError {}

/// Canonical calendar event.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Event {
    /// Minted by the store on create.
    pub id: EventId,
    pub title: String,
    /// Free text; empty when the user gave no description.
    pub description: String,
    /// Local time of day, `HH:MM`.
    pub start_time: String,
    /// Local time of day, `HH:MM`.
    pub end_time: String,
    /// Calendar day the event occurs on.
    pub date: NaiveDate,
}

impl Event {
    /// Builds an event from a creation payload and an already minted ID.
    pub fn from_new(id: EventId, new_event: NewEvent) -> Self {
        Self {
            id,
            title: new_event.title,
            description: new_event.description,
            start_time: new_event.start_time,
            end_time: new_event.end_time,
            date: new_event.date,
        }
    }

    /// Checks the record-level invariants.
    pub fn validate(&self) -> Result<(), EventValidationError> {
        if self.id.is_nil() {
            return Err(EventValidationError::NilId);
        }
        validate_title(&self.title)
    }

    /// Hour component of `start_time`, `None` when unreadable.
    pub fn start_hour(&self) -> Option<i64> {
        parse_hour(&self.start_time)
    }

    /// Hour component of `end_time`, `None` when unreadable.
    pub fn end_hour(&self) -> Option<i64> {
        parse_hour(&self.end_time)
    }

    /// Returns whether this event occupies the given hour bucket.
    ///
    /// Both endpoints are inclusive and minutes are ignored, so 09:30-10:00
    /// occupies hour 9 and hour 10. An unreadable start or end hour occupies
    /// nothing.
    pub fn occupies_hour(&self, hour: u32) -> bool {
        let hour = i64::from(hour);
        match (self.start_hour(), self.end_hour()) {
            (Some(start), Some(end)) => start <= hour && end >= hour,
            _ => false,
        }
    }
}

/// Creation payload: every event field except the ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub start_time: String,
    pub end_time: String,
    pub date: NaiveDate,
}

impl NewEvent {
    /// Creates a payload with an empty description.
    pub fn new(
        title: impl Into<String>,
        date: NaiveDate,
        start_time: impl Into<String>,
        end_time: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            start_time: start_time.into(),
            end_time: end_time.into(),
            date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn validate(&self) -> Result<(), EventValidationError> {
        validate_title(&self.title)
    }
}

/// Explicit update payload.
///
/// Merge rule: a field set to `Some` overwrites the stored value, a field left
/// as `None` keeps it. The ID is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub date: Option<NaiveDate>,
}

impl EventPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn start_time(mut self, start_time: impl Into<String>) -> Self {
        self.start_time = Some(start_time.into());
        self
    }

    pub fn end_time(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }

    pub fn date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Returns whether the patch changes nothing.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.start_time.is_none()
            && self.end_time.is_none()
            && self.date.is_none()
    }

    /// Returns a copy of `event` with this patch merged over it.
    pub fn apply_to(&self, event: &Event) -> Event {
        Event {
            id: event.id,
            title: self.title.clone().unwrap_or_else(|| event.title.clone()),
            description: self
                .description
                .clone()
                .unwrap_or_else(|| event.description.clone()),
            start_time: self
                .start_time
                .clone()
                .unwrap_or_else(|| event.start_time.clone()),
            end_time: self
                .end_time
                .clone()
                .unwrap_or_else(|| event.end_time.clone()),
            date: self.date.unwrap_or(event.date),
        }
    }
}

fn validate_title(title: &str) -> Result<(), EventValidationError> {
    if title.trim().is_empty() {
        return Err(EventValidationError::EmptyTitle);
    }
    Ok(())
}
