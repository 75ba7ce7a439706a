//! Versioned JSON codec for the event set.
//!
//! Current layout (version 1):
//!
//! ```json
//! {"version":1,"events":[{"id":"…","title":"…","description":"…",
//!   "startTime":"09:00","endTime":"09:30","date":"2024-03-04"}]}
//! ```
//!
//! Unversioned top-level arrays are read as the legacy layout, where `date`
//! may be a full RFC 3339 timestamp.

use crate::model::event::{Event, EventId, EventValidationError};
use chrono::{DateTime, Local, NaiveDate};
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Schema version written by this build.
pub const SCHEMA_VERSION: u64 = 1;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Codec failure.
#[derive(Debug)]
pub enum CodecError {
    Json(serde_json::Error),
    /// Document shape is neither the versioned envelope nor a legacy array.
    UnexpectedShape(&'static str),
    UnsupportedVersion {
        found: u64,
        supported: u64,
    },
    InvalidDate(String),
    Invalid(EventValidationError),
}

impl Display for CodecError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "invalid event document: {err}"),
            Self::UnexpectedShape(details) => write!(f, "unexpected event document: {details}"),
            Self::UnsupportedVersion { found, supported } => write!(
                f,
                "event document version {found} is not supported (expected {supported})"
            ),
            Self::InvalidDate(value) => write!(f, "invalid event date `{value}`"),
            Self::Invalid(err) => write!(f, "invalid stored event: {err}"),
        }
    }
}

impl Error for CodecError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
            Self::Invalid(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<EventValidationError> for CodecError {
    fn from(value: EventValidationError) -> Self {
        Self::Invalid(value)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredEvent {
    id: EventId,
    title: String,
    #[serde(default)]
    description: String,
    start_time: String,
    end_time: String,
    date: String,
}

#[derive(Debug, Serialize)]
struct StoredDocument {
    version: u64,
    events: Vec<StoredEvent>,
}

impl From<&Event> for StoredEvent {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            title: event.title.clone(),
            description: event.description.clone(),
            start_time: event.start_time.clone(),
            end_time: event.end_time.clone(),
            date: event.date.format(DATE_FORMAT).to_string(),
        }
    }
}

impl TryFrom<StoredEvent> for Event {
    type Error = CodecError;

    fn try_from(stored: StoredEvent) -> Result<Self, Self::Error> {
        let event = Event {
            id: stored.id,
            title: stored.title,
            description: stored.description,
            start_time: stored.start_time,
            end_time: stored.end_time,
            date: parse_stored_date(&stored.date)?,
        };
        event.validate()?;
        Ok(event)
    }
}

/// Serializes the ordered event list into the current document layout.
pub fn serialize(events: &[Event]) -> Result<String, CodecError> {
    let document = StoredDocument {
        version: SCHEMA_VERSION,
        events: events.iter().map(StoredEvent::from).collect(),
    };
    Ok(serde_json::to_string(&document)?)
}

/// Parses a stored document, failing when the document itself is malformed.
///
/// A broken envelope (invalid JSON, wrong shape, unsupported version) is an
/// error. Individual records that cannot be decoded or fail validation are
/// skipped, as are records sharing an ID with an earlier record.
pub fn try_deserialize(text: &str) -> Result<Vec<Event>, CodecError> {
    let document: Value = serde_json::from_str(text)?;
    let records = match document {
        Value::Array(records) => records,
        Value::Object(mut envelope) => {
            let version = envelope
                .get("version")
                .and_then(Value::as_u64)
                .ok_or(CodecError::UnexpectedShape("missing numeric `version`"))?;
            if version != SCHEMA_VERSION {
                return Err(CodecError::UnsupportedVersion {
                    found: version,
                    supported: SCHEMA_VERSION,
                });
            }
            match envelope.remove("events") {
                Some(Value::Array(records)) => records,
                _ => return Err(CodecError::UnexpectedShape("missing `events` array")),
            }
        }
        _ => {
            return Err(CodecError::UnexpectedShape(
                "expected an object or an array",
            ))
        }
    };

    let mut seen = HashSet::with_capacity(records.len());
    let mut events = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        let event = match decode_record(record) {
            Ok(event) => event,
            Err(err) => {
                warn!(
                    "event=codec_decode module=persistence status=skip reason=invalid_record index={} error={}",
                    index, err
                );
                continue;
            }
        };
        if !seen.insert(event.id) {
            warn!(
                "event=codec_decode module=persistence status=skip reason=duplicate_id id={}",
                event.id
            );
            continue;
        }
        events.push(event);
    }
    Ok(events)
}

fn decode_record(record: Value) -> Result<Event, CodecError> {
    Event::try_from(serde_json::from_value::<StoredEvent>(record)?)
}

/// Parses a stored document, loading a malformed document as an empty list.
pub fn deserialize(text: &str) -> Vec<Event> {
    match try_deserialize(text) {
        Ok(events) => events,
        Err(err) => {
            warn!(
                "event=codec_decode module=persistence status=error fallback=empty error={}",
                err
            );
            Vec::new()
        }
    }
}

/// Reads `YYYY-MM-DD`, or an RFC 3339 timestamp reduced to its local date.
fn parse_stored_date(value: &str) -> Result<NaiveDate, CodecError> {
    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|timestamp| timestamp.with_timezone(&Local).date_naive())
        .map_err(|_| CodecError::InvalidDate(value.to_string()))
}
