//! Day and hour occupancy buckets.

use crate::model::event::Event;
use crate::model::time_of_day::HOURS_PER_DAY;
use chrono::NaiveDate;

/// Events occupying one hour of a day view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourSlot<'a> {
    pub hour: u32,
    pub events: Vec<&'a Event>,
}

/// Returns the events falling on `date`, in snapshot order.
pub fn events_on_date(events: &[Event], date: NaiveDate) -> Vec<&Event> {
    events.iter().filter(|event| event.date == date).collect()
}

/// Returns the events on `date` whose hour span includes `hour`.
///
/// The span is `start_hour..=end_hour` with minutes ignored, so an event
/// ending exactly on the hour still occupies that hour.
pub fn events_at_hour(events: &[Event], date: NaiveDate, hour: u32) -> Vec<&Event> {
    events
        .iter()
        .filter(|event| event.date == date && event.occupies_hour(hour))
        .collect()
}

/// Returns all hour buckets of `date`, from `00:00` to `23:00`.
pub fn hourly_occupancy(events: &[Event], date: NaiveDate) -> Vec<HourSlot<'_>> {
    let day_events = events_on_date(events, date);
    (0..HOURS_PER_DAY)
        .map(|hour| HourSlot {
            hour,
            events: day_events
                .iter()
                .copied()
                .filter(|event| event.occupies_hour(hour))
                .collect(),
        })
        .collect()
}
