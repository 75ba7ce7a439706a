use calendar_core::{events_at_hour, events_on_date, Event, NewEvent};
use chrono::NaiveDate;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn event(title: &str, on: NaiveDate, start: &str, end: &str) -> Event {
    Event::from_new(Uuid::new_v4(), NewEvent::new(title, on, start, end))
}

fn titles(events: Vec<&Event>) -> Vec<&str> {
    events.into_iter().map(|event| event.title.as_str()).collect()
}

#[test]
fn events_on_date_matches_calendar_day_only() {
    let events = vec![
        event("a", date(2024, 3, 4), "09:00", "10:00"),
        event("b", date(2024, 3, 5), "09:00", "10:00"),
        event("c", date(2024, 3, 4), "18:00", "19:00"),
        event("d", date(2023, 3, 4), "09:00", "10:00"),
    ];

    assert_eq!(titles(events_on_date(&events, date(2024, 3, 4))), vec!["a", "c"]);
    assert!(events_on_date(&events, date(2024, 3, 6)).is_empty());
}

#[test]
fn hour_buckets_are_inclusive_on_both_ends() {
    let events = vec![event("standup", date(2024, 3, 4), "09:30", "10:00")];
    let on = date(2024, 3, 4);

    assert!(events_at_hour(&events, on, 8).is_empty());
    assert_eq!(titles(events_at_hour(&events, on, 9)), vec!["standup"]);
    assert_eq!(titles(events_at_hour(&events, on, 10)), vec!["standup"]);
    assert!(events_at_hour(&events, on, 11).is_empty());
}

#[test]
fn minutes_are_ignored_when_bucketing() {
    let events = vec![event("overlap", date(2024, 3, 4), "09:45", "10:05")];
    let on = date(2024, 3, 4);

    assert_eq!(events_at_hour(&events, on, 9).len(), 1);
    assert_eq!(events_at_hour(&events, on, 10).len(), 1);
}

#[test]
fn hour_lookup_respects_the_date() {
    let events = vec![
        event("monday", date(2024, 3, 4), "09:00", "10:00"),
        event("tuesday", date(2024, 3, 5), "09:00", "10:00"),
    ];

    assert_eq!(
        titles(events_at_hour(&events, date(2024, 3, 5), 9)),
        vec!["tuesday"]
    );
}

#[test]
fn unreadable_times_match_no_hour() {
    let events = vec![
        event("no start", date(2024, 3, 4), "", "10:00"),
        event("no end", date(2024, 3, 4), "09:00", "soon"),
        event("fine", date(2024, 3, 4), "09:00", "10:00"),
    ];
    let on = date(2024, 3, 4);

    for hour in 0..24 {
        let found = titles(events_at_hour(&events, on, hour));
        assert!(!found.contains(&"no start"));
        assert!(!found.contains(&"no end"));
    }
    assert_eq!(events_on_date(&events, on).len(), 3);
}

#[test]
fn results_keep_snapshot_order_and_leave_input_untouched() {
    let events = vec![
        event("late", date(2024, 3, 4), "09:00", "12:00"),
        event("early", date(2024, 3, 4), "08:00", "10:00"),
    ];
    let before = events.clone();

    assert_eq!(
        titles(events_at_hour(&events, date(2024, 3, 4), 9)),
        vec!["late", "early"]
    );
    assert_eq!(events, before);
}
