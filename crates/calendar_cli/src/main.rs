//! Terminal month view over the configured calendar storage.
//!
//! Usage: `calendar_cli [YYYY-MM-DD]` (defaults to today).

use calendar_core::db::open_db;
use calendar_core::{
    events_on_date, hour_label, hourly_occupancy, init_logging_from_config, month_cells,
    CoreConfig, Event, EventStore, SqliteKeyValueStorage, HOURS_PER_DAY,
};
use chrono::{Datelike, Local, NaiveDate};
use log::info;
use std::process::ExitCode;

const WEEKDAY_HEADER: &str = "Mon Tue Wed Thu Fri Sat Sun";

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("calendar_cli: {message}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let config = CoreConfig::from_env()?;
    init_logging_from_config(&config)?;

    let selected = match std::env::args().nth(1) {
        Some(raw) => NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| format!("invalid date `{raw}`; expected YYYY-MM-DD"))?,
        None => Local::now().date_naive(),
    };

    let conn = open_db(&config.db_path).map_err(|err| format!("storage open failed: {err}"))?;
    let storage = SqliteKeyValueStorage::try_new(&conn)
        .map_err(|err| format!("storage init failed: {err}"))?;
    let store = EventStore::open(storage, config.storage_key.as_str());
    info!(
        "event=cli_render module=cli status=start count={}",
        store.len()
    );

    print!("{}", render_month(store.events(), selected));
    println!();
    print!("{}", render_day(store.events(), selected));
    Ok(())
}

fn render_month(events: &[Event], selected: NaiveDate) -> String {
    let mut out = format!("{}\n{WEEKDAY_HEADER}\n", selected.format("%B %Y"));
    for row in month_cells(selected).chunks(7) {
        let line = row
            .iter()
            .map(|cell| match cell {
                Some(date) => {
                    let marker = if events_on_date(events, *date).is_empty() {
                        ' '
                    } else {
                        '*'
                    };
                    format!("{:>2}{marker}", date.day())
                }
                None => "   ".to_string(),
            })
            .collect::<Vec<_>>()
            .join(" ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn render_day(events: &[Event], selected: NaiveDate) -> String {
    let mut out = format!("{}\n", selected.format("%A, %B %-d, %Y"));
    let day_events = events_on_date(events, selected);
    if day_events.is_empty() {
        out.push_str("  no events\n");
        return out;
    }

    for slot in hourly_occupancy(events, selected) {
        for event in slot.events {
            out.push_str(&format!(
                "  {}  {} ({} - {})\n",
                hour_label(slot.hour),
                event.title,
                event.start_time,
                event.end_time
            ));
        }
    }
    for event in day_events
        .iter()
        .filter(|event| !(0..HOURS_PER_DAY).any(|hour| event.occupies_hour(hour)))
    {
        out.push_str(&format!(
            "  --:--  {} ({} - {}, no hour slot)\n",
            event.title, event.start_time, event.end_time
        ));
    }
    out
}
