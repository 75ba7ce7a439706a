//! Time-of-day text helpers.
//!
//! Event times are stored verbatim as `HH:MM` text. Bucketing only reads the
//! hour component, so these helpers never interpret minutes.

use once_cell::sync::Lazy;
use regex::Regex;

/// Number of hour buckets in a day view.
pub const HOURS_PER_DAY: u32 = 24;

static LEADING_INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?\d+)").expect("valid leading integer regex"));

/// Extracts the hour component of a `HH:MM` time string.
///
/// Reads the leading integer of the text before the first `:`. Trailing
/// garbage after the digits is ignored (`"9am"` reads as `9`).
///
/// Returns `None` when no integer can be read; callers treat such events as
/// occupying no hour bucket.
pub fn parse_hour(value: &str) -> Option<i64> {
    let hour_part = value.split(':').next().unwrap_or_default();
    let captures = LEADING_INTEGER_RE.captures(hour_part)?;
    captures.get(1)?.as_str().parse::<i64>().ok()
}

/// Formats an hour bucket label such as `09:00`.
pub fn hour_label(hour: u32) -> String {
    format!("{hour:02}:00")
}

#[cfg(test)]
mod tests {
    use super::{hour_label, parse_hour};

    #[test]
    fn parse_hour_reads_zero_padded_and_bare_hours() {
        assert_eq!(parse_hour("09:45"), Some(9));
        assert_eq!(parse_hour("9:05"), Some(9));
        assert_eq!(parse_hour("23:59"), Some(23));
        assert_eq!(parse_hour(" 7"), Some(7));
    }

    #[test]
    fn parse_hour_ignores_trailing_text() {
        assert_eq!(parse_hour("9am"), Some(9));
        assert_eq!(parse_hour("10h30"), Some(10));
    }

    #[test]
    fn parse_hour_rejects_missing_digits() {
        assert_eq!(parse_hour(""), None);
        assert_eq!(parse_hour(":30"), None);
        assert_eq!(parse_hour("noon"), None);
        assert_eq!(parse_hour("99999999999999999999:00"), None);
    }

    #[test]
    fn hour_label_is_zero_padded() {
        assert_eq!(hour_label(0), "00:00");
        assert_eq!(hour_label(9), "09:00");
        assert_eq!(hour_label(17), "17:00");
    }
}
