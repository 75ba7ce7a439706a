//! Calendar navigation: grid layout, date stepping and the active view.
//!
//! Weeks start on Monday throughout (Monday = 0 … Sunday = 6).

use chrono::{Datelike, Days, Duration, Months, NaiveDate};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Viewport width below which the view is forced to `Day`.
pub const DEFAULT_NARROW_VIEWPORT_WIDTH: u32 = 768;

const DAYS_PER_WEEK: u32 = 7;

/// Calendar view granularity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ViewKind {
    #[default]
    Month,
    Week,
    Day,
}

impl ViewKind {
    pub const ALL: [ViewKind; 3] = [ViewKind::Month, ViewKind::Week, ViewKind::Day];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
        }
    }
}

impl Display for ViewKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown view name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseViewKindError(pub String);

impl Display for ParseViewKindError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "unsupported view `{}`; expected month|week|day",
            self.0
        )
    }
}

impl Error for ParseViewKindError {}

impl FromStr for ViewKind {
    type Err = ParseViewKindError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "month" => Ok(Self::Month),
            "week" => Ok(Self::Week),
            "day" => Ok(Self::Day),
            other => Err(ParseViewKindError(other.to_string())),
        }
    }
}

/// Shape of a month in a 7-column grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthLayout {
    /// Blank cells before the 1st (Monday = 0).
    pub leading_blanks: u32,
    pub day_count: u32,
    /// `ceil((leading_blanks + day_count) / 7)`.
    pub week_rows: u32,
}

impl MonthLayout {
    pub fn cell_count(&self) -> u32 {
        self.week_rows * DAYS_PER_WEEK
    }
}

/// Computes the grid layout of the month containing `date`.
pub fn month_layout(date: NaiveDate) -> MonthLayout {
    let first = first_of_month(date);
    let leading_blanks = first.weekday().num_days_from_monday();
    let day_count = days_in_month(first);

    MonthLayout {
        leading_blanks,
        day_count,
        week_rows: (leading_blanks + day_count).div_ceil(DAYS_PER_WEEK),
    }
}

/// Lists the grid cells of the month containing `date`, row by row.
///
/// Blank cells before the 1st and after the last day are `None`; the list
/// always has `week_rows * 7` entries.
pub fn month_cells(date: NaiveDate) -> Vec<Option<NaiveDate>> {
    let layout = month_layout(date);
    let first = first_of_month(date);

    (0..layout.cell_count())
        .map(|cell| {
            let day_index = cell.checked_sub(layout.leading_blanks)?;
            if day_index >= layout.day_count {
                return None;
            }
            first.checked_add_days(Days::new(u64::from(day_index)))
        })
        .collect()
}

/// Moves `date` by `amount` units of `view`.
///
/// Month steps clamp to the end of shorter months (Jan 31 + 1 month is the
/// last day of February). Arithmetic leaving the representable range returns
/// `date` unchanged.
pub fn shift(date: NaiveDate, view: ViewKind, amount: i32) -> NaiveDate {
    let shifted = match view {
        ViewKind::Month => {
            let months = Months::new(amount.unsigned_abs());
            if amount >= 0 {
                date.checked_add_months(months)
            } else {
                date.checked_sub_months(months)
            }
        }
        ViewKind::Week => date.checked_add_signed(Duration::weeks(i64::from(amount))),
        ViewKind::Day => date.checked_add_signed(Duration::days(i64::from(amount))),
    };

    shifted.unwrap_or_else(|| {
        warn!(
            "event=nav_shift module=view status=error reason=out_of_range view={} amount={}",
            view, amount
        );
        date
    })
}

/// Returns Monday through Sunday of the week containing `date`.
///
/// `None` when part of that week lies outside the representable date range.
pub fn week_days(date: NaiveDate) -> Option<[NaiveDate; 7]> {
    let offset = u64::from(date.weekday().num_days_from_monday());
    let monday = date.checked_sub_days(Days::new(offset))?;
    monday.checked_add_days(Days::new(6))?;
    Some(std::array::from_fn(|index| monday + Days::new(index as u64)))
}

/// Days of the week containing `date` that fall inside the representable range.
fn clipped_week(date: NaiveDate) -> Vec<NaiveDate> {
    let offset = i64::from(date.weekday().num_days_from_monday());
    (0..7)
        .filter_map(|index| date.checked_add_signed(Duration::days(index - offset)))
        .collect()
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn days_in_month(first: NaiveDate) -> u32 {
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(first).num_days() as u32,
        // Only the last representable month overflows, and it is a December.
        None => 31,
    }
}

/// Active view plus the reference date it is anchored on.
///
/// Transitions are explicit (`select`) or a one-way downgrade to `Day` when
/// the viewport becomes narrow. Widening never restores the previous view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    view: ViewKind,
    anchor: NaiveDate,
    narrow_viewport_width: u32,
}

impl ViewState {
    pub fn new(anchor: NaiveDate) -> Self {
        Self::with_narrow_viewport_width(anchor, DEFAULT_NARROW_VIEWPORT_WIDTH)
    }

    pub fn with_narrow_viewport_width(anchor: NaiveDate, narrow_viewport_width: u32) -> Self {
        Self {
            view: ViewKind::default(),
            anchor,
            narrow_viewport_width,
        }
    }

    pub fn view(&self) -> ViewKind {
        self.view
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn select(&mut self, view: ViewKind) {
        self.view = view;
    }

    /// Applies a viewport width observed on load or resize.
    ///
    /// Returns `true` when this call switched the view to `Day`.
    pub fn apply_viewport_width(&mut self, width: u32) -> bool {
        if width >= self.narrow_viewport_width || self.view == ViewKind::Day {
            return false;
        }
        info!(
            "event=view_downgrade module=view status=ok from={} width={}",
            self.view, width
        );
        self.view = ViewKind::Day;
        true
    }

    /// Moves the anchor by `amount` units of the active view.
    pub fn step(&mut self, amount: i32) -> NaiveDate {
        self.anchor = shift(self.anchor, self.view, amount);
        self.anchor
    }

    pub fn jump_to(&mut self, date: NaiveDate) {
        self.anchor = date;
    }

    /// Dates shown by the active view.
    pub fn visible_dates(&self) -> Vec<NaiveDate> {
        match self.view {
            ViewKind::Month => month_cells(self.anchor).into_iter().flatten().collect(),
            ViewKind::Week => match week_days(self.anchor) {
                Some(days) => days.to_vec(),
                None => clipped_week(self.anchor),
            },
            ViewKind::Day => vec![self.anchor],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{days_in_month, first_of_month, ViewKind};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(date(2024, 2, 1)), 29);
        assert_eq!(days_in_month(date(2023, 2, 1)), 28);
        assert_eq!(days_in_month(date(2024, 12, 1)), 31);
        assert_eq!(days_in_month(date(2024, 4, 1)), 30);
    }

    #[test]
    fn first_of_month_drops_the_day() {
        assert_eq!(first_of_month(date(2024, 3, 31)), date(2024, 3, 1));
        assert_eq!(first_of_month(date(2024, 3, 1)), date(2024, 3, 1));
    }

    #[test]
    fn view_kind_parses_case_insensitively() {
        assert_eq!(" Week ".parse::<ViewKind>().unwrap(), ViewKind::Week);
        assert_eq!("DAY".parse::<ViewKind>().unwrap(), ViewKind::Day);
        let err = "year".parse::<ViewKind>().unwrap_err();
        assert!(err.to_string().contains("year"));
    }
}
