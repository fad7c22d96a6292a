//! Forecast windowing: which hourly records form the "next 24 hours" strip, and
//! which hour/day is the current one.
//!
//! Every function takes `now` explicitly, expressed on the same wall clock as
//! the forecast timestamps (see [`crate::Location::local_now`]). Nothing here
//! reads the system clock.
//!
//! # Window boundaries
//!
//! `now` is truncated down to [`WINDOW_RESOLUTION_SECS`] before the window is
//! laid out, so the record for the hour currently in progress is included.
//! Both ends are inclusive: with hourly data and `now = 14:30`, the window is
//! `14:00 ..= 14:00 (+1 day)`, 25 records.

use chrono::{Datelike, DurationRound, NaiveDate, NaiveDateTime, TimeDelta, Timelike};

use crate::model::{ForecastDay, HourRecord};

/// Resolution of forecast timestamps; `now` is truncated to this before windowing.
pub const WINDOW_RESOLUTION_SECS: i64 = 60 * 60;

/// Length of the look-ahead window.
pub const WINDOW_SPAN_HOURS: i64 = 24;

/// True iff `time` falls in the same calendar hour as `now`.
///
/// Year, month, day and hour are all compared; matching on hour and day alone
/// would also light up the same slot a month or a year away.
pub fn is_same_hour(time: NaiveDateTime, now: NaiveDateTime) -> bool {
    time.year() == now.year()
        && time.month() == now.month()
        && time.day() == now.day()
        && time.hour() == now.hour()
}

pub fn is_current_hour(record: &HourRecord, now: NaiveDateTime) -> bool {
    is_same_hour(record.time, now)
}

/// True iff `date` is `now`'s calendar date (year included).
pub fn is_today(date: NaiveDate, now: NaiveDateTime) -> bool {
    date.year() == now.year() && date.month() == now.month() && date.day() == now.day()
}

/// Inclusive `(start, end)` bounds of the window for `now`.
pub fn window_bounds(now: NaiveDateTime) -> (NaiveDateTime, NaiveDateTime) {
    let start = now
        .duration_trunc(TimeDelta::seconds(WINDOW_RESOLUTION_SECS))
        .unwrap_or(now);
    let end = start
        .checked_add_signed(TimeDelta::hours(WINDOW_SPAN_HOURS))
        .unwrap_or(NaiveDateTime::MAX);

    (start, end)
}

/// Hourly records within the next 24 hours of `now`, in supply order.
///
/// Days are flattened as given, so the output is chronological only when `days`
/// is sorted by date. The iterator is lazy and borrows `days`; calling again (or
/// cloning it) starts over from the beginning.
pub fn next_24_hour_window(
    days: &[ForecastDay],
    now: NaiveDateTime,
) -> impl Iterator<Item = &HourRecord> + Clone {
    let (start, end) = window_bounds(now);

    days.iter()
        .flat_map(|day| day.hour.iter())
        .filter(move |record| start <= record.time && record.time <= end)
}
