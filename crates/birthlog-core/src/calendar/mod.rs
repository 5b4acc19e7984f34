//! Calendar week arithmetic.
//!
//! Every function here is pure. Weeks begin on a configurable weekday
//! (Monday by default) and are identified by the date of that first day.

mod clock;

pub use clock::{Clock, FixedClock, SystemClock};

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Days in a tracked week.
pub const DAYS_PER_WEEK: i64 = 7;

/// Position of `date` within its week, 0 for the first day.
fn offset_in_week(date: NaiveDate, week_starts_on: Weekday) -> i64 {
    let day = date.weekday().num_days_from_monday() as i64;
    let start = week_starts_on.num_days_from_monday() as i64;
    (day - start).rem_euclid(DAYS_PER_WEEK)
}

/// First day of the week containing `date`.
pub fn week_start(date: NaiveDate, week_starts_on: Weekday) -> NaiveDate {
    date - Duration::days(offset_in_week(date, week_starts_on))
}

/// Last day of the week containing `date`.
pub fn week_end(date: NaiveDate, week_starts_on: Weekday) -> NaiveDate {
    week_start(date, week_starts_on) + Duration::days(DAYS_PER_WEEK - 1)
}

/// Whether `a` and `b` fall in the same tracked week.
pub fn same_week(a: NaiveDate, b: NaiveDate, week_starts_on: Weekday) -> bool {
    week_start(a, week_starts_on) == week_start(b, week_starts_on)
}

/// Whole days from `from` to `to`. Negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Number of week boundaries crossed going from the week of `from` to the
/// week of `to`. Negative when `to` lies in an earlier week.
pub fn weeks_between(from: NaiveDate, to: NaiveDate, week_starts_on: Weekday) -> i64 {
    days_between(
        week_start(from, week_starts_on),
        week_start(to, week_starts_on),
    )
    .div_euclid(DAYS_PER_WEEK)
}

/// Days remaining in the week of `today`, counting today itself (1..=7).
pub fn days_left_in_week(today: NaiveDate, week_starts_on: Weekday) -> u32 {
    (DAYS_PER_WEEK - offset_in_week(today, week_starts_on)) as u32
}
