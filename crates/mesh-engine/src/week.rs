//! Anchoring the abstract grid week onto a concrete calendar week.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// The Monday on or before `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The Monday on or after `today`, shifted by `offset_weeks` whole weeks.
///
/// With `offset_weeks == 0` a Monday returns itself, any other day returns the
/// following Monday.
pub fn upcoming_monday(today: NaiveDate, offset_weeks: i64) -> NaiveDate {
    let days_ahead = (7 - i64::from(today.weekday().num_days_from_monday())) % 7;
    today + Duration::days(days_ahead + 7 * offset_weeks)
}

/// Calendar date of `day` in the week starting at `week_monday`.
pub fn date_in_week(week_monday: NaiveDate, day: Weekday) -> NaiveDate {
    week_monday + Duration::days(i64::from(day.num_days_from_monday()))
}
