//! Calendar arithmetic used by the occurrence cursor.

use almanac_core::types::WeekStart;
use chrono::{Datelike, NaiveDate, TimeDelta};

use crate::weekday;

/// Months since year 0, so consecutive months differ by one.
#[must_use]
pub fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

/// Inverse of [`month_index`]: `(year, month)` with month in `1..=12`.
#[must_use]
pub fn year_month(index: i64) -> Option<(i32, u32)> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = u32::try_from(index.rem_euclid(12)).ok()? + 1;
    Some((year, month))
}

#[must_use]
pub fn days_in_month(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year.checked_add(1)?, 1, 1)?
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)?
    };
    u32::try_from(next.signed_duration_since(first).num_days()).ok()
}

/// ## Summary
/// Day `day` of the month, clamped to the month's last day.
///
/// The 31st in April is April 30th, never May 1st.
#[must_use]
pub fn clamped_day(year: i32, month: u32, day: u8) -> Option<NaiveDate> {
    let last = days_in_month(year, month)?;
    NaiveDate::from_ymd_opt(year, month, u32::from(day).clamp(1, last))
}

/// ## Summary
/// The `nth` day of the month whose weekday is set in `mask`.
///
/// `nth` runs from 1 to 5; 5 selects the last matching day. Any non-empty mask
/// matches at least four days in every month, so 1..=4 always exist and a
/// missing fifth match falls back to the last one.
#[must_use]
pub fn nth_matching_day(year: i32, month: u32, mask: u8, nth: u8) -> Option<NaiveDate> {
    let last = days_in_month(year, month)?;
    let matching: Vec<NaiveDate> = (1..=last)
        .filter_map(|day| NaiveDate::from_ymd_opt(year, month, day))
        .filter(|date| weekday::contains(mask, date.weekday()))
        .collect();

    let index = if nth >= 5 {
        matching.len().checked_sub(1)?
    } else {
        usize::from(nth.max(1)) - 1
    };
    matching.get(index).or(matching.last()).copied()
}

/// First day of the week containing `date`.
#[must_use]
pub fn week_begin(date: NaiveDate, week_start: WeekStart) -> NaiveDate {
    let offset = match week_start {
        WeekStart::Monday => date.weekday().num_days_from_monday(),
        WeekStart::Sunday => date.weekday().num_days_from_sunday(),
    };
    date - TimeDelta::days(i64::from(offset))
}
