//! Day normalization.
//!
//! A normalized day is the zone-local calendar date of an instant, encoded as the
//! epoch milliseconds of that date's midnight read as UTC wall time. Two instants
//! on the same local date always normalize to the same value, independent of the
//! zone's offset on that date.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

/// ## Summary
/// Truncates `instant` to the start of its calendar day in `zone`.
#[must_use]
pub fn normalize(instant: DateTime<Utc>, zone: &Tz) -> i64 {
    day_of(instant.with_timezone(zone).date_naive())
}

/// Normalized value for a calendar date.
#[must_use]
pub fn day_of(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}
