//! Weekday bitmask used by weekly rules and the Nth-weekday monthly/yearly form.
//!
//! One bit per day, Sunday in the lowest bit. Valid masks lie in `1..=127`.

use chrono::Weekday;

pub const SUNDAY: u8 = 1;
pub const MONDAY: u8 = 1 << 1;
pub const TUESDAY: u8 = 1 << 2;
pub const WEDNESDAY: u8 = 1 << 3;
pub const THURSDAY: u8 = 1 << 4;
pub const FRIDAY: u8 = 1 << 5;
pub const SATURDAY: u8 = 1 << 6;

/// Monday through Friday.
pub const WEEKDAYS: u8 = MONDAY | TUESDAY | WEDNESDAY | THURSDAY | FRIDAY;
pub const WEEKEND: u8 = SATURDAY | SUNDAY;
pub const ALL: u8 = WEEKDAYS | WEEKEND;

/// Returns the mask bit for a weekday.
#[must_use]
pub const fn bit(weekday: Weekday) -> u8 {
    match weekday {
        Weekday::Sun => SUNDAY,
        Weekday::Mon => MONDAY,
        Weekday::Tue => TUESDAY,
        Weekday::Wed => WEDNESDAY,
        Weekday::Thu => THURSDAY,
        Weekday::Fri => FRIDAY,
        Weekday::Sat => SATURDAY,
    }
}

/// Returns true if `weekday` is set in `mask`.
#[must_use]
pub const fn contains(mask: u8, weekday: Weekday) -> bool {
    mask & bit(weekday) != 0
}

/// Returns true if the mask names at least one day and no bit above Saturday.
#[must_use]
pub const fn is_valid(mask: u8) -> bool {
    mask >= 1 && mask <= ALL
}

/// ## Summary
/// Lists the weekdays set in `mask`, Sunday first.
#[must_use]
pub fn days(mask: u8) -> Vec<Weekday> {
    [
        Weekday::Sun,
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
    ]
    .into_iter()
    .filter(|day| contains(mask, *day))
    .collect()
}
