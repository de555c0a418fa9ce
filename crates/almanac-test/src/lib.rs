//! Almanac recurrence engine - integration test support.
//!
//! Re-exports the workspace crates under one path and provides small
//! fixtures shared by the integration tests.

pub mod component {
    pub use almanac_recur::*;

    pub mod settings {
        pub use almanac_core::config::*;
        pub use almanac_core::types::WeekStart;
    }

    pub mod request {
        pub use almanac_app::output::write_json_lines;
        pub use almanac_app::request::*;
    }
}

pub mod fixtures {
    use almanac_recur::{ExpansionOptions, OccurrenceSet, TimeRange};
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};

    /// UTC instant from calendar fields; `None` for an impossible date.
    #[must_use]
    pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).single()
    }

    /// Options for the window `[from, to)`; `None` if the window is reversed.
    #[must_use]
    pub fn between(from: DateTime<Utc>, to: DateTime<Utc>) -> Option<ExpansionOptions> {
        TimeRange::new(from, to).ok().map(ExpansionOptions::with_window)
    }

    /// Start dates of a set, in position order.
    #[must_use]
    pub fn start_dates(set: &OccurrenceSet) -> Vec<NaiveDate> {
        set.iter().map(|o| o.start.date_naive()).collect()
    }

    /// Start instants of a set as unix seconds.
    #[must_use]
    pub fn start_timestamps(set: &OccurrenceSet) -> Vec<i64> {
        set.iter().map(|o| o.start.timestamp()).collect()
    }
}
