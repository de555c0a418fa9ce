//! Expansion inputs: the window, exception lists and engine settings.

use std::collections::BTreeSet;

use almanac_core::config::ExpansionConfig;
use almanac_core::constants::DEFAULT_MAX_INSTANCES;
use almanac_core::error::CoreError;
use almanac_core::types::WeekStart;
use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::zone::{ZoneError, ZoneRegistry};

/// Caller-contract violations raised before any occurrence is generated.
#[derive(Debug, thiserror::Error)]
pub enum ExpansionError {
    /// Window ends before it starts.
    #[error("Invalid window: end {end} is before start {start}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    /// A series with interval 0 never advances.
    #[error("Recurrence interval must be at least 1")]
    ZeroInterval,

    /// Expansion exceeded the configured maximum.
    #[error("Expansion exceeded maximum limit of {0} occurrences")]
    TooManyOccurrences(usize),

    #[error(transparent)]
    Invariant(#[from] CoreError),
}

/// Half-open instant range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    /// ## Summary
    /// Creates a window.
    ///
    /// ## Errors
    /// Returns `ExpansionError::InvalidWindow` if `end < start`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ExpansionError> {
        if end < start {
            return Err(ExpansionError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// The widest representable window.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: DateTime::<Utc>::MIN_UTC,
            end: DateTime::<Utc>::MAX_UTC,
        }
    }

    #[must_use]
    pub const fn start(&self) -> DateTime<Utc> {
        self.start
    }

    #[must_use]
    pub const fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// ## Summary
    /// True if an occurrence `[start, end)` should be reported for this window.
    ///
    /// Occurrences that began before the window but are still running count,
    /// as do zero-length occurrences exactly at the window start.
    #[must_use]
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.end && (start >= self.start || end > self.start)
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::unbounded()
    }
}

/// Options for a single expansion call.
#[derive(Debug, Clone)]
pub struct ExpansionOptions {
    pub window: TimeRange,

    /// Positions already materialized elsewhere (changed or deleted occurrences).
    pub skip_positions: BTreeSet<u32>,

    /// Normalized days to suppress, see [`crate::normalize`].
    pub skip_days: BTreeSet<i64>,

    /// Zone used for day normalization.
    pub zone: Tz,

    pub week_start: WeekStart,

    /// Maximum number of occurrences to emit.
    pub max_instances: usize,
}

impl Default for ExpansionOptions {
    fn default() -> Self {
        Self {
            window: TimeRange::unbounded(),
            skip_positions: BTreeSet::new(),
            skip_days: BTreeSet::new(),
            zone: Tz::UTC,
            week_start: WeekStart::default(),
            max_instances: usize::try_from(DEFAULT_MAX_INSTANCES).unwrap_or(usize::MAX),
        }
    }
}

impl ExpansionOptions {
    /// Creates expansion options for a window.
    #[must_use]
    pub fn with_window(window: TimeRange) -> Self {
        Self {
            window,
            ..Self::default()
        }
    }

    /// ## Summary
    /// Builds options from configuration, resolving the zone through `registry`.
    ///
    /// ## Errors
    /// Returns `ZoneError::UnknownZone` if the configured zone cannot be resolved.
    pub fn from_config(
        config: &ExpansionConfig,
        registry: &ZoneRegistry,
    ) -> Result<Self, ZoneError> {
        Ok(Self {
            zone: registry.resolve(&config.zone)?,
            week_start: config.week_start,
            max_instances: usize::try_from(config.max_instances).unwrap_or(usize::MAX),
            ..Self::default()
        })
    }

    /// Replaces the window.
    #[must_use]
    pub fn window(mut self, window: TimeRange) -> Self {
        self.window = window;
        self
    }

    /// Sets positions to suppress.
    #[must_use]
    pub fn skip_positions<I: IntoIterator<Item = u32>>(mut self, positions: I) -> Self {
        self.skip_positions = positions.into_iter().collect();
        self
    }

    /// Sets normalized days to suppress.
    #[must_use]
    pub fn skip_days<I: IntoIterator<Item = i64>>(mut self, days: I) -> Self {
        self.skip_days = days.into_iter().collect();
        self
    }

    #[must_use]
    pub fn zone(mut self, zone: Tz) -> Self {
        self.zone = zone;
        self
    }

    #[must_use]
    pub fn week_start(mut self, week_start: WeekStart) -> Self {
        self.week_start = week_start;
        self
    }

    /// Sets the maximum number of instances.
    #[must_use]
    pub fn max_instances(mut self, max: usize) -> Self {
        self.max_instances = max;
        self
    }

    /// True if the position or day was excluded by the caller.
    #[must_use]
    pub fn is_skipped(&self, position: u32, normalized_day: i64) -> bool {
        self.skip_positions.contains(&position) || self.skip_days.contains(&normalized_day)
    }
}
