//! Recurrence specification value types.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// How a series repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceType {
    /// Not a series; a single appointment.
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl RecurrenceType {
    /// Returns the label used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl fmt::Display for RecurrenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recurrence field a caller may or may not have set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecurrenceField {
    Type,
    Interval,
    WeekdayMask,
    DayInMonth,
    Month,
    Until,
    OccurrenceCount,
}

impl RecurrenceField {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Type => "type",
            Self::Interval => "interval",
            Self::WeekdayMask => "weekday_mask",
            Self::DayInMonth => "day_in_month",
            Self::Month => "month",
            Self::Until => "until",
            Self::OccurrenceCount => "occurrence_count",
        }
    }

    /// All fields in declaration order.
    #[must_use]
    pub const fn all() -> [Self; 7] {
        [
            Self::Type,
            Self::Interval,
            Self::WeekdayMask,
            Self::DayInMonth,
            Self::Month,
            Self::Until,
            Self::OccurrenceCount,
        ]
    }

    const fn flag(self) -> u8 {
        match self {
            Self::Type => 1,
            Self::Interval => 1 << 1,
            Self::WeekdayMask => 1 << 2,
            Self::DayInMonth => 1 << 3,
            Self::Month => 1 << 4,
            Self::Until => 1 << 5,
            Self::OccurrenceCount => 1 << 6,
        }
    }
}

impl fmt::Display for RecurrenceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ## Summary
/// The set of recurrence fields a caller explicitly declared.
///
/// Keeps "not set" apart from "set to a default value", which the validator
/// needs to tell a plain appointment from a half-specified series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldPresence(u8);

impl FieldPresence {
    /// No field declared.
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Adds a field to the set.
    pub fn insert(&mut self, field: RecurrenceField) {
        self.0 |= field.flag();
    }

    /// Returns the set with `field` added.
    #[must_use]
    pub const fn with(self, field: RecurrenceField) -> Self {
        Self(self.0 | field.flag())
    }

    #[must_use]
    pub const fn contains(self, field: RecurrenceField) -> bool {
        self.0 & field.flag() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when any field other than the type was declared.
    #[must_use]
    pub const fn has_details(self) -> bool {
        self.0 & !RecurrenceField::Type.flag() != 0
    }

    /// Iterates the declared fields in declaration order.
    pub fn iter(self) -> impl Iterator<Item = RecurrenceField> {
        RecurrenceField::all()
            .into_iter()
            .filter(move |field| self.contains(*field))
    }

    /// ## Summary
    /// Derives the declared set from a stored spec.
    ///
    /// The type is always declared, the interval whenever the spec is a series,
    /// and every optional field exactly when it holds a value. Used to re-check
    /// persisted specs before expansion.
    #[must_use]
    pub fn of(spec: &RecurrenceSpec) -> Self {
        let mut presence = Self::empty().with(RecurrenceField::Type);
        if spec.recurrence_type != RecurrenceType::None {
            presence.insert(RecurrenceField::Interval);
        }
        if spec.weekday_mask.is_some() {
            presence.insert(RecurrenceField::WeekdayMask);
        }
        if spec.day_in_month.is_some() {
            presence.insert(RecurrenceField::DayInMonth);
        }
        if spec.month.is_some() {
            presence.insert(RecurrenceField::Month);
        }
        if spec.until.is_some() {
            presence.insert(RecurrenceField::Until);
        }
        if spec.occurrence_count.is_some() {
            presence.insert(RecurrenceField::OccurrenceCount);
        }
        presence
    }
}

impl FromIterator<RecurrenceField> for FieldPresence {
    fn from_iter<T: IntoIterator<Item = RecurrenceField>>(iter: T) -> Self {
        iter.into_iter().fold(Self::empty(), Self::with)
    }
}

/// ## Summary
/// Declarative rule describing how a single event repeats.
///
/// Built once and treated as immutable afterwards; the `with_*` methods consume
/// the value and return a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecurrenceSpec {
    pub recurrence_type: RecurrenceType,

    /// Repeat every N days/weeks/months/years.
    pub interval: u32,

    /// Weekday bitmask, see [`crate::weekday`].
    pub weekday_mask: Option<u8>,

    /// Day of month (1..=31), or which weekday occurrence (1..=5, 5 = last)
    /// when a weekday mask is also set.
    pub day_in_month: Option<u8>,

    /// Month of year (1..=12), yearly rules only.
    pub month: Option<u8>,

    /// Inclusive upper bound for occurrence starts.
    pub until: Option<DateTime<Utc>>,

    /// Total number of occurrences in the series.
    pub occurrence_count: Option<u32>,

    /// Start of the occurrence at position 1.
    pub recurring_start: DateTime<Utc>,

    /// Length of every occurrence.
    pub duration: TimeDelta,
}

impl RecurrenceSpec {
    fn base(
        recurrence_type: RecurrenceType,
        recurring_start: DateTime<Utc>,
        interval: u32,
    ) -> Self {
        Self {
            recurrence_type,
            interval,
            weekday_mask: None,
            day_in_month: None,
            month: None,
            until: None,
            occurrence_count: None,
            recurring_start,
            duration: TimeDelta::zero(),
        }
    }

    /// A non-recurring appointment.
    #[must_use]
    pub fn single(start: DateTime<Utc>) -> Self {
        Self::base(RecurrenceType::None, start, 0)
    }

    /// Every `interval` days.
    #[must_use]
    pub fn daily(start: DateTime<Utc>, interval: u32) -> Self {
        Self::base(RecurrenceType::Daily, start, interval)
    }

    /// The days in `weekday_mask`, every `interval` weeks.
    #[must_use]
    pub fn weekly(start: DateTime<Utc>, interval: u32, weekday_mask: u8) -> Self {
        Self {
            weekday_mask: Some(weekday_mask),
            ..Self::base(RecurrenceType::Weekly, start, interval)
        }
    }

    /// Day `day` of every `interval` months.
    #[must_use]
    pub fn monthly(start: DateTime<Utc>, interval: u32, day: u8) -> Self {
        Self {
            day_in_month: Some(day),
            ..Self::base(RecurrenceType::Monthly, start, interval)
        }
    }

    /// The `nth` (5 = last) day matching `weekday_mask`, every `interval` months.
    #[must_use]
    pub fn monthly_nth(start: DateTime<Utc>, interval: u32, weekday_mask: u8, nth: u8) -> Self {
        Self {
            weekday_mask: Some(weekday_mask),
            day_in_month: Some(nth),
            ..Self::base(RecurrenceType::Monthly, start, interval)
        }
    }

    /// Day `day` of `month`, every `interval` years.
    #[must_use]
    pub fn yearly(start: DateTime<Utc>, interval: u32, month: u8, day: u8) -> Self {
        Self {
            month: Some(month),
            day_in_month: Some(day),
            ..Self::base(RecurrenceType::Yearly, start, interval)
        }
    }

    /// The `nth` (5 = last) day matching `weekday_mask` in `month`, every `interval` years.
    #[must_use]
    pub fn yearly_nth(
        start: DateTime<Utc>,
        interval: u32,
        month: u8,
        weekday_mask: u8,
        nth: u8,
    ) -> Self {
        Self {
            month: Some(month),
            weekday_mask: Some(weekday_mask),
            day_in_month: Some(nth),
            ..Self::base(RecurrenceType::Yearly, start, interval)
        }
    }

    /// Ends the series after the last occurrence starting at or before `until`.
    #[must_use]
    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    /// Ends the series after `count` occurrences.
    #[must_use]
    pub fn with_count(mut self, count: u32) -> Self {
        self.occurrence_count = Some(count);
        self
    }

    /// Sets the length of every occurrence. Negative durations are clamped to zero.
    #[must_use]
    pub fn with_duration(mut self, duration: TimeDelta) -> Self {
        self.duration = duration.max(TimeDelta::zero());
        self
    }

    #[must_use]
    pub fn is_recurring(&self) -> bool {
        self.recurrence_type != RecurrenceType::None
    }

    /// True when the series has an end (count or until).
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.until.is_some() || self.occurrence_count.is_some()
    }

    /// True for the "Nth weekday" form of monthly and yearly rules.
    #[must_use]
    pub fn is_nth_weekday_form(&self) -> bool {
        matches!(
            self.recurrence_type,
            RecurrenceType::Monthly | RecurrenceType::Yearly
        ) && self.weekday_mask.is_some()
    }
}
