//! Recurrence fields as a caller or store hands them over.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

use crate::spec::{FieldPresence, RecurrenceField, RecurrenceSpec, RecurrenceType};

/// A recurrence field as received: `None` when the key is absent,
/// `Some(None)` when it is declared without a value (`null`).
pub type Declared<T> = Option<Option<T>>;

/// Keeps an explicit `null` apart from an absent key.
fn declared<'de, D, T>(deserializer: D) -> Result<Declared<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// ## Summary
/// Unvalidated recurrence fields plus the appointment's own start and end.
///
/// A recurrence field is declared when its key is present, even as `null`;
/// `until` and `occurrence_count` both declared as `null` mean an infinite
/// series. The occurrence duration is taken from `end - start`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawRecurrence {
    #[serde(rename = "type", default, deserialize_with = "declared")]
    pub recurrence_type: Declared<RecurrenceType>,
    #[serde(default, deserialize_with = "declared")]
    pub interval: Declared<u32>,
    #[serde(default, deserialize_with = "declared")]
    pub weekday_mask: Declared<u8>,
    #[serde(default, deserialize_with = "declared")]
    pub day_in_month: Declared<u8>,
    #[serde(default, deserialize_with = "declared")]
    pub month: Declared<u8>,
    #[serde(default, deserialize_with = "declared")]
    pub until: Declared<DateTime<Utc>>,
    #[serde(default, deserialize_with = "declared")]
    pub occurrence_count: Declared<u32>,

    /// Start of the first occurrence.
    pub start: DateTime<Utc>,
    /// End of the first occurrence; `start` when absent.
    pub end: Option<DateTime<Utc>>,
}

impl RawRecurrence {
    /// A plain appointment with no recurrence fields.
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            recurrence_type: None,
            interval: None,
            weekday_mask: None,
            day_in_month: None,
            month: None,
            until: None,
            occurrence_count: None,
            start,
            end: None,
        }
    }

    /// The fields the caller declared.
    #[must_use]
    pub fn presence(&self) -> FieldPresence {
        [
            (RecurrenceField::Type, self.recurrence_type.is_some()),
            (RecurrenceField::Interval, self.interval.is_some()),
            (RecurrenceField::WeekdayMask, self.weekday_mask.is_some()),
            (RecurrenceField::DayInMonth, self.day_in_month.is_some()),
            (RecurrenceField::Month, self.month.is_some()),
            (RecurrenceField::Until, self.until.is_some()),
            (RecurrenceField::OccurrenceCount, self.occurrence_count.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, set)| set.then_some(field))
        .collect()
    }

    /// ## Summary
    /// Builds the spec value. Missing type means a plain appointment and a
    /// missing interval becomes 0; run [`crate::validate::validate`] on `presence()`
    /// first to reject such input.
    #[must_use]
    pub fn to_spec(&self) -> RecurrenceSpec {
        RecurrenceSpec {
            recurrence_type: self.recurrence_type.flatten().unwrap_or_default(),
            interval: self.interval.flatten().unwrap_or(0),
            weekday_mask: self.weekday_mask.flatten(),
            day_in_month: self.day_in_month.flatten(),
            month: self.month.flatten(),
            until: self.until.flatten(),
            occurrence_count: self.occurrence_count.flatten(),
            recurring_start: self.start,
            duration: chrono::TimeDelta::zero(),
        }
        .with_duration(self.end.map_or_else(chrono::TimeDelta::zero, |end| end - self.start))
    }
}
