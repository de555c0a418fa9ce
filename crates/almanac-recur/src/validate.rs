//! ## Summary
//! Recurrence rule validation.
//!
//! Checks that the declared fields of a rule form a legal combination for its
//! recurrence type before the rule is stored or expanded. Validation is
//! all-or-nothing and never corrects input.

use crate::spec::{FieldPresence, RecurrenceField, RecurrenceSpec, RecurrenceType};
use crate::weekday;

const MONTH_DAYS: std::ops::RangeInclusive<u8> = 1..=31;
const NTH_WEEKDAYS: std::ops::RangeInclusive<u8> = 1..=5;
const MONTHS: std::ops::RangeInclusive<u8> = 1..=12;

/// A rule whose fields do not fit together.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Recurrence type is missing although other recurrence fields are set")]
    IncompleteRecurrenceType,

    #[error("Missing interval for {recurrence} recurrence")]
    IncompleteRecurrenceInterval { recurrence: RecurrenceType },

    #[error("Missing {field} for {recurrence} recurrence")]
    IncompleteRecurrenceField {
        field: RecurrenceField,
        recurrence: RecurrenceType,
    },

    #[error("Both until and occurrence_count are set for {recurrence} recurrence")]
    RedundantUntilAndOccurrenceCount { recurrence: RecurrenceType },

    #[error("Unnecessary {field} for {recurrence} recurrence")]
    UnnecessaryRecurrenceInformation {
        field: RecurrenceField,
        recurrence: RecurrenceType,
    },

    #[error("Invalid weekday mask {value} for {recurrence} recurrence, expected 1..=127")]
    InvalidWeekdayMask { value: u8, recurrence: RecurrenceType },

    #[error("Invalid day in month {value} for {recurrence} recurrence, expected 1..=31")]
    InvalidMonthDay { value: u8, recurrence: RecurrenceType },

    #[error("Invalid weekday occurrence {value} for {recurrence} recurrence, expected 1..=5")]
    InvalidNthWeekday { value: u8, recurrence: RecurrenceType },

    #[error("Invalid month {value} for {recurrence} recurrence, expected 1..=12")]
    InvalidMonth { value: u8, recurrence: RecurrenceType },
}

impl ValidationError {
    /// The field the error is about.
    #[must_use]
    pub const fn field(&self) -> RecurrenceField {
        match self {
            Self::IncompleteRecurrenceType => RecurrenceField::Type,
            Self::IncompleteRecurrenceInterval { .. } => RecurrenceField::Interval,
            Self::IncompleteRecurrenceField { field, .. }
            | Self::UnnecessaryRecurrenceInformation { field, .. } => *field,
            Self::RedundantUntilAndOccurrenceCount { .. } => RecurrenceField::OccurrenceCount,
            Self::InvalidWeekdayMask { .. } => RecurrenceField::WeekdayMask,
            Self::InvalidMonthDay { .. } | Self::InvalidNthWeekday { .. } => {
                RecurrenceField::DayInMonth
            }
            Self::InvalidMonth { .. } => RecurrenceField::Month,
        }
    }

    /// The recurrence type being validated, if one was declared.
    #[must_use]
    pub const fn recurrence(&self) -> Option<RecurrenceType> {
        match self {
            Self::IncompleteRecurrenceType => None,
            Self::IncompleteRecurrenceInterval { recurrence }
            | Self::IncompleteRecurrenceField { recurrence, .. }
            | Self::RedundantUntilAndOccurrenceCount { recurrence }
            | Self::UnnecessaryRecurrenceInformation { recurrence, .. }
            | Self::InvalidWeekdayMask { recurrence, .. }
            | Self::InvalidMonthDay { recurrence, .. }
            | Self::InvalidNthWeekday { recurrence, .. }
            | Self::InvalidMonth { recurrence, .. } => Some(*recurrence),
        }
    }
}

/// ## Summary
/// Validates a rule against the set of fields the caller declared.
///
/// A rule with no declared fields is a plain appointment and always passes.
/// A declared field holding no value counts as declared with value 0, so it
/// fails the range checks instead of being treated as missing.
///
/// ## Errors
/// Returns the first `ValidationError` found, checking in this order: type,
/// interval, until/count exclusivity, then the per-type field rules.
#[tracing::instrument(level = "trace", skip(spec), fields(recurrence = %spec.recurrence_type))]
pub fn validate(presence: FieldPresence, spec: &RecurrenceSpec) -> Result<(), ValidationError> {
    if presence.is_empty() {
        return Ok(());
    }
    if !presence.contains(RecurrenceField::Type) {
        return Err(ValidationError::IncompleteRecurrenceType);
    }

    let recurrence = spec.recurrence_type;
    let rule = Rule {
        presence,
        spec,
        recurrence,
    };

    if recurrence == RecurrenceType::None {
        if let Some(field) = presence.iter().find(|f| *f != RecurrenceField::Type) {
            return Err(ValidationError::UnnecessaryRecurrenceInformation { field, recurrence });
        }
        return Ok(());
    }

    if !presence.contains(RecurrenceField::Interval) {
        return Err(ValidationError::IncompleteRecurrenceInterval { recurrence });
    }
    if presence.contains(RecurrenceField::Until)
        && presence.contains(RecurrenceField::OccurrenceCount)
        && spec.until.is_some()
        && spec.occurrence_count.is_some()
    {
        return Err(ValidationError::RedundantUntilAndOccurrenceCount { recurrence });
    }

    match recurrence {
        RecurrenceType::None => Ok(()),
        RecurrenceType::Daily => rule.absent(&[
            RecurrenceField::WeekdayMask,
            RecurrenceField::DayInMonth,
            RecurrenceField::Month,
        ]),
        RecurrenceType::Weekly => {
            rule.absent(&[RecurrenceField::DayInMonth, RecurrenceField::Month])?;
            let mask = rule.required(RecurrenceField::WeekdayMask, spec.weekday_mask)?;
            rule.check_weekday_mask(mask)
        }
        RecurrenceType::Monthly => {
            rule.absent(&[RecurrenceField::Month])?;
            rule.check_day_pattern()
        }
        RecurrenceType::Yearly => {
            let month = rule.required(RecurrenceField::Month, spec.month)?;
            if !MONTHS.contains(&month) {
                return Err(ValidationError::InvalidMonth {
                    value: month,
                    recurrence,
                });
            }
            rule.check_day_pattern()
        }
    }
}

/// ## Summary
/// Re-validates a stored spec, deriving the declared fields from its values.
///
/// ## Errors
/// Same as [`validate`].
pub fn validate_stored(spec: &RecurrenceSpec) -> Result<(), ValidationError> {
    validate(FieldPresence::of(spec), spec)
}

struct Rule<'a> {
    presence: FieldPresence,
    spec: &'a RecurrenceSpec,
    recurrence: RecurrenceType,
}

impl Rule<'_> {
    fn absent(&self, fields: &[RecurrenceField]) -> Result<(), ValidationError> {
        match fields.iter().find(|f| self.presence.contains(**f)) {
            Some(field) => Err(ValidationError::UnnecessaryRecurrenceInformation {
                field: *field,
                recurrence: self.recurrence,
            }),
            None => Ok(()),
        }
    }

    fn required(&self, field: RecurrenceField, value: Option<u8>) -> Result<u8, ValidationError> {
        if self.presence.contains(field) {
            Ok(value.unwrap_or(0))
        } else {
            Err(ValidationError::IncompleteRecurrenceField {
                field,
                recurrence: self.recurrence,
            })
        }
    }

    fn check_weekday_mask(&self, mask: u8) -> Result<(), ValidationError> {
        if weekday::is_valid(mask) {
            Ok(())
        } else {
            Err(ValidationError::InvalidWeekdayMask {
                value: mask,
                recurrence: self.recurrence,
            })
        }
    }

    /// Day-in-month rules shared by monthly and yearly: either a plain day of
    /// month, or the Nth day matching a weekday mask.
    fn check_day_pattern(&self) -> Result<(), ValidationError> {
        let day = self.required(RecurrenceField::DayInMonth, self.spec.day_in_month)?;

        if self.presence.contains(RecurrenceField::WeekdayMask) {
            self.check_weekday_mask(self.spec.weekday_mask.unwrap_or(0))?;
            if !NTH_WEEKDAYS.contains(&day) {
                return Err(ValidationError::InvalidNthWeekday {
                    value: day,
                    recurrence: self.recurrence,
                });
            }
        } else if !MONTH_DAYS.contains(&day) {
            return Err(ValidationError::InvalidMonthDay {
                value: day,
                recurrence: self.recurrence,
            });
        }
        Ok(())
    }
}
