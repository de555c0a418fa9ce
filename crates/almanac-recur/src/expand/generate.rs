//! Occurrence generation: range expansion and single-position lookup.

use almanac_core::error::CoreError;
use chrono::{DateTime, TimeDelta, Utc};

use super::cursor::{Candidate, Cursor};
use super::options::{ExpansionError, ExpansionOptions};
use crate::normalize::normalize;
use crate::occurrence::{Occurrence, OccurrenceSet};
use crate::spec::RecurrenceSpec;
use crate::validate::{ValidationError, validate_stored};

/// Signals that a stored pattern no longer validated and was expanded as a
/// single occurrence at `recurring_start` instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid recurrence pattern replaced by a single occurrence: {cause}")]
pub struct InvalidPatternRecovered {
    pub cause: ValidationError,
}

/// Result of a range expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub occurrences: OccurrenceSet,
    /// Set when the series could not be expanded as stored.
    pub recovered: Option<InvalidPatternRecovered>,
}

impl Expansion {
    /// True when the occurrences come from the single-occurrence fallback.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        self.recovered.is_some()
    }
}

/// How a spec will be expanded.
enum Plan<'a> {
    Series(Cursor<'a>),
    Single(Option<InvalidPatternRecovered>),
}

fn plan<'a>(
    spec: &'a RecurrenceSpec,
    options: &ExpansionOptions,
) -> Result<Plan<'a>, ExpansionError> {
    if !spec.is_recurring() {
        return Ok(Plan::Single(None));
    }
    if spec.interval == 0 {
        return Err(ExpansionError::ZeroInterval);
    }
    if let Err(cause) = validate_stored(spec) {
        tracing::warn!(
            error = %cause,
            recurrence = %spec.recurrence_type,
            start = %spec.recurring_start,
            "Stored recurrence pattern is invalid, expanding as a single occurrence"
        );
        return Ok(Plan::Single(Some(InvalidPatternRecovered { cause })));
    }

    Cursor::new(spec, options.week_start)
        .map(Plan::Series)
        .ok_or_else(|| {
            ExpansionError::Invariant(CoreError::InvariantViolation(
                "validated recurrence has no expandable pattern",
            ))
        })
}

fn to_occurrence(
    spec: &RecurrenceSpec,
    candidate: Candidate,
    options: &ExpansionOptions,
) -> Occurrence {
    let end = candidate
        .start
        .checked_add_signed(spec.duration)
        .unwrap_or(DateTime::<Utc>::MAX_UTC);
    Occurrence {
        start: candidate.start,
        end,
        position: candidate.position,
        normalized_day: normalize(candidate.start, &options.zone),
    }
}

fn single(spec: &RecurrenceSpec, options: &ExpansionOptions) -> Occurrence {
    to_occurrence(
        spec,
        Candidate {
            position: 1,
            start: spec.recurring_start,
        },
        options,
    )
}

/// ## Summary
/// Expands a series into the occurrences overlapping `options.window`.
///
/// Skipped positions and days still consume their position. Generation stops
/// at the first occurrence starting at or after the window end, so the work
/// done is proportional to the occurrences in the window rather than the
/// length of the series.
///
/// A stored spec that fails validation is not an error: it expands to a
/// single occurrence at `recurring_start` and `Expansion::recovered` says why.
///
/// ## Errors
///
/// Returns an error if:
/// - The spec is recurring with an interval of 0
/// - The series has neither `until` nor `occurrence_count` and more than
///   `options.max_instances` occurrences fall into the window
#[tracing::instrument(
    skip(spec, options),
    fields(
        recurrence = %spec.recurrence_type,
        window_start = %options.window.start(),
        window_end = %options.window.end(),
    )
)]
pub fn generate(
    spec: &RecurrenceSpec,
    options: &ExpansionOptions,
) -> Result<Expansion, ExpansionError> {
    let window = options.window;
    let mut occurrences = OccurrenceSet::new();

    let mut cursor = match plan(spec, options)? {
        Plan::Single(recovered) => {
            let only = single(spec, options);
            if window.overlaps(only.start, only.end)
                && !options.is_skipped(only.position, only.normalized_day)
            {
                occurrences.append(only)?;
            }
            return Ok(Expansion {
                occurrences,
                recovered,
            });
        }
        Plan::Series(cursor) => cursor,
    };

    if let Some(target) = spec
        .duration
        .checked_add(&TimeDelta::days(1))
        .and_then(|lead| window.start().checked_sub_signed(lead))
    {
        cursor.skip_toward(target);
    }

    // Bounded series run to their natural end
    let limit = (!spec.is_bounded()).then_some(options.max_instances);

    for candidate in cursor {
        if candidate.start >= window.end() {
            break;
        }
        let occurrence = to_occurrence(spec, candidate, options);
        if !window.overlaps(occurrence.start, occurrence.end)
            || options.is_skipped(occurrence.position, occurrence.normalized_day)
        {
            continue;
        }
        if let Some(limit) = limit
            && occurrences.len() >= limit
        {
            return Err(ExpansionError::TooManyOccurrences(limit));
        }
        occurrences.append(occurrence)?;
    }

    tracing::debug!(count = occurrences.len(), "Expanded recurrence");

    Ok(Expansion {
        occurrences,
        recovered: None,
    })
}

/// ## Summary
/// Computes the occurrence at a series position, ignoring window and exceptions.
///
/// Returns `None` for position 0 and for positions past the end of the series.
/// A stored spec that fails validation only has position 1.
///
/// ## Errors
/// Returns `ExpansionError::ZeroInterval` for a recurring spec with interval 0.
#[tracing::instrument(skip(spec, options), fields(recurrence = %spec.recurrence_type))]
pub fn occurrence_at(
    spec: &RecurrenceSpec,
    position: u32,
    options: &ExpansionOptions,
) -> Result<Option<Occurrence>, ExpansionError> {
    if position == 0 {
        return Ok(None);
    }
    match plan(spec, options)? {
        Plan::Single(_) => Ok((position == 1).then(|| single(spec, options))),
        Plan::Series(mut cursor) => {
            cursor.skip_to_position(position);
            Ok(cursor
                .take_while(|c| c.position <= position)
                .find(|c| c.position == position)
                .map(|c| to_occurrence(spec, c, options)))
        }
    }
}

/// ## Summary
/// Finds the position of the occurrence starting on a normalized day.
///
/// Used to match a date exception against the series.
///
/// ## Errors
/// Returns `ExpansionError::ZeroInterval` for a recurring spec with interval 0.
pub fn position_on_day(
    spec: &RecurrenceSpec,
    day: i64,
    options: &ExpansionOptions,
) -> Result<Option<u32>, ExpansionError> {
    match plan(spec, options)? {
        Plan::Single(_) => {
            let only = single(spec, options);
            Ok((only.normalized_day == day).then_some(only.position))
        }
        Plan::Series(mut cursor) => {
            // Zone offsets never exceed a day, so two days back is safe
            if let Some(target) = DateTime::from_timestamp_millis(day)
                .and_then(|midnight| midnight.checked_sub_signed(TimeDelta::days(2)))
            {
                cursor.skip_toward(target);
            }
            for candidate in cursor {
                let candidate_day = normalize(candidate.start, &options.zone);
                if candidate_day == day {
                    return Ok(Some(candidate.position));
                }
                if candidate_day > day {
                    break;
                }
            }
            Ok(None)
        }
    }
}

/// ## Summary
/// Returns the final occurrence of a bounded series.
///
/// `None` for a series with neither `until` nor `occurrence_count`, and for a
/// bounded series that ends before its first occurrence.
///
/// ## Errors
/// Returns `ExpansionError::ZeroInterval` for a recurring spec with interval 0.
pub fn last_occurrence(
    spec: &RecurrenceSpec,
    options: &ExpansionOptions,
) -> Result<Option<Occurrence>, ExpansionError> {
    match plan(spec, options)? {
        Plan::Single(_) => Ok(Some(single(spec, options))),
        Plan::Series(_) if !spec.is_bounded() => Ok(None),
        Plan::Series(cursor) => Ok(cursor.last().map(|c| to_occurrence(spec, c, options))),
    }
}
