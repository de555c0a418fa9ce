//! Recurrence expansion into concrete occurrences.

pub mod calendar;
pub mod cursor;
pub mod generate;
pub mod options;

pub use generate::{
    Expansion, InvalidPatternRecovered, generate, last_occurrence, occurrence_at, position_on_day,
};
pub use options::{ExpansionError, ExpansionOptions, TimeRange};

use crate::error::RecurResult;
use crate::raw::RawRecurrence;
use crate::validate::validate;

/// ## Summary
/// Validates raw caller input, then expands it.
///
/// Unlike [`generate`] on a stored spec, malformed input is rejected here
/// instead of being degraded to a single occurrence.
///
/// ## Errors
/// Returns `RecurError::Validation` for an illegal field combination and
/// `RecurError::Expansion` for caller-contract violations.
pub fn expand(raw: &RawRecurrence, options: &ExpansionOptions) -> RecurResult<Expansion> {
    let spec = raw.to_spec();
    validate(raw.presence(), &spec)?;
    Ok(generate(&spec, options)?)
}
