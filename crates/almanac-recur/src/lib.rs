//! Recurrence rule validation and occurrence generation.
//!
//! A caller builds a [`RecurrenceSpec`] (or a [`RawRecurrence`] straight from
//! stored fields), checks it with [`validate`], and expands it over a window
//! with [`generate`] into an [`OccurrenceSet`]. Everything here is synchronous
//! and free of shared state, so calls may run concurrently.

pub mod error;
pub mod expand;
pub mod normalize;
pub mod occurrence;
pub mod raw;
pub mod spec;
pub mod validate;
pub mod weekday;
pub mod zone;

pub use expand::{
    Expansion, ExpansionError, ExpansionOptions, InvalidPatternRecovered, TimeRange, expand,
    generate, last_occurrence, occurrence_at, position_on_day,
};
pub use normalize::normalize;
pub use occurrence::{Occurrence, OccurrenceSet};
pub use raw::{Declared, RawRecurrence};
pub use spec::{FieldPresence, RecurrenceField, RecurrenceSpec, RecurrenceType};
pub use validate::{ValidationError, validate, validate_stored};
pub use zone::{ZoneError, ZoneRegistry};
