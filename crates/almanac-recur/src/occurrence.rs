//! Generated occurrences and the ordered set that holds them.

use almanac_core::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One concrete instance of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Occurrence {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// 1-based ordinal within the series.
    pub position: u32,
    /// Zone-local midnight of `start`, see [`crate::normalize`].
    pub normalized_day: i64,
}

/// ## Summary
/// Build-once, read-many sequence of occurrences in position order.
///
/// Positions are strictly increasing but may have gaps where exceptions were
/// suppressed, so position lookup tries the direct index first and falls back
/// to a search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct OccurrenceSet {
    entries: Vec<Occurrence>,
}

impl OccurrenceSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Appends an occurrence after the current last one.
    ///
    /// ## Errors
    /// Returns `CoreError::InvariantViolation` if the position does not exceed
    /// the last appended position.
    pub fn append(&mut self, occurrence: Occurrence) -> CoreResult<()> {
        if let Some(last) = self.entries.last()
            && occurrence.position <= last.position
        {
            return Err(CoreError::InvariantViolation(
                "occurrence positions must be strictly increasing",
            ));
        }
        self.entries.push(occurrence);
        Ok(())
    }

    /// ## Summary
    /// Looks up an occurrence by series position.
    ///
    /// O(1) when nothing before `position` was skipped; otherwise a binary
    /// search over the ordered positions.
    #[must_use]
    pub fn by_position(&self, position: u32) -> Option<&Occurrence> {
        let direct = usize::try_from(position)
            .ok()
            .and_then(|p| p.checked_sub(1))
            .and_then(|index| self.entries.get(index));
        if let Some(occurrence) = direct
            && occurrence.position == position
        {
            return Some(occurrence);
        }

        self.entries
            .binary_search_by_key(&position, |o| o.position)
            .ok()
            .map(|index| &self.entries[index])
    }

    /// Looks up the first occurrence on a normalized day.
    #[must_use]
    pub fn by_normalized_day(&self, day: i64) -> Option<&Occurrence> {
        self.entries.iter().find(|o| o.normalized_day == day)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&Occurrence> {
        self.entries.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Occurrence> {
        self.entries.last()
    }

    /// Iterates in position order. Each call starts from the beginning.
    pub fn iter(&self) -> std::slice::Iter<'_, Occurrence> {
        self.entries.iter()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Occurrence] {
        &self.entries
    }

    /// Positions of all held occurrences, in order.
    #[must_use]
    pub fn positions(&self) -> Vec<u32> {
        self.entries.iter().map(|o| o.position).collect()
    }
}

impl<'a> IntoIterator for &'a OccurrenceSet {
    type Item = &'a Occurrence;
    type IntoIter = std::slice::Iter<'a, Occurrence>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl IntoIterator for OccurrenceSet {
    type Item = Occurrence;
    type IntoIter = std::vec::IntoIter<Occurrence>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
