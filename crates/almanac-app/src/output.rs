//! JSON-lines rendering of occurrences.

use std::io::Write;

use almanac_recur::OccurrenceSet;

use crate::error::AppResult;

/// ## Summary
/// Writes one JSON object per occurrence, each on its own line.
///
/// ## Errors
/// Returns an error if encoding or writing fails.
pub fn write_json_lines<W: Write>(out: &mut W, occurrences: &OccurrenceSet) -> AppResult<usize> {
    for occurrence in occurrences {
        serde_json::to_writer(&mut *out, occurrence)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(occurrences.len())
}
