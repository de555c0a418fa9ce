//! Rule request files read by the `almanac` binary.
//!
//! A request is a TOML (or JSON/YAML) document:
//!
//! ```toml
//! skip_positions = [3]
//! skip_dates = ["2024-01-15"]
//!
//! [rule]
//! type = "weekly"
//! interval = 1
//! weekday_mask = 42
//! start = "2024-01-01T09:00:00Z"
//! end = "2024-01-01T09:30:00Z"
//!
//! [window]
//! start = "2024-01-01T00:00:00Z"
//! end = "2024-02-01T00:00:00Z"
//! ```

use std::path::Path;

use almanac_recur::error::{RecurError, RecurResult};
use almanac_recur::normalize::day_of;
use almanac_recur::{Expansion, ExpansionOptions, RawRecurrence, TimeRange, expand, generate};
use chrono::{DateTime, NaiveDate, Utc};
use config::{Config, File, FileFormat};
use serde::Deserialize;

use crate::error::AppResult;

/// Request file used when none is given on the command line.
pub const DEFAULT_REQUEST_FILE: &str = "rule.toml";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct WindowRequest {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// One expansion request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RuleRequest {
    pub rule: RawRecurrence,

    /// Expansion window; the whole series when absent.
    pub window: Option<WindowRequest>,

    #[serde(default)]
    pub skip_positions: Vec<u32>,

    /// Zone-local dates whose occurrences are suppressed.
    #[serde(default)]
    pub skip_dates: Vec<NaiveDate>,

    /// Treat the rule as an already stored pattern: an invalid combination
    /// degrades to a single occurrence instead of being rejected.
    #[serde(default)]
    pub stored: bool,
}

impl RuleRequest {
    /// ## Summary
    /// Reads a request file, picking the format from its extension.
    ///
    /// ## Errors
    /// Returns `AppError::RequestError` if the file is missing or malformed.
    pub fn load(path: &Path) -> AppResult<Self> {
        let request = Config::builder()
            .add_source(File::from(path))
            .build()?
            .try_deserialize::<Self>()?;

        tracing::debug!(
            path = %path.display(),
            recurrence = ?request.rule.recurrence_type.flatten(),
            stored = request.stored,
            "Loaded rule request"
        );
        Ok(request)
    }

    /// ## Summary
    /// Parses a request from an in-memory document.
    ///
    /// ## Errors
    /// Returns `AppError::RequestError` if the document is malformed.
    pub fn parse(text: &str, format: FileFormat) -> AppResult<Self> {
        Ok(Config::builder()
            .add_source(File::from_str(text, format))
            .build()?
            .try_deserialize::<Self>()?)
    }

    /// ## Summary
    /// Layers the request's window and exceptions over `base`.
    ///
    /// ## Errors
    /// Returns `ExpansionError::InvalidWindow` if the window ends before it starts.
    pub fn options(&self, base: ExpansionOptions) -> RecurResult<ExpansionOptions> {
        let window = match self.window {
            Some(window) => TimeRange::new(window.start, window.end)?,
            None => TimeRange::unbounded(),
        };
        Ok(base
            .window(window)
            .skip_positions(self.skip_positions.iter().copied())
            .skip_days(self.skip_dates.iter().copied().map(day_of)))
    }

    /// ## Summary
    /// Expands the request.
    ///
    /// Fresh rules are validated against the fields they declare; stored
    /// rules go straight to generation and may come back degraded.
    ///
    /// ## Errors
    /// Returns an error for an invalid fresh rule, an invalid window, a zero
    /// interval, or an expansion above the instance limit.
    pub fn run(&self, base: ExpansionOptions) -> AppResult<Expansion> {
        let options = self.options(base)?;
        let expansion = if self.stored {
            generate(&self.rule.to_spec(), &options).map_err(RecurError::from)?
        } else {
            expand(&self.rule, &options)?
        };

        if let Some(recovered) = &expansion.recovered {
            tracing::warn!(cause = %recovered.cause, "Rule was expanded as a single occurrence");
        }
        Ok(expansion)
    }
}
