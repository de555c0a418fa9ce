//! Expansion defaults built from the loaded settings.

use almanac_core::config::Settings;
use almanac_recur::error::RecurError;
use almanac_recur::{ExpansionOptions, ZoneRegistry};

use crate::error::AppResult;

/// ## Summary
/// Resolves the configured zone and aliases into the options every request
/// starts from.
///
/// ## Errors
/// Returns `AppError::CoreError` for settings that fail their checks and
/// `AppError::RecurError` when an alias or the default zone does not resolve.
pub fn expansion_defaults(settings: &Settings) -> AppResult<ExpansionOptions> {
    settings.check()?;

    let registry = ZoneRegistry::with_aliases(&settings.zones.aliases).map_err(RecurError::from)?;
    let base = ExpansionOptions::from_config(&settings.expansion, &registry)
        .map_err(RecurError::from)?;

    tracing::debug!(
        zone = %base.zone,
        week_start = %base.week_start,
        aliases = registry.alias_count(),
        "Expansion defaults ready"
    );
    Ok(base)
}
