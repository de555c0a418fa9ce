//! Zone identifier resolution.
//!
//! Uses ICU4X for Windows timezone ID to IANA mapping and alias canonicalization.
//! A `ZoneRegistry` is built once (usually from configuration) and shared by
//! reference; it never changes after construction.

use std::collections::HashMap;
use std::str::FromStr;

use chrono_tz::Tz;
use icu::time::zone::WindowsParser;
use icu::time::zone::iana::IanaParserExtended;

/// Error while resolving a zone identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ZoneError {
    /// Unknown or invalid zone identifier.
    #[error("Unknown zone: {0}")]
    UnknownZone(String),
}

/// Immutable lookup from caller zone identifiers to `chrono_tz::Tz`.
#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    /// Configured aliases keyed in lowercase, already resolved.
    aliases: HashMap<String, Tz>,
}

impl ZoneRegistry {
    /// Creates a registry with no aliases.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// ## Summary
    /// Creates a registry from `alias -> zone id` pairs.
    ///
    /// Alias targets are resolved eagerly so a bad configuration fails at startup
    /// instead of on the first lookup.
    ///
    /// ## Errors
    /// Returns `ZoneError::UnknownZone` if any alias target cannot be resolved.
    pub fn with_aliases<'a, I>(aliases: I) -> Result<Self, ZoneError>
    where
        I: IntoIterator<Item = (&'a String, &'a String)>,
    {
        let mut resolved = HashMap::new();
        for (alias, target) in aliases {
            let tz = resolve_canonical(target)?;
            tracing::trace!(%alias, zone = %tz, "Registered zone alias");
            resolved.insert(alias.to_ascii_lowercase(), tz);
        }
        Ok(Self { aliases: resolved })
    }

    /// ## Summary
    /// Resolves a zone identifier to a `chrono_tz::Tz`.
    ///
    /// Configured aliases win and match case-insensitively; otherwise the
    /// identifier is normalized (vendor prefixes, Windows names, IANA aliases)
    /// and parsed as an IANA name.
    ///
    /// ## Errors
    /// Returns `ZoneError::UnknownZone` if the identifier cannot be resolved.
    pub fn resolve(&self, zone_id: &str) -> Result<Tz, ZoneError> {
        if let Some(tz) = self.aliases.get(&zone_id.to_ascii_lowercase()) {
            return Ok(*tz);
        }
        resolve_canonical(zone_id)
    }

    /// Number of configured aliases.
    #[must_use]
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }
}

fn resolve_canonical(zone_id: &str) -> Result<Tz, ZoneError> {
    let normalized = normalize_zone_id(zone_id);
    Tz::from_str(&normalized).map_err(|_e| ZoneError::UnknownZone(zone_id.to_string()))
}

/// Normalizes common calendar-client zone identifiers to IANA names.
fn normalize_zone_id(zone_id: &str) -> String {
    let stripped = zone_id
        .strip_prefix("/mozilla.org/")
        .or_else(|| zone_id.strip_prefix("/softwarestudio.org/"))
        .unwrap_or(zone_id);

    let windows_parser = WindowsParser::new();
    if let Some(tz) = windows_parser.parse(stripped, None) {
        let iana_parser = IanaParserExtended::new();
        for entry in iana_parser.iter() {
            if entry.time_zone == tz {
                return entry.canonical.to_string();
            }
        }
    }

    // Canonicalizes aliases like Europe/Kiev -> Europe/Kyiv
    let iana_parser = IanaParserExtended::new();
    let parsed = iana_parser.parse(stripped);
    if parsed.time_zone != icu::time::TimeZone::UNKNOWN {
        return parsed.canonical.to_string();
    }

    stripped.to_string()
}
