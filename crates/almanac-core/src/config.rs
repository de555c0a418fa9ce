use std::collections::HashMap;

use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, FileFormat};
use serde::Deserialize;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_LOG_LEVEL, DEFAULT_MAX_INSTANCES, DEFAULT_ZONE, ENV_PREFIX,
    ENV_SEPARATOR,
};
use crate::error::{CoreError, CoreResult};
use crate::types::WeekStart;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub logging: LoggingConfig,
    pub expansion: ExpansionConfig,
    #[serde(default)]
    pub zones: ZoneConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Defaults applied to every expansion call made by the binary.
#[derive(Debug, Clone, Deserialize)]
pub struct ExpansionConfig {
    /// Zone identifier used for day normalization.
    pub zone: String,
    pub week_start: WeekStart,
    pub max_instances: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ZoneConfig {
    /// Extra zone identifiers mapped onto IANA names, e.g. `office = "Europe/Berlin"`.
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables and `almanac.toml` into `Settings`.
    /// Environment variables take precedence over file values.
    ///
    /// ## Errors
    /// Returns an error if building the configuration or deserializing it fails.
    pub fn load() -> Result<Self> {
        let settings = with_defaults()?
            .add_source(config::File::with_name(CONFIG_FILE_NAME).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Settings>()?;

        settings.check()?;
        Ok(settings)
    }

    /// ## Summary
    /// Builds `Settings` from an in-memory TOML document layered over the defaults.
    ///
    /// ## Errors
    /// Returns an error if the document cannot be parsed or fails validation.
    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings = with_defaults()?
            .add_source(config::File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize::<Settings>()?;

        settings.check()?;
        Ok(settings)
    }

    /// ## Summary
    /// Rejects settings the engine cannot work with.
    ///
    /// ## Errors
    /// Returns `CoreError::ConfigError` when `expansion.max_instances` is zero
    /// or the zone identifier is blank.
    pub fn check(&self) -> CoreResult<()> {
        if self.expansion.max_instances == 0 {
            return Err(CoreError::ConfigError(
                "expansion.max_instances must be at least 1".to_string(),
            ));
        }
        if self.expansion.zone.trim().is_empty() {
            return Err(CoreError::ConfigError(
                "expansion.zone must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("logging.level", DEFAULT_LOG_LEVEL)?
        .set_default("expansion.zone", DEFAULT_ZONE)?
        .set_default("expansion.week_start", WeekStart::default().as_str())?
        .set_default("expansion.max_instances", i64::from(DEFAULT_MAX_INSTANCES))?)
}

/// ## Summary
/// Loads configuration from environment variables, `.env` and `almanac.toml`.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    let settings = Settings::load()?;
    tracing::debug!(zone = %settings.expansion.zone, "Settings loaded");
    Ok(settings)
}
