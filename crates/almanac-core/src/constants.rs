/// Configuration file looked up in the working directory (optional)
pub const CONFIG_FILE_NAME: &str = "almanac.toml";

/// Environment overrides look like `ALMANAC__EXPANSION__ZONE=Europe/Berlin`
pub const ENV_PREFIX: &str = "ALMANAC";
pub const ENV_SEPARATOR: &str = "__";

pub const DEFAULT_LOG_LEVEL: &str = "info";
pub const DEFAULT_ZONE: &str = "UTC";

/// Upper bound on occurrences emitted by a single expansion call
pub const DEFAULT_MAX_INSTANCES: u32 = 1000;
