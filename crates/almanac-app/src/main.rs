use std::path::PathBuf;

use almanac_app::defaults::expansion_defaults;
use almanac_app::output::write_json_lines;
use almanac_app::request::{DEFAULT_REQUEST_FILE, RuleRequest};
use almanac_core::config::load_config;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();

    let config = load_config()?;

    tracing::info!(config = ?config, "Configuration loaded");

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping debug");
    }

    let base = expansion_defaults(&config)?;

    let path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_REQUEST_FILE), PathBuf::from);

    let request = RuleRequest::load(&path)?;
    let expansion = request.run(base)?;

    let written = write_json_lines(&mut std::io::stdout().lock(), &expansion.occurrences)?;
    tracing::info!(count = written, degraded = expansion.is_degraded(), "Occurrences written");

    Ok(())
}
