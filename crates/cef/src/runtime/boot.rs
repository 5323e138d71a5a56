//! Boot: logging init and config load.

use tracing::{info, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::conf::ParserConfig;

/// Initialise the tracing / logging subsystem.
///
/// Logs go to stderr so stdout stays reserved for parsed events.
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cef=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load and validate configuration.
pub fn boot() -> Result<ParserConfig, Box<dyn std::error::Error>> {
    info!("Starting CEF parser v{}", env!("CARGO_PKG_VERSION"));

    let config = ParserConfig::load()?;
    config.validate().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e
    })?;

    info!(
        "Parser options: validate={}, allow_nulls={}, locale={}, max_line_size={}",
        config.validate, config.allow_nulls, config.locale, config.max_line_size
    );

    Ok(config)
}
