//! Structured logging initialization

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::LoggingConfig;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. The format is one
/// of `json`, `pretty`, or `compact` per `logging.format`.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.clone()));

    let registry = tracing_subscriber::registry().with(filter);

    match config.format.as_str() {
        "json" => registry.with(fmt::layer().json()).try_init()?,
        "compact" => registry.with(fmt::layer().compact()).try_init()?,
        _ => registry.with(fmt::layer().pretty()).try_init()?,
    }

    Ok(())
}
