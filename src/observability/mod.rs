//! Observability module for Sibyl.
//!
//! Structured logging through `tracing`, configured once at startup.

use crate::config::SibylConfig;
use crate::error::{Result, SibylError};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Initialize logging.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init(config: &SibylConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level()));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.observability.json_logs {
        subscriber
            .with(fmt::layer().json())
            .try_init()
            .map_err(|e| SibylError::Internal(format!("Failed to init logging: {}", e)))?;
    } else {
        subscriber
            .with(fmt::layer())
            .try_init()
            .map_err(|e| SibylError::Internal(format!("Failed to init logging: {}", e)))?;
    }

    info!(
        level = config.log_level(),
        json = config.observability.json_logs,
        "Logging initialized"
    );
    Ok(())
}
