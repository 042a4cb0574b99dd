//! Startup model loading.

use super::{ModelArtifact, Predictor};
use crate::config::ModelConfig;
use crate::error::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Load the configured artifact into a shared, read-only predictor.
///
/// Called once before the listener is bound. Any failure is fatal.
pub fn load_predictor(config: &ModelConfig) -> Result<Arc<dyn Predictor>> {
    let start = Instant::now();
    info!(path = %config.path.display(), "Loading model artifact");

    let artifact = ModelArtifact::load(&config.path).map_err(|e| {
        error!(path = %config.path.display(), error = %e, "Failed to load model artifact");
        e
    })?;

    let info = artifact.describe();
    info!(
        kind = %info.kind,
        n_features = info.n_features,
        name = info.name.as_deref().unwrap_or("-"),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Model loaded"
    );

    Ok(Arc::new(artifact))
}
