//! Sibyl - an HTTP prediction service for a single pre-trained model.
//!
//! Sibyl loads one serialized model artifact at startup and serves it over
//! two routes:
//!
//! - `GET /` returns a fixed service description.
//! - `POST /predict` takes `{"features": [..]}`, scores it as a single
//!   sample and returns `{"prediction": [..]}`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          Sibyl                              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  HTTP: axum router | CORS | JSON validation | error bodies  │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Predictor: Arc<dyn Predictor>, immutable after startup     │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Artifact: linear | logistic | decision tree | forest       │
//! │            JSON or bincode on local disk                    │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use sibyl::config::SibylConfig;
//!
//! #[tokio::main]
//! async fn main() -> sibyl::Result<()> {
//!     let mut config = SibylConfig::default();
//!     config.model.path = "iris.json".into();
//!
//!     // Loads the model (failing fast if it is missing) and serves.
//!     sibyl::run(config).await
//! }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod model;
pub mod observability;
pub mod server;

// Re-exports
pub use error::{Result, SibylError};
pub use model::{FeatureMatrix, PredictionValue, Predictor};

use config::SibylConfig;
use tracing::info;

/// Run Sibyl with the given configuration.
///
/// The model is loaded before the listener is bound; a missing or corrupt
/// artifact aborts startup.
pub async fn run(config: SibylConfig) -> Result<()> {
    config.validate()?;
    observability::init(&config)?;

    info!(version = env!("CARGO_PKG_VERSION"), "Starting Sibyl");

    let model = model::load_predictor(&config.model)?;
    server::run_server(config.server, model).await
}
