//! HTTP layer for Sibyl.
//!
//! Two routes share one immutable predictor:
//!
//! - `GET /` - service info
//! - `POST /predict` - single-sample inference

mod cors;
mod handlers;

pub use cors::{cors_middleware, CorsPolicy};
pub use handlers::{
    error_response, ErrorDetail, ErrorResponse, PredictRequest, PredictResponse, ServiceInfo,
    ENDPOINTS, SERVICE_MESSAGE,
};

use crate::config::ServerConfig;
use crate::error::{Result, SibylError};
use crate::model::Predictor;
use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Shared state for route handlers.
#[derive(Clone)]
pub struct AppState {
    /// The loaded model, read-only for the process lifetime.
    pub model: Arc<dyn Predictor>,
    /// Expose internal error details in responses.
    pub debug: bool,
}

impl AppState {
    pub fn new(model: Arc<dyn Predictor>) -> Self {
        Self {
            model,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }
}

/// Build the application router.
pub fn build_router(model: Arc<dyn Predictor>, config: &ServerConfig) -> Router {
    let state = AppState::new(model).with_debug(config.debug);
    let cors = CorsPolicy::new(config.allowed_origins.clone());

    Router::new()
        .route("/", get(handlers::home))
        .route("/predict", post(handlers::predict))
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .with_state(state)
        .layer(middleware::from_fn_with_state(cors, cors_middleware))
}

/// Bind the listener and serve until the process exits.
pub async fn run_server(config: ServerConfig, model: Arc<dyn Predictor>) -> Result<()> {
    let app = build_router(model, &config);

    let listener = TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, debug = config.debug, "Sibyl listening");

    axum::serve(listener, app)
        .await
        .map_err(|e| SibylError::Network(e.to_string()))?;

    Ok(())
}
