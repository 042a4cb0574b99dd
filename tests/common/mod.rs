//! Common test utilities for integration tests.

pub mod fixtures;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::Value;
use sibyl::model::ModelArtifact;
use std::path::PathBuf;
use tempfile::TempDir;
use tower::ServiceExt;

pub use fixtures::*;

/// Test environment that manages a temporary model directory.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub model_dir: PathBuf,
}

impl TestEnv {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let model_dir = temp_dir.path().join("models");
        std::fs::create_dir_all(&model_dir).expect("Failed to create model dir");

        Self {
            temp_dir,
            model_dir,
        }
    }

    /// Path for a model file inside the environment.
    pub fn model_path(&self, name: &str) -> PathBuf {
        self.model_dir.join(name)
    }

    /// Saves an artifact and returns its path.
    pub fn write_model(&self, name: &str, artifact: &ModelArtifact) -> PathBuf {
        let path = self.model_path(name);
        artifact.save(&path).expect("Failed to save model");
        path
    }

    /// Writes raw bytes under the model directory.
    pub fn write_raw(&self, name: &str, bytes: &[u8]) -> PathBuf {
        let path = self.model_path(name);
        std::fs::write(&path, bytes).expect("Failed to write file");
        path
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Sends a request through the router and returns status plus parsed JSON body.
///
/// Empty bodies come back as `Value::Null`.
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("router is infallible");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");

    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("Response body is not JSON")
    };
    (status, body)
}

/// Builds a JSON `POST /predict` request.
pub fn predict_request(body: impl Into<String>) -> Request<Body> {
    Request::post("/predict")
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .expect("valid request")
}

/// Builds a `POST /predict` request for a feature vector.
pub fn predict_features(features: &[f64]) -> Request<Body> {
    predict_request(serde_json::json!({ "features": features }).to_string())
}
