//! Route handlers and wire types.

use super::AppState;
use crate::error::{Result, SibylError};
use crate::model::{FeatureMatrix, PredictionValue};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// Message returned by the info route.
pub const SERVICE_MESSAGE: &str = "Sibyl API is running!";

/// Endpoints advertised by the info route.
pub const ENDPOINTS: &[&str] = &["/predict (POST)"];

/// Body of `GET /`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub endpoints: Vec<String>,
}

impl ServiceInfo {
    pub fn current() -> Self {
        Self {
            message: SERVICE_MESSAGE.to_string(),
            endpoints: ENDPOINTS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

/// Body of `POST /predict`: a single sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictRequest {
    pub features: Vec<f64>,
}

/// Successful prediction response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: Vec<PredictionValue>,
}

/// Structured error body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

/// `GET /`
pub async fn home() -> Json<ServiceInfo> {
    Json(ServiceInfo::current())
}

/// `POST /predict`
pub async fn predict(
    State(state): State<AppState>,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> Response {
    match run_prediction(&state, payload) {
        Ok(response) => Json(response).into_response(),
        Err(e) => error_response(e, state.debug),
    }
}

fn run_prediction(
    state: &AppState,
    payload: std::result::Result<Json<PredictRequest>, JsonRejection>,
) -> Result<PredictResponse> {
    let Json(request) = payload.map_err(rejection_to_error)?;

    let matrix = FeatureMatrix::from_row(request.features)?;
    matrix.ensure_width(state.model.n_features())?;

    let prediction = state.model.predict(&matrix)?;
    ensure_finite(&prediction)?;
    debug!(n_features = matrix.n_cols(), prediction = ?prediction, "Prediction served");

    Ok(PredictResponse { prediction })
}

/// Non-finite floats have no JSON encoding; treat them as a model fault.
fn ensure_finite(prediction: &[PredictionValue]) -> Result<()> {
    for value in prediction {
        if let PredictionValue::Float(v) = value {
            if !v.is_finite() {
                return Err(SibylError::Prediction(format!(
                    "model produced a non-finite value ({})",
                    v
                )));
            }
        }
    }
    Ok(())
}

fn rejection_to_error(rejection: JsonRejection) -> SibylError {
    match rejection {
        JsonRejection::JsonDataError(e) => SibylError::InvalidRequest(e.body_text()),
        JsonRejection::JsonSyntaxError(e) => SibylError::MalformedRequest(e.body_text()),
        JsonRejection::MissingJsonContentType(e) => SibylError::MalformedRequest(e.body_text()),
        other if other.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            SibylError::PayloadTooLarge(other.body_text())
        }
        other => SibylError::MalformedRequest(other.body_text()),
    }
}

/// Render an error as a structured JSON response.
///
/// Server-side messages are replaced by a generic one unless `debug` is set.
pub fn error_response(err: SibylError, debug: bool) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let message = if status.is_server_error() {
        error!(error = %err, "Prediction request failed");
        if debug {
            err.to_string()
        } else {
            "internal server error".to_string()
        }
    } else {
        warn!(error = %err, status = status.as_u16(), "Rejected prediction request");
        err.to_string()
    };

    let body = ErrorResponse {
        error: ErrorDetail {
            code: err.code().to_string(),
            message,
        },
    };

    (status, Json(body)).into_response()
}
