//! Error types for Sibyl.
//!
//! This module provides a unified error type [`SibylError`] for every fallible
//! operation in the crate, along with a convenient [`Result`] type alias.
//!
//! # Error Categories
//!
//! - **Startup**: the model artifact or configuration could not be loaded.
//!   These abort the process before the listener is bound.
//! - **Request**: the client sent something the model cannot score.
//!   These map to 4xx responses.
//! - **Prediction**: the model failed while scoring a well-formed request.
//!   These map to 5xx responses.
//!
//! # Example
//!
//! ```rust
//! use sibyl::error::{Result, SibylError};
//!
//! fn check_width(expected: usize, actual: usize) -> Result<()> {
//!     if expected != actual {
//!         return Err(SibylError::ShapeMismatch { expected, actual });
//!     }
//!     Ok(())
//! }
//!
//! let err = check_width(4, 3).unwrap_err();
//! assert!(err.is_client_error());
//! assert_eq!(err.code(), "shape_mismatch");
//! ```

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Sibyl operations.
#[derive(Error, Debug)]
pub enum SibylError {
    // Startup errors
    #[error("Model artifact not found: {}", .0.display())]
    ModelNotFound(PathBuf),

    #[error("Failed to load model artifact: {0}")]
    ModelLoad(String),

    #[error("Invalid model artifact: {0}")]
    InvalidModel(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    // Request errors
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    #[error("Expected {expected} features, got {actual}")]
    ShapeMismatch { expected: usize, actual: usize },

    // Prediction errors
    #[error("Prediction failed: {0}")]
    Prediction(String),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    // External errors
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SibylError {
    /// HTTP status code for this error when it reaches a client.
    pub fn status_code(&self) -> u16 {
        match self {
            SibylError::MalformedRequest(_) => 400,
            SibylError::PayloadTooLarge(_) => 413,
            SibylError::InvalidRequest(_) | SibylError::ShapeMismatch { .. } => 422,
            _ => 500,
        }
    }

    /// Stable machine-readable error code used in response bodies.
    pub fn code(&self) -> &'static str {
        match self {
            SibylError::MalformedRequest(_)
            | SibylError::PayloadTooLarge(_)
            | SibylError::InvalidRequest(_) => "invalid_request",
            SibylError::ShapeMismatch { .. } => "shape_mismatch",
            SibylError::Prediction(_) => "prediction_failed",
            _ => "internal_error",
        }
    }

    /// Check if the error was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}

impl From<bincode::Error> for SibylError {
    fn from(e: bincode::Error) -> Self {
        SibylError::Serialization(e.to_string())
    }
}

impl From<serde_json::Error> for SibylError {
    fn from(e: serde_json::Error) -> Self {
        SibylError::Serialization(e.to_string())
    }
}

/// Result type alias for Sibyl operations.
pub type Result<T> = std::result::Result<T, SibylError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(SibylError::MalformedRequest("x".into()).status_code(), 400);
        assert_eq!(SibylError::PayloadTooLarge("x".into()).status_code(), 413);
        assert_eq!(SibylError::InvalidRequest("x".into()).status_code(), 422);
        assert_eq!(
            SibylError::ShapeMismatch { expected: 4, actual: 2 }.status_code(),
            422
        );
        assert_eq!(SibylError::Prediction("boom".into()).status_code(), 500);
        assert_eq!(SibylError::Internal("boom".into()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(SibylError::MalformedRequest("x".into()).code(), "invalid_request");
        assert_eq!(SibylError::InvalidRequest("x".into()).code(), "invalid_request");
        assert_eq!(SibylError::PayloadTooLarge("x".into()).code(), "invalid_request");
        assert_eq!(
            SibylError::ShapeMismatch { expected: 4, actual: 2 }.code(),
            "shape_mismatch"
        );
        assert_eq!(SibylError::Prediction("x".into()).code(), "prediction_failed");
        assert_eq!(SibylError::ModelLoad("x".into()).code(), "internal_error");
    }

    #[test]
    fn test_client_error_classification() {
        assert!(SibylError::InvalidRequest("x".into()).is_client_error());
        assert!(!SibylError::Prediction("x".into()).is_client_error());
        assert!(!SibylError::ModelNotFound(PathBuf::from("m.bin")).is_client_error());
    }

    #[test]
    fn test_shape_mismatch_message() {
        let err = SibylError::ShapeMismatch { expected: 4, actual: 3 };
        assert_eq!(err.to_string(), "Expected 4 features, got 3");
    }
}
