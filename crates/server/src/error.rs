//! Request and service error types.

use std::io;
use std::net::SocketAddr;

use automl_spi::AutoMLError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::ConfigError;

/// JSON error body: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

/// Why a `/predict` request did not produce a prediction.
///
/// Validation variants are checked in declaration order; the first failure
/// wins. Display strings are the exact client-facing messages.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("Request body must be valid JSON")]
    MalformedBody(#[source] serde_json::Error),

    #[error("Missing 'features' key in request")]
    MissingFeatures,

    #[error("Invalid number of features. Expected {expected}, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    #[error("All features must be numeric (int or float).")]
    FeatureType,

    #[error("Model is not loaded")]
    ModelUnavailable,

    /// Inference failed. The cause is logged, never returned.
    #[error("An error occurred during prediction.")]
    Prediction(#[source] AutoMLError),
}

impl PredictError {
    pub fn status(&self) -> StatusCode {
        match self {
            PredictError::MalformedBody(_)
            | PredictError::MissingFeatures
            | PredictError::FeatureCount { .. }
            | PredictError::FeatureType => StatusCode::BAD_REQUEST,
            PredictError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            PredictError::Prediction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Short machine-readable kind for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PredictError::MalformedBody(_) => "malformed_body",
            PredictError::MissingFeatures => "missing_features",
            PredictError::FeatureCount { .. } => "feature_count",
            PredictError::FeatureType => "feature_type",
            PredictError::ModelUnavailable => "model_unavailable",
            PredictError::Prediction(_) => "prediction",
        }
    }
}

impl IntoResponse for PredictError {
    fn into_response(self) -> Response {
        (self.status(), Json(ErrorResponse::new(self.to_string()))).into_response()
    }
}

/// Failures that stop the server from running.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Server error: {0}")]
    Io(#[from] io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_errors_are_bad_request() {
        for err in [
            PredictError::MissingFeatures,
            PredictError::FeatureCount {
                expected: 8,
                actual: 3,
            },
            PredictError::FeatureType,
        ] {
            assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_feature_count_message() {
        let err = PredictError::FeatureCount {
            expected: 8,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "Invalid number of features. Expected 8, got 3"
        );
    }

    #[test]
    fn test_prediction_error_hides_cause() {
        let err = PredictError::Prediction(AutoMLError::NumericalError("overflow".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "An error occurred during prediction.");
        assert_eq!(err.kind(), "prediction");
    }

    #[test]
    fn test_unavailable_is_503() {
        assert_eq!(
            PredictError::ModelUnavailable.status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
