//! API route handlers

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use data_spi::FEATURE_COUNT;
use serde::Serialize;
use serde_json::Value;

use crate::error::{ErrorResponse, PredictError};
use crate::state::AppState;

pub const PREDICTION_MESSAGE: &str =
    "Prediction successful. House price is in units of $100,000.";
pub const NOT_FOUND_MESSAGE: &str = "Endpoint not found";

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: Vec<f64>,
    pub message: &'static str,
}

/// Validate a parsed request body and extract the feature row.
///
/// Checks presence, then length, then element types.
pub fn parse_features(body: &Value) -> Result<[f64; FEATURE_COUNT], PredictError> {
    let features = body.get("features").ok_or(PredictError::MissingFeatures)?;
    let items = features.as_array().ok_or(PredictError::FeatureType)?;

    if items.len() != FEATURE_COUNT {
        return Err(PredictError::FeatureCount {
            expected: FEATURE_COUNT,
            actual: items.len(),
        });
    }

    let mut row = [0.0; FEATURE_COUNT];
    for (slot, item) in row.iter_mut().zip(items) {
        *slot = match item {
            Value::Number(n) => n.as_f64().ok_or(PredictError::FeatureType)?,
            _ => return Err(PredictError::FeatureType),
        };
    }
    Ok(row)
}

/// `POST /predict`
pub async fn predict(State(state): State<AppState>, body: Bytes) -> Response {
    let parsed = serde_json::from_slice::<Value>(&body).map_err(PredictError::MalformedBody);
    let feature_count = parsed
        .as_ref()
        .ok()
        .and_then(|v| v.get("features"))
        .and_then(Value::as_array)
        .map(Vec::len);

    let result = parsed
        .and_then(|value| parse_features(&value))
        .and_then(|row| state.predict(&row));

    match result {
        Ok(prediction) => {
            tracing::info!(
                feature_count = FEATURE_COUNT,
                outcome = "accepted",
                prediction,
                "prediction served"
            );
            Json(PredictResponse {
                prediction: vec![prediction],
                message: PREDICTION_MESSAGE,
            })
            .into_response()
        }
        Err(err) => {
            match &err {
                PredictError::Prediction(cause) => tracing::error!(
                    feature_count = ?feature_count,
                    outcome = "failed",
                    error_kind = err.kind(),
                    error = %cause,
                    "prediction failed"
                ),
                _ => tracing::warn!(
                    feature_count = ?feature_count,
                    outcome = "rejected",
                    error_kind = err.kind(),
                    error = %err,
                    "prediction request rejected"
                ),
            }
            err.into_response()
        }
    }
}

/// Liveness check - is the server running?
pub async fn liveness() -> Json<Value> {
    Json(serde_json::json!({
        "status": "alive",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Readiness check - is a model loaded?
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match (state.model(), state.degraded_reason()) {
        (Some(model), _) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "status": "ready",
                "version": env!("CARGO_PKG_VERSION"),
                "model": {
                    "family": model.family().name(),
                    "features": model.feature_names(),
                }
            })),
        ),
        (None, degraded) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({
                "status": "degraded",
                "version": env!("CARGO_PKG_VERSION"),
                "kind": degraded.map(|d| d.kind),
                "reason": degraded.map(|d| d.reason.as_str()),
            })),
        ),
    }
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    tracing::warn!(path = %uri.path(), "endpoint not found");
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(NOT_FOUND_MESSAGE)),
    )
}
