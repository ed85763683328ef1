//! Shared application state.

use std::sync::Arc;

use automl_spi::TrainedModel;
use registry::{LoadError, ModelRegistry};

use crate::error::PredictError;

/// Why the service started without a model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Degraded {
    pub kind: &'static str,
    pub reason: String,
}

/// Application state shared across handlers.
///
/// The model is loaded once at startup and never replaced, so handlers read
/// it without locking.
#[derive(Debug, Clone)]
pub struct AppState {
    model: Option<Arc<TrainedModel>>,
    degraded: Option<Degraded>,
}

impl AppState {
    /// State serving `model`.
    pub fn ready(model: TrainedModel) -> Self {
        Self {
            model: Some(Arc::new(model)),
            degraded: None,
        }
    }

    /// State with no model, remembering why the load failed.
    pub fn degraded(error: &LoadError) -> Self {
        Self {
            model: None,
            degraded: Some(Degraded {
                kind: error.kind(),
                reason: error.to_string(),
            }),
        }
    }

    /// Load the registry's artifact, degrading instead of failing.
    pub fn from_registry(registry: &ModelRegistry) -> Self {
        match registry.load() {
            Ok(model) => Self::ready(model),
            Err(err) => {
                tracing::warn!(
                    path = %registry.path().display(),
                    error_kind = err.kind(),
                    error = %err,
                    "starting without a model"
                );
                Self::degraded(&err)
            }
        }
    }

    pub fn model(&self) -> Option<&TrainedModel> {
        self.model.as_deref()
    }

    pub fn degraded_reason(&self) -> Option<&Degraded> {
        self.degraded.as_ref()
    }

    pub fn is_ready(&self) -> bool {
        self.model.is_some()
    }

    /// Score one validated feature row.
    pub fn predict(&self, features: &[f64]) -> Result<f64, PredictError> {
        let model = self.model().ok_or(PredictError::ModelUnavailable)?;
        model.predict(features).map_err(PredictError::Prediction)
    }
}
