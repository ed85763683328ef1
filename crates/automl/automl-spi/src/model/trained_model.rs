//! The persisted, servable model.

use std::collections::BTreeMap;
use std::fmt;

use data_spi::{Dataset, FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
use serde::{Deserialize, Serialize};

use crate::contract::Regressor;
use crate::error::AutoMLError;
use crate::model::{Estimator, ParamPoint};
use crate::Result;

/// Supported model families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ModelFamily {
    RandomForest = 0,
    GradientBoosting = 1,
}

impl ModelFamily {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(ModelFamily::RandomForest),
            1 => Some(ModelFamily::GradientBoosting),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ModelFamily::RandomForest => "random_forest",
            ModelFamily::GradientBoosting => "gradient_boosting",
        }
    }
}

impl fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A fitted estimator bound to the feature layout it was trained on.
///
/// This is the unit the registry persists and the prediction service serves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    feature_names: Vec<String>,
    estimator: Estimator,
    hyperparameters: BTreeMap<String, String>,
}

impl TrainedModel {
    /// Wrap an estimator trained on the housing feature layout.
    pub fn new(estimator: Estimator) -> Self {
        Self {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            estimator,
            hyperparameters: BTreeMap::new(),
        }
    }

    /// Record the hyperparameters the estimator was fitted with.
    pub fn with_hyperparameters(mut self, point: &ParamPoint) -> Self {
        self.hyperparameters = point
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self
    }

    pub fn family(&self) -> ModelFamily {
        self.estimator.family()
    }

    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    pub fn hyperparameters(&self) -> &BTreeMap<String, String> {
        &self.hyperparameters
    }

    /// Predict one row in the fixed feature order.
    pub fn predict(&self, features: &[f64]) -> Result<f64> {
        if features.len() != self.estimator.n_features() {
            return Err(AutoMLError::PredictionError(format!(
                "expected {} features, got {}",
                self.estimator.n_features(),
                features.len()
            )));
        }
        if features.iter().any(|v| !v.is_finite()) {
            return Err(AutoMLError::PredictionError(
                "features must be finite".into(),
            ));
        }

        let prediction = self.estimator.predict_row(features);
        if !prediction.is_finite() {
            return Err(AutoMLError::NumericalError(
                "model produced a non-finite prediction".into(),
            ));
        }
        Ok(prediction)
    }

    pub fn predict_vector(&self, features: &FeatureVector) -> Result<f64> {
        self.predict(features.as_slice())
    }

    /// Predict every row of a dataset, in order.
    pub fn predict_dataset(&self, dataset: &Dataset) -> Result<Vec<f64>> {
        dataset
            .iter()
            .map(|example| self.predict_vector(&example.features))
            .collect()
    }

    /// Check that the model matches the housing layout and is structurally sound.
    pub fn validate(&self) -> Result<()> {
        let layout_matches = self.feature_names.len() == FEATURE_COUNT
            && self
                .feature_names
                .iter()
                .zip(FEATURE_NAMES)
                .all(|(a, b)| a == b);
        if !layout_matches {
            return Err(AutoMLError::InvalidConfig(format!(
                "feature layout {:?} does not match the housing features",
                self.feature_names
            )));
        }
        if self.estimator.n_features() != FEATURE_COUNT {
            return Err(AutoMLError::InvalidConfig(format!(
                "estimator expects {} features, layout has {}",
                self.estimator.n_features(),
                FEATURE_COUNT
            )));
        }
        self.estimator
            .validate()
            .map_err(AutoMLError::InvalidConfig)
    }
}

impl Regressor for TrainedModel {
    fn n_features(&self) -> usize {
        self.estimator.n_features()
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        self.estimator.predict_row(row)
    }
}
