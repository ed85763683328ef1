//! AutoML error types.

use data_spi::DataError;
use thiserror::Error;

/// Errors that can occur while searching, training, selecting or scoring models.
///
/// `InvalidConfig` and `InvalidParameter` are configuration errors and are
/// fatal before any fitting starts. `InsufficientData`, `RankDeficient`,
/// `FitError` and `NumericalError` are training errors and are fatal to the
/// attempt; nothing is retried.
#[derive(Error, Debug)]
pub enum AutoMLError {
    /// Invalid pipeline or search configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Invalid hyperparameter name or value.
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Insufficient rows for the operation.
    #[error("Insufficient data: need at least {required} rows, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    /// The feature matrix does not have full column rank.
    #[error("Rank-deficient features: rank {rank} of {expected}")]
    RankDeficient { rank: usize, expected: usize },

    /// Model fitting failed.
    #[error("Model fitting failed: {0}")]
    FitError(String),

    /// Numerical computation error.
    #[error("Numerical error: {0}")]
    NumericalError(String),

    /// Inference failed.
    #[error("Prediction failed: {0}")]
    PredictionError(String),

    /// Malformed or missing dataset.
    #[error(transparent)]
    Data(#[from] DataError),
}
