//! AutoML Core
//!
//! Core implementations for training housing price regressors:
//! - Histogram-binned regression trees and random forests
//! - Gradient boosting with early stopping
//! - Cross-validated grid search
//! - Model selection and offline evaluation

mod binning;
mod boosting;
mod checks;
mod evaluation;
mod forest;
mod kfold;
pub mod metrics;
mod pipeline;
mod search;
mod selection;
mod tree;

pub use binning::{BinMapper, BinnedMatrix, MAX_BINS};
pub use boosting::{BoostingOutcome, EarlyStopping, GradientBoostingTrainer, RoundHistory};
pub use checks::{check_training_data, feature_rank};
pub use evaluation::{evaluate, Evaluation};
pub use forest::RandomForestTrainer;
pub use kfold::{Fold, KFold};
pub use pipeline::{TrainingOutcome, TrainingPipeline, TrainingReport};
pub use search::{GridSearch, PointScore, SearchOutcome};
pub use selection::LowestRmseSelector;
pub use tree::TreeGrower;

// Re-export from API for convenience
pub use automl_api::{
    AutoMLError, BoostingConfig, ForestParams, GridSearchConfig, Result, TrainingConfig,
    TreeParams, DEFAULT_SEED,
};

// Re-export SPI traits and types
pub use automl_spi::{
    Candidate, HyperparameterOptimizer, ModelFamily, ModelSelector, Regressor, SelectedSlot,
    SelectionResult, TieBreakPolicy, TrainedModel,
};
