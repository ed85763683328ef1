//! AutoML Facade
//!
//! High-level API for training housing price models. Re-exports all public
//! types from the automl stack for convenient usage.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use automl_facade::prelude::*;
//! use data_core::{CsvDatasetStore, DatasetStore};
//!
//! # fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//! let train = CsvDatasetStore::new().load(Path::new("data/train.csv"))?;
//! let outcome = TrainingPipeline::new(TrainingConfig::default()).run(&train)?;
//! println!("Selected: {} (RMSE {:.4})", outcome.selection.family, outcome.selection.rmse);
//! # Ok(())
//! # }
//! ```

// Re-export everything from core (which includes API and SPI)
pub use automl_core::*;

/// Prelude module for convenient imports
pub mod prelude {
    // Traits
    pub use automl_spi::{HyperparameterOptimizer, ModelSelector, Regressor};

    // Configuration
    pub use automl_api::{
        BoostingConfig, ForestParams, GridSearchConfig, TrainingConfig, TreeParams, DEFAULT_SEED,
    };

    // Model and error types
    pub use automl_spi::{
        AutoMLError, Candidate, HyperparameterGrid, ModelFamily, ParamPoint, ParamValue, Result,
        SelectedSlot, SelectionResult, TieBreakPolicy, TrainedModel,
    };

    // Implementations
    pub use automl_core::{
        evaluate, Evaluation, GradientBoostingTrainer, GridSearch, LowestRmseSelector,
        RandomForestTrainer, SearchOutcome, TrainingOutcome, TrainingPipeline, TrainingReport,
    };
}
