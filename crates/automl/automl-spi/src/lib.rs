//! AutoML Service Provider Interface
//!
//! Defines traits and data structures for training and selecting housing
//! price regressors:
//! - [`Regressor`] - row-wise inference over the fixed feature layout
//! - [`HyperparameterOptimizer`] - cross-validated search over a grid
//! - [`ModelSelector`] - choosing the deployable model between two candidates
//! - [`TrainedModel`] - the persisted, servable model

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at the crate root for convenience
pub use contract::{HyperparameterOptimizer, ModelSelector, Regressor};
pub use error::AutoMLError;
pub use model::{
    BoostedEnsemble, Candidate, Estimator, Forest, HyperparameterGrid, ModelFamily, ParamPoint,
    ParamValue, RegressionTree, SelectedSlot, SelectionResult, TieBreakPolicy, TrainedModel,
    TreeNode,
};

/// Result type for AutoML operations.
pub type Result<T> = std::result::Result<T, AutoMLError>;
