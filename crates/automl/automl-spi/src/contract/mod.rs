//! Contract module containing AutoML traits.
//!
//! - [`Regressor`] - Row-wise inference
//! - [`HyperparameterOptimizer`] - Parameter search
//! - [`ModelSelector`] - Deployable model selection

mod hyperparameter_optimizer;
mod model_selector;
mod regressor;

pub use hyperparameter_optimizer::HyperparameterOptimizer;
pub use model_selector::ModelSelector;
pub use regressor::Regressor;
