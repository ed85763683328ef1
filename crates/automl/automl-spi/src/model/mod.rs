//! Model module containing AutoML data structures.
//!
//! - [`HyperparameterGrid`] / [`ParamPoint`] - search space and grid points
//! - [`RegressionTree`], [`Forest`], [`BoostedEnsemble`] - fitted estimator state
//! - [`TrainedModel`] - estimator plus the feature layout it was trained on
//! - [`Candidate`] / [`SelectionResult`] - model selection inputs and output

mod ensemble;
mod param;
mod selection;
mod trained_model;

pub use ensemble::{BoostedEnsemble, Estimator, Forest, RegressionTree, TreeNode};
pub use param::{HyperparameterGrid, ParamPoint, ParamValue};
pub use selection::{Candidate, SelectedSlot, SelectionResult, TieBreakPolicy};
pub use trained_model::{ModelFamily, TrainedModel};
