//! Model selection types.

use serde::{Deserialize, Serialize};

use crate::model::{ModelFamily, TrainedModel};

/// A fitted model with its validation error.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub model: TrainedModel,
    pub mse: f64,
    pub rmse: f64,
}

impl Candidate {
    /// Score a model by its validation MSE.
    pub fn new(model: TrainedModel, mse: f64) -> Self {
        Self {
            model,
            mse,
            rmse: mse.sqrt(),
        }
    }

    pub fn family(&self) -> ModelFamily {
        self.model.family()
    }
}

/// Which candidate a selection kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectedSlot {
    First,
    Second,
}

/// How equal validation scores are resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TieBreakPolicy {
    /// The first candidate is kept unless the second is strictly better.
    #[default]
    KeepFirstOnTie,
}

/// Outcome of choosing between two candidates.
#[derive(Debug, Clone)]
pub struct SelectionResult {
    pub model: TrainedModel,
    pub family: ModelFamily,
    pub rmse: f64,
    pub first_rmse: f64,
    pub second_rmse: f64,
    pub winner: SelectedSlot,
    pub policy: TieBreakPolicy,
}

impl SelectionResult {
    /// Whether the two candidates scored the same.
    pub fn is_tie(&self) -> bool {
        self.first_rmse == self.second_rmse
    }
}
