//! Gradient boosted regression trees with early stopping.
//!
//! Squared-error boosting: the ensemble starts from the mean target and each
//! round fits a tree to the current residuals. Validation RMSE is tracked
//! after every round and the returned model is cut back to the best round.

use automl_api::BoostingConfig;
use automl_spi::{AutoMLError, BoostedEnsemble, Estimator, Result, TrainedModel};
use data_spi::{DataError, Dataset, FEATURE_COUNT};
use serde::Serialize;

use crate::binning::{BinnedMatrix, MAX_BINS};
use crate::metrics::{mean, rmse};
use crate::tree::TreeGrower;

/// Early stopping state for a lower-is-better metric.
///
/// Stops once `patience` consecutive rounds fail to strictly improve on the
/// best value, so a run whose first round is never beaten evaluates exactly
/// `patience + 1` rounds.
#[derive(Debug, Clone)]
pub struct EarlyStopping {
    patience: usize,
    best_value: Option<f64>,
    best_round: usize,
    current_round: usize,
}

impl EarlyStopping {
    pub fn new(patience: usize) -> Self {
        Self {
            patience,
            best_value: None,
            best_round: 0,
            current_round: 0,
        }
    }

    /// Record the metric for the current round and report whether to stop.
    pub fn should_stop(&mut self, value: f64) -> bool {
        let is_improvement = match self.best_value {
            None => !value.is_nan(),
            Some(best) => value < best,
        };

        if is_improvement {
            self.best_value = Some(value);
            self.best_round = self.current_round;
        }

        self.current_round += 1;
        self.current_round - self.best_round > self.patience
    }

    pub fn best_value(&self) -> Option<f64> {
        self.best_value
    }

    /// Zero-based round of the best value.
    pub fn best_round(&self) -> usize {
        self.best_round
    }

    /// Rounds recorded so far.
    pub fn current_round(&self) -> usize {
        self.current_round
    }
}

/// Result of a boosting run.
#[derive(Debug, Clone)]
pub struct BoostingOutcome {
    /// Model truncated to `best_round + 1` trees.
    pub model: TrainedModel,
    pub best_round: usize,
    pub rounds_evaluated: usize,
    pub best_rmse: f64,
    pub history: RoundHistory,
}

/// Validation RMSE after each round.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RoundHistory {
    pub rmse: Vec<f64>,
}

impl RoundHistory {
    pub fn len(&self) -> usize {
        self.rmse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rmse.is_empty()
    }
}

/// Trains a boosted ensemble against a validation set.
#[derive(Debug, Clone, Copy)]
pub struct GradientBoostingTrainer {
    config: BoostingConfig,
}

impl GradientBoostingTrainer {
    pub fn new(config: BoostingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BoostingConfig {
        &self.config
    }

    pub fn fit(&self, train: &Dataset, validation: &Dataset) -> Result<BoostingOutcome> {
        self.config.validate()?;
        if train.is_empty() || validation.is_empty() {
            return Err(DataError::Empty.into());
        }

        let train_rows = train.feature_rows();
        let train_y = train.targets();
        let val_rows = validation.feature_rows();
        let val_y = validation.targets();

        let bins = BinnedMatrix::from_rows(&train_rows, FEATURE_COUNT, MAX_BINS);
        let grower = TreeGrower::new(&bins, self.config.tree);
        let lr = self.config.learning_rate;

        let base = mean(&train_y);
        let mut ensemble = BoostedEnsemble::new(base, lr, FEATURE_COUNT);
        let mut train_pred = vec![base; train_y.len()];
        let mut val_pred = vec![base; val_y.len()];
        let mut residuals = vec![0.0; train_y.len()];
        let mut rows: Vec<u32> = (0..train_y.len() as u32).collect();

        let mut stopper = EarlyStopping::new(self.config.patience);
        let mut history = RoundHistory::default();

        for round in 0..self.config.max_rounds {
            for ((r, y), p) in residuals.iter_mut().zip(&train_y).zip(&train_pred) {
                *r = y - p;
            }

            let tree = grower.grow(&mut rows, &residuals);
            for (p, row) in train_pred.iter_mut().zip(&train_rows) {
                *p += lr * tree.predict_row(row);
            }
            for (p, row) in val_pred.iter_mut().zip(&val_rows) {
                *p += lr * tree.predict_row(row);
            }
            ensemble.push(tree);

            let score = rmse(&val_y, &val_pred);
            if !score.is_finite() {
                return Err(AutoMLError::NumericalError(format!(
                    "validation RMSE became non-finite at round {}",
                    round + 1
                )));
            }
            history.rmse.push(score);
            tracing::trace!(round = round + 1, rmse = score, "boosting round");

            if stopper.should_stop(score) {
                tracing::debug!(
                    round = round + 1,
                    best_round = stopper.best_round() + 1,
                    "early stopping triggered"
                );
                break;
            }
        }

        let best_round = stopper.best_round();
        let best_rmse = stopper.best_value().unwrap_or(f64::NAN);
        ensemble.truncate(best_round + 1);

        tracing::info!(
            rounds_evaluated = history.len(),
            best_round = best_round + 1,
            best_rmse,
            "gradient boosting finished"
        );

        Ok(BoostingOutcome {
            model: TrainedModel::new(Estimator::GradientBoosting(ensemble)),
            best_round,
            rounds_evaluated: history.len(),
            best_rmse,
            history,
        })
    }
}
