//! End-to-end training: search, boost, select.

use automl_api::TrainingConfig;
use automl_spi::{
    Candidate, HyperparameterOptimizer, ModelFamily, ModelSelector, ParamPoint, Result,
    SelectedSlot, SelectionResult,
};
use data_core::train_test_split;
use data_spi::Dataset;
use serde::Serialize;

use crate::boosting::{GradientBoostingTrainer, RoundHistory};
use crate::evaluation::{evaluate, Evaluation};
use crate::search::{GridSearch, PointScore};
use crate::selection::LowestRmseSelector;

/// Summary of a training run.
#[derive(Debug, Clone, Serialize)]
pub struct TrainingReport {
    pub fit_rows: usize,
    pub validation_rows: usize,
    pub best_point: ParamPoint,
    pub best_cv_score: f64,
    pub grid_scores: Vec<PointScore>,
    pub forest: Evaluation,
    pub boosting: Evaluation,
    pub boosting_best_round: usize,
    pub boosting_rounds_evaluated: usize,
    pub boosting_history: RoundHistory,
    pub selected: ModelFamily,
    pub selected_slot: SelectedSlot,
}

/// Output of [`TrainingPipeline::run`].
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub selection: SelectionResult,
    pub report: TrainingReport,
}

/// Trains both candidate families on one fit/validation split and keeps the better.
///
/// The random forest is always the first candidate, so it is kept when the
/// two validation scores are equal.
#[derive(Debug, Clone, Default)]
pub struct TrainingPipeline {
    config: TrainingConfig,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    pub fn run(&self, train: &Dataset) -> Result<TrainingOutcome> {
        self.config.validate()?;

        let split = train_test_split(train, self.config.validation_ratio, self.config.seed)?;
        let (fit, validation) = (&split.train, &split.test);
        tracing::info!(
            fit_rows = fit.len(),
            validation_rows = validation.len(),
            "split training data"
        );

        let search = GridSearch::new(self.config.search.clone()).optimize(fit)?;
        let forest_eval = evaluate(&search.model, validation)?;
        tracing::info!(
            mse = forest_eval.mse,
            rmse = forest_eval.rmse,
            "random forest validation"
        );

        let boosting = GradientBoostingTrainer::new(self.config.boosting).fit(fit, validation)?;
        let boosting_eval = evaluate(&boosting.model, validation)?;
        tracing::info!(
            mse = boosting_eval.mse,
            rmse = boosting_eval.rmse,
            "gradient boosting validation"
        );

        let selection = LowestRmseSelector::new().select(
            Candidate::new(search.model, forest_eval.mse),
            Candidate::new(boosting.model, boosting_eval.mse),
        );

        let report = TrainingReport {
            fit_rows: fit.len(),
            validation_rows: validation.len(),
            best_point: search.best_point,
            best_cv_score: search.best_score,
            grid_scores: search.all_scores,
            forest: forest_eval,
            boosting: boosting_eval,
            boosting_best_round: boosting.best_round + 1,
            boosting_rounds_evaluated: boosting.rounds_evaluated,
            boosting_history: boosting.history,
            selected: selection.family,
            selected_slot: selection.winner,
        };

        Ok(TrainingOutcome { selection, report })
    }
}
