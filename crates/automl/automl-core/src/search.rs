//! Cross-validated grid search for the random forest.

use automl_api::{ForestParams, GridSearchConfig};
use automl_spi::{
    AutoMLError, Estimator, HyperparameterOptimizer, ParamPoint, Result, TrainedModel,
};
use data_spi::{Dataset, FEATURE_COUNT};
use rayon::prelude::*;
use serde::Serialize;

use crate::binning::{BinnedMatrix, MAX_BINS};
use crate::checks::check_training_data;
use crate::forest::RandomForestTrainer;
use crate::kfold::{Fold, KFold};
use crate::metrics::{mean, mse};

/// Cross-validation score of one grid point.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointScore {
    pub point: ParamPoint,
    /// Mean negative MSE over the folds (higher is better).
    pub mean_score: f64,
    pub fold_scores: Vec<f64>,
}

/// Result of a grid search.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best_point: ParamPoint,
    pub best_params: ForestParams,
    pub best_score: f64,
    /// Scores for every grid point, in enumeration order.
    pub all_scores: Vec<PointScore>,
    /// The best configuration refit on all search rows.
    pub model: TrainedModel,
}

/// Exhaustive grid search scored by k-fold negative MSE.
///
/// Every `(grid point, fold)` fit runs as an independent rayon task. The
/// best point is the one with the highest mean score; among equal scores the
/// earliest grid point wins.
#[derive(Debug, Clone)]
pub struct GridSearch {
    config: GridSearchConfig,
}

impl GridSearch {
    pub fn new(config: GridSearchConfig) -> Self {
        Self { config }
    }

    pub fn with_defaults() -> Self {
        Self::new(GridSearchConfig::default())
    }

    pub fn config(&self) -> &GridSearchConfig {
        &self.config
    }
}

/// One fold's fitting inputs, built from its training rows only.
///
/// Bin edges come from the fold's own training rows, so the held-out rows
/// have no influence on any fit scored against them.
struct FoldData<'a> {
    bins: BinnedMatrix,
    train: Vec<u32>,
    targets: Vec<f64>,
    eval: Vec<&'a [f64]>,
    actual: Vec<f64>,
}

impl<'a> FoldData<'a> {
    fn new(rows: &[&'a [f64]], targets: &[f64], fold: &Fold) -> Self {
        let train_rows: Vec<&[f64]> = fold.train.iter().map(|&i| rows[i]).collect();
        Self {
            bins: BinnedMatrix::from_rows(&train_rows, FEATURE_COUNT, MAX_BINS),
            train: (0..train_rows.len() as u32).collect(),
            targets: fold.train.iter().map(|&i| targets[i]).collect(),
            eval: fold.test.iter().map(|&i| rows[i]).collect(),
            actual: fold.test.iter().map(|&i| targets[i]).collect(),
        }
    }
}

impl HyperparameterOptimizer for GridSearch {
    type Outcome = SearchOutcome;

    fn optimize(&self, data: &Dataset) -> Result<SearchOutcome> {
        self.config.validate()?;
        let k = self.config.cv_folds;
        check_training_data(data, k)?;

        let points = self.config.grid.points();
        let params: Vec<ForestParams> = points
            .iter()
            .map(|p| ForestParams::from_point(p, self.config.seed))
            .collect::<Result<_>>()?;

        let rows = data.feature_rows();
        let targets = data.targets();

        let folds: Vec<FoldData> = KFold::new(k, self.config.seed)
            .splits(data.len())?
            .par_iter()
            .map(|fold| FoldData::new(&rows, &targets, fold))
            .collect();

        tracing::info!(
            points = points.len(),
            folds = k,
            fits = points.len() * k,
            rows = data.len(),
            "starting random forest grid search"
        );

        let jobs: Vec<(usize, usize)> = (0..params.len())
            .flat_map(|p| (0..k).map(move |f| (p, f)))
            .collect();

        let fold_scores: Vec<f64> = jobs
            .par_iter()
            .map(|&(p, f)| {
                let fold = &folds[f];
                let predicted = RandomForestTrainer::new(params[p]).fit_predict(
                    &fold.bins,
                    &fold.train,
                    &fold.targets,
                    &fold.eval,
                )?;
                Ok(-mse(&fold.actual, &predicted))
            })
            .collect::<Result<_>>()?;

        let all_scores: Vec<PointScore> = points
            .iter()
            .zip(fold_scores.chunks(k))
            .map(|(point, scores)| PointScore {
                point: point.clone(),
                mean_score: mean(scores),
                fold_scores: scores.to_vec(),
            })
            .collect();

        let mut best: Option<usize> = None;
        for (idx, score) in all_scores.iter().enumerate() {
            if !score.mean_score.is_finite() {
                return Err(AutoMLError::NumericalError(format!(
                    "non-finite cross-validation score for {}",
                    score.point
                )));
            }
            tracing::debug!(point = %score.point, score = score.mean_score, "grid point scored");
            if best.map_or(true, |b| score.mean_score > all_scores[b].mean_score) {
                best = Some(idx);
            }
        }
        let best = best.ok_or_else(|| AutoMLError::InvalidConfig("empty grid".into()))?;

        let best_point = all_scores[best].point.clone();
        let best_params = params[best];
        let best_score = all_scores[best].mean_score;
        tracing::info!(best = %best_point, score = best_score, "grid search finished; refitting");

        let bins = BinnedMatrix::from_rows(&rows, FEATURE_COUNT, MAX_BINS);
        let all_rows: Vec<u32> = (0..data.len() as u32).collect();
        let forest = RandomForestTrainer::new(best_params).fit_rows(&bins, &all_rows, &targets)?;
        let model = TrainedModel::new(Estimator::RandomForest(forest)).with_hyperparameters(&best_point);

        Ok(SearchOutcome {
            best_point,
            best_params,
            best_score,
            all_scores,
            model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use automl_spi::{HyperparameterGrid, ParamValue};
    use data_spi::{FeatureVector, LabeledExample};

    fn dataset(n: usize) -> Dataset {
        (0..n)
            .map(|i| {
                let x = i as f64 / n as f64;
                let fv = FeatureVector::new([
                    x,
                    (i % 7) as f64,
                    (i % 11) as f64,
                    (i % 13) as f64,
                    ((i * 3) % 17) as f64,
                    ((i * 5) % 19) as f64,
                    (i as f64 * 0.37).sin(),
                    (i as f64 * 0.53).cos(),
                ])
                .unwrap();
                LabeledExample::new(fv, 4.0 * x + 0.1 * (i % 7) as f64)
            })
            .collect()
    }

    fn small_config() -> GridSearchConfig {
        GridSearchConfig::with_grid(
            HyperparameterGrid::new()
                .with_param("n_estimators", vec![ParamValue::Int(5)])
                .with_param("max_depth", vec![ParamValue::Int(1), ParamValue::Int(6)]),
        )
        .cv_folds(3)
    }

    #[test]
    fn test_scores_every_point_in_order() {
        let outcome = GridSearch::new(small_config()).optimize(&dataset(90)).unwrap();
        assert_eq!(outcome.all_scores.len(), 2);
        assert_eq!(outcome.all_scores[0].point.get("max_depth"), Some(ParamValue::Int(1)));
        assert!(outcome.all_scores.iter().all(|s| s.fold_scores.len() == 3));
        assert!(outcome.all_scores.iter().all(|s| s.mean_score <= 0.0));
    }

    #[test]
    fn test_deeper_trees_win_on_smooth_target() {
        let outcome = GridSearch::new(small_config()).optimize(&dataset(120)).unwrap();
        assert_eq!(outcome.best_point.get("max_depth"), Some(ParamValue::Int(6)));
        assert_eq!(outcome.best_params.tree.max_depth, Some(6));
        assert_eq!(outcome.model.hyperparameters()["max_depth"], "6");
    }

    #[test]
    fn test_identical_points_keep_the_first() {
        let config = GridSearchConfig::with_grid(
            HyperparameterGrid::new()
                .with_param("n_estimators", vec![ParamValue::Int(3)])
                .with_param("min_samples_split", vec![ParamValue::Int(2), ParamValue::Int(2)]),
        )
        .cv_folds(2);
        let outcome = GridSearch::new(config).optimize(&dataset(40)).unwrap();
        assert_eq!(outcome.all_scores[0].mean_score, outcome.all_scores[1].mean_score);
        assert_eq!(outcome.best_point, outcome.all_scores[0].point);
    }

    #[test]
    fn test_search_is_deterministic() {
        let a = GridSearch::new(small_config()).optimize(&dataset(60)).unwrap();
        let b = GridSearch::new(small_config()).optimize(&dataset(60)).unwrap();
        assert_eq!(a.all_scores, b.all_scores);
        assert_eq!(a.model, b.model);
    }

    #[test]
    fn test_held_out_rows_do_not_shape_fold_fits() {
        let base = dataset(60);
        let folds = KFold::new(3, 42).splits(base.len()).unwrap();
        let fold = &folds[0];

        // Push one held-out row far outside the training range.
        let held_out = fold.test[0];
        let mut examples = base.examples().to_vec();
        let mut values = *examples[held_out].features.values();
        values[0] = 1e6;
        examples[held_out] = LabeledExample::new(FeatureVector::new(values).unwrap(), 100.0);
        let shifted = Dataset::new(examples);

        let params = ForestParams {
            n_estimators: 8,
            ..ForestParams::default()
        };
        let fit = |data: &Dataset| {
            let rows = data.feature_rows();
            let targets = data.targets();
            let fold_data = FoldData::new(&rows, &targets, fold);
            RandomForestTrainer::new(params)
                .fit_rows(&fold_data.bins, &fold_data.train, &fold_data.targets)
                .unwrap()
        };

        assert_eq!(fit(&base), fit(&shifted));
    }

    #[test]
    fn test_fewer_rows_than_folds() {
        let result = GridSearch::new(small_config().cv_folds(5)).optimize(&dataset(40).subset(&[0, 1, 2, 3]));
        assert!(matches!(result, Err(AutoMLError::InsufficientData { .. })));
    }

    #[test]
    fn test_bad_grid_fails_before_fitting() {
        let config = GridSearchConfig::with_grid(
            HyperparameterGrid::new().with_param("learning_rate", vec![ParamValue::Float(0.1)]),
        );
        assert!(matches!(
            GridSearch::new(config).optimize(&dataset(40)),
            Err(AutoMLError::InvalidParameter { .. })
        ));
    }
}
