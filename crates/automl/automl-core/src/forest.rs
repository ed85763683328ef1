//! Random forest regression.
//!
//! Every tree is grown on its own bootstrap sample, drawn from an RNG seeded
//! with the forest seed and the tree index, so fits are reproducible no
//! matter how rayon schedules the trees.

use automl_api::ForestParams;
use automl_spi::{AutoMLError, Estimator, Forest, RegressionTree, Result, TrainedModel};
use data_spi::{Dataset, FEATURE_COUNT};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::binning::{BinnedMatrix, MAX_BINS};
use crate::tree::TreeGrower;

/// Fits bagged regression trees.
#[derive(Debug, Clone, Copy)]
pub struct RandomForestTrainer {
    params: ForestParams,
}

impl RandomForestTrainer {
    pub fn new(params: ForestParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ForestParams {
        &self.params
    }

    /// Fit on a whole dataset.
    pub fn fit(&self, dataset: &Dataset) -> Result<TrainedModel> {
        let rows = dataset.feature_rows();
        let targets = dataset.targets();
        let bins = BinnedMatrix::from_rows(&rows, FEATURE_COUNT, MAX_BINS);
        let sample: Vec<u32> = (0..rows.len() as u32).collect();

        let forest = self.fit_rows(&bins, &sample, &targets)?;
        Ok(TrainedModel::new(Estimator::RandomForest(forest)))
    }

    /// Fit on the matrix rows listed in `rows`.
    pub fn fit_rows(&self, bins: &BinnedMatrix, rows: &[u32], targets: &[f64]) -> Result<Forest> {
        self.check(rows)?;
        let trees: Vec<RegressionTree> = (0..self.params.n_estimators)
            .into_par_iter()
            .map(|t| self.grow_tree(bins, rows, targets, t))
            .collect();

        tracing::debug!(
            trees = trees.len(),
            rows = rows.len(),
            "fitted random forest"
        );
        Ok(Forest::new(trees, bins.n_features()))
    }

    /// Fit on `rows` and predict `eval` without keeping the trees.
    ///
    /// Equivalent to `fit_rows` followed by prediction, but holds at most
    /// one tree per worker thread at a time.
    pub fn fit_predict(
        &self,
        bins: &BinnedMatrix,
        rows: &[u32],
        targets: &[f64],
        eval: &[&[f64]],
    ) -> Result<Vec<f64>> {
        self.check(rows)?;
        let n_trees = self.params.n_estimators;

        let sums = (0..n_trees)
            .into_par_iter()
            .map(|t| {
                let tree = self.grow_tree(bins, rows, targets, t);
                eval.iter().map(|row| tree.predict_row(row)).collect::<Vec<f64>>()
            })
            .reduce(
                || vec![0.0; eval.len()],
                |mut acc, preds| {
                    acc.iter_mut().zip(preds).for_each(|(a, p)| *a += p);
                    acc
                },
            );

        Ok(sums.into_iter().map(|s| s / n_trees as f64).collect())
    }

    fn check(&self, rows: &[u32]) -> Result<()> {
        if rows.is_empty() {
            return Err(AutoMLError::InsufficientData {
                required: 1,
                actual: 0,
            });
        }
        self.params.validate()
    }

    fn grow_tree(&self, bins: &BinnedMatrix, rows: &[u32], targets: &[f64], t: usize) -> RegressionTree {
        let mut rng = StdRng::seed_from_u64(tree_seed(self.params.seed, t));
        let mut sample: Vec<u32> = (0..rows.len())
            .map(|_| rows[rng.gen_range(0..rows.len())])
            .collect();
        TreeGrower::new(bins, self.params.tree).grow(&mut sample, targets)
    }
}

fn tree_seed(seed: u64, tree: usize) -> u64 {
    seed.wrapping_add((tree as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15))
}

#[cfg(test)]
mod tests {
    use super::*;
    use automl_api::TreeParams;
    use automl_spi::Regressor;
    use data_spi::{FeatureVector, LabeledExample};

    fn linear_dataset(n: usize) -> Dataset {
        (0..n)
            .map(|i| {
                let x = i as f64 / n as f64;
                let fv = FeatureVector::new([x, 1.0 - x, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap();
                LabeledExample::new(fv, 3.0 * x)
            })
            .collect()
    }

    fn params(n_estimators: usize, seed: u64) -> ForestParams {
        ForestParams {
            n_estimators,
            tree: TreeParams::default().max_depth(Some(6)),
            seed,
        }
    }

    #[test]
    fn test_forest_is_deterministic_for_seed() {
        let ds = linear_dataset(200);
        let a = RandomForestTrainer::new(params(8, 42)).fit(&ds).unwrap();
        let b = RandomForestTrainer::new(params(8, 42)).fit(&ds).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_forest_learns_linear_trend() {
        let ds = linear_dataset(300);
        let model = RandomForestTrainer::new(params(20, 1)).fit(&ds).unwrap();
        let low = model.predict(&[0.1, 0.9, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap();
        let high = model.predict(&[0.9, 0.1, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0]).unwrap();
        assert!((low - 0.3).abs() < 0.2, "low = {low}");
        assert!((high - 2.7).abs() < 0.2, "high = {high}");
        assert_eq!(model.estimator().n_features(), FEATURE_COUNT);
    }

    #[test]
    fn test_fit_predict_matches_fit_rows() {
        let ds = linear_dataset(120);
        let rows = ds.feature_rows();
        let targets = ds.targets();
        let bins = BinnedMatrix::from_rows(&rows, FEATURE_COUNT, MAX_BINS);
        let train: Vec<u32> = (0..100).collect();
        let eval: Vec<&[f64]> = rows[100..].to_vec();

        let trainer = RandomForestTrainer::new(params(5, 9));
        let forest = trainer.fit_rows(&bins, &train, &targets).unwrap();
        let expected = forest.predict_rows(&eval);
        let actual = trainer.fit_predict(&bins, &train, &targets, &eval).unwrap();
        for (e, a) in expected.iter().zip(&actual) {
            assert!((e - a).abs() < 1e-9);
        }
    }

    #[test]
    fn test_empty_rows_rejected() {
        let ds = linear_dataset(10);
        let rows = ds.feature_rows();
        let bins = BinnedMatrix::from_rows(&rows, FEATURE_COUNT, MAX_BINS);
        let result = RandomForestTrainer::new(params(3, 0)).fit_rows(&bins, &[], &ds.targets());
        assert!(matches!(result, Err(AutoMLError::InsufficientData { .. })));
    }
}
