//! AutoML Consumer API
//!
//! Configuration types for the training pipeline: the random forest search
//! space, the boosted candidate, and the partitioning seed and ratios.

use std::path::Path;

use serde::{Deserialize, Serialize};

// Re-export SPI types
pub use automl_spi::{
    AutoMLError, Candidate, HyperparameterGrid, HyperparameterOptimizer, ModelFamily,
    ModelSelector, ParamPoint, ParamValue, Regressor, Result, SelectedSlot, SelectionResult,
    TieBreakPolicy, TrainedModel,
};

/// Default value of both pipeline seeds.
///
/// A training run has two independent seeds: [`TrainingConfig::seed`] for the
/// fit/validation split and [`GridSearchConfig::seed`] for fold assignment
/// and bootstrap sampling. Setting one does not change the other.
pub const DEFAULT_SEED: u64 = 42;

/// Growth limits for a single regression tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Maximum depth; `None` grows until leaves are pure or too small.
    pub max_depth: Option<usize>,
    /// Minimum rows a node needs to be considered for splitting.
    pub min_samples_split: usize,
    /// Minimum rows on each side of a split.
    pub min_samples_leaf: usize,
    /// Maximum leaves, grown best-first; `None` for no limit.
    pub max_leaves: Option<usize>,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_leaves: None,
        }
    }
}

impl TreeParams {
    pub fn max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn min_samples_split(mut self, n: usize) -> Self {
        self.min_samples_split = n;
        self
    }

    pub fn min_samples_leaf(mut self, n: usize) -> Self {
        self.min_samples_leaf = n;
        self
    }

    pub fn max_leaves(mut self, n: Option<usize>) -> Self {
        self.max_leaves = n;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_depth == Some(0) {
            return Err(invalid("max_depth", "must be a positive integer or null"));
        }
        if self.min_samples_split < 2 {
            return Err(invalid("min_samples_split", "must be at least 2"));
        }
        if self.min_samples_leaf < 1 {
            return Err(invalid("min_samples_leaf", "must be at least 1"));
        }
        if matches!(self.max_leaves, Some(n) if n < 2) {
            return Err(invalid("max_leaves", "must be at least 2 or null"));
        }
        Ok(())
    }
}

/// Random forest hyperparameters for one grid point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForestParams {
    pub n_estimators: usize,
    pub tree: TreeParams,
    pub seed: u64,
}

impl Default for ForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            tree: TreeParams::default(),
            seed: DEFAULT_SEED,
        }
    }
}

impl ForestParams {
    /// Parameter names accepted in a random forest grid.
    pub const PARAMETERS: [&'static str; 4] = [
        "max_depth",
        "min_samples_leaf",
        "min_samples_split",
        "n_estimators",
    ];

    /// Build forest parameters from a grid point; unnamed parameters keep their defaults.
    pub fn from_point(point: &ParamPoint, seed: u64) -> Result<Self> {
        let mut params = Self {
            seed,
            ..Self::default()
        };
        for (name, value) in point.iter() {
            params.apply(name, value)?;
        }
        params.validate()?;
        Ok(params)
    }

    fn apply(&mut self, name: &str, value: ParamValue) -> Result<()> {
        match name {
            "n_estimators" => {
                self.n_estimators = positive(name, value)?;
            }
            "max_depth" => {
                self.tree.max_depth = if value.is_none() {
                    None
                } else {
                    Some(positive(name, value)?)
                };
            }
            "min_samples_split" => {
                self.tree.min_samples_split = positive(name, value)?;
            }
            "min_samples_leaf" => {
                self.tree.min_samples_leaf = positive(name, value)?;
            }
            _ => return Err(invalid(name, "unknown random forest parameter")),
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.n_estimators == 0 {
            return Err(invalid("n_estimators", "must be at least 1"));
        }
        self.tree.validate()
    }
}

fn positive(name: &str, value: ParamValue) -> Result<usize> {
    match value.as_usize() {
        Some(v) if v > 0 => Ok(v),
        _ => Err(invalid(
            name,
            &format!("expected a positive integer, got {}", value),
        )),
    }
}

fn invalid(name: &str, reason: &str) -> AutoMLError {
    AutoMLError::InvalidParameter {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

/// Configuration for the random forest grid search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSearchConfig {
    /// Search space
    pub grid: HyperparameterGrid,
    /// Number of cross-validation folds
    pub cv_folds: usize,
    /// Seed for fold assignment and bootstrap sampling
    pub seed: u64,
}

impl Default for GridSearchConfig {
    fn default() -> Self {
        Self {
            grid: Self::default_grid(),
            cv_folds: 5,
            seed: DEFAULT_SEED,
        }
    }
}

impl GridSearchConfig {
    /// The 27-point random forest grid.
    pub fn default_grid() -> HyperparameterGrid {
        HyperparameterGrid::new()
            .with_param(
                "n_estimators",
                vec![
                    ParamValue::Int(100),
                    ParamValue::Int(200),
                    ParamValue::Int(300),
                ],
            )
            .with_param(
                "max_depth",
                vec![ParamValue::Int(10), ParamValue::Int(20), ParamValue::None],
            )
            .with_param(
                "min_samples_split",
                vec![ParamValue::Int(2), ParamValue::Int(5), ParamValue::Int(10)],
            )
    }

    /// Create a configuration searching the given grid
    pub fn with_grid(grid: HyperparameterGrid) -> Self {
        Self {
            grid,
            ..Default::default()
        }
    }

    /// Set the number of cross-validation folds
    pub fn cv_folds(mut self, folds: usize) -> Self {
        self.cv_folds = folds;
        self
    }

    /// Set the seed
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check the fold count and every grid value before any fitting starts.
    pub fn validate(&self) -> Result<()> {
        if self.cv_folds < 2 {
            return Err(AutoMLError::InvalidConfig(format!(
                "cv_folds must be >= 2, got {}",
                self.cv_folds
            )));
        }
        self.grid.validate()?;
        for name in self.grid.names() {
            let values = self.grid.values(name).unwrap_or_default();
            for value in values {
                ForestParams::default().apply(name, *value)?;
            }
        }
        for point in self.grid.points() {
            ForestParams::from_point(&point, self.seed)?;
        }
        Ok(())
    }
}

/// Configuration for the gradient boosted candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoostingConfig {
    /// Upper bound on boosting rounds
    pub max_rounds: usize,
    /// Shrinkage applied to every tree
    pub learning_rate: f64,
    /// Rounds without improvement before stopping
    pub patience: usize,
    /// Per-round tree limits
    pub tree: TreeParams,
}

impl Default for BoostingConfig {
    fn default() -> Self {
        Self {
            max_rounds: 1000,
            learning_rate: 0.05,
            patience: 50,
            tree: TreeParams {
                max_depth: Some(10),
                min_samples_split: 2,
                min_samples_leaf: 20,
                max_leaves: Some(31),
            },
        }
    }
}

impl BoostingConfig {
    pub fn max_rounds(mut self, rounds: usize) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn learning_rate(mut self, rate: f64) -> Self {
        self.learning_rate = rate;
        self
    }

    pub fn patience(mut self, patience: usize) -> Self {
        self.patience = patience;
        self
    }

    pub fn tree(mut self, tree: TreeParams) -> Self {
        self.tree = tree;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_rounds == 0 {
            return Err(invalid("max_rounds", "must be at least 1"));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(invalid("learning_rate", "must be a positive finite number"));
        }
        if self.patience == 0 {
            return Err(invalid("patience", "must be at least 1"));
        }
        self.tree.validate()
    }
}

/// Configuration for a full training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Portion of the training file held out for validation
    pub validation_ratio: f64,
    /// Seed for the fit/validation split only. Folds and bootstrap samples
    /// use `search.seed`.
    pub seed: u64,
    /// Random forest search
    pub search: GridSearchConfig,
    /// Boosted candidate
    pub boosting: BoostingConfig,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            validation_ratio: 0.2,
            seed: DEFAULT_SEED,
            search: GridSearchConfig::default(),
            boosting: BoostingConfig::default(),
        }
    }
}

impl TrainingConfig {
    /// Load a configuration from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            AutoMLError::InvalidConfig(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|e| {
            AutoMLError::InvalidConfig(format!("cannot parse {}: {}", path.display(), e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validation_ratio(mut self, ratio: f64) -> Self {
        self.validation_ratio = ratio;
        self
    }

    /// Set the fit/validation split seed.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn search(mut self, search: GridSearchConfig) -> Self {
        self.search = search;
        self
    }

    pub fn boosting(mut self, boosting: BoostingConfig) -> Self {
        self.boosting = boosting;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.validation_ratio > 0.0 && self.validation_ratio < 1.0) {
            return Err(AutoMLError::InvalidConfig(format!(
                "validation_ratio must be in (0, 1), got {}",
                self.validation_ratio
            )));
        }
        self.search.validate()?;
        self.boosting.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_grid_has_27_points() {
        let config = GridSearchConfig::default();
        assert_eq!(config.grid.len(), 27);
        assert_eq!(config.cv_folds, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_forest_params_from_point() {
        let point = ParamPoint::new()
            .with("n_estimators", ParamValue::Int(200))
            .with("max_depth", ParamValue::None)
            .with("min_samples_split", ParamValue::Int(5));
        let params = ForestParams::from_point(&point, 7).unwrap();
        assert_eq!(params.n_estimators, 200);
        assert_eq!(params.tree.max_depth, None);
        assert_eq!(params.tree.min_samples_split, 5);
        assert_eq!(params.tree.min_samples_leaf, 1);
        assert_eq!(params.seed, 7);
    }

    #[test]
    fn test_unknown_parameter_is_rejected() {
        let point = ParamPoint::new().with("max_features", ParamValue::Float(0.5));
        match ForestParams::from_point(&point, 0) {
            Err(AutoMLError::InvalidParameter { name, .. }) => assert_eq!(name, "max_features"),
            other => panic!("Expected InvalidParameter, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_value_type_is_rejected() {
        let config = GridSearchConfig::with_grid(
            HyperparameterGrid::new().with_param("n_estimators", vec![ParamValue::Float(1.5)]),
        );
        assert!(matches!(
            config.validate(),
            Err(AutoMLError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_min_samples_split_below_two_is_rejected() {
        let config = GridSearchConfig::with_grid(
            HyperparameterGrid::new().with_param("min_samples_split", vec![ParamValue::Int(1)]),
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_single_fold_is_rejected() {
        let config = GridSearchConfig::default().cv_folds(1);
        assert!(matches!(config.validate(), Err(AutoMLError::InvalidConfig(_))));
    }

    #[test]
    fn test_boosting_defaults() {
        let config = BoostingConfig::default();
        assert_eq!(config.max_rounds, 1000);
        assert_eq!(config.learning_rate, 0.05);
        assert_eq!(config.patience, 50);
        assert_eq!(config.tree.max_depth, Some(10));
        assert_eq!(config.tree.min_samples_leaf, 20);
        assert!(config.patience(0).validate().is_err());
    }

    #[test]
    fn test_training_config_partial_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training.json");
        std::fs::write(
            &path,
            r#"{"seed": 7, "search": {"cv_folds": 3, "grid": {"n_estimators": [10], "max_depth": [null, 4]}}}"#,
        )
        .unwrap();

        let config = TrainingConfig::from_json_file(&path).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.validation_ratio, 0.2);
        assert_eq!(config.search.cv_folds, 3);
        assert_eq!(config.search.grid.len(), 2);
        assert_eq!(config.boosting, BoostingConfig::default());
    }

    #[test]
    fn test_split_and_search_seeds_are_independent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training.json");

        std::fs::write(&path, r#"{"seed": 7}"#).unwrap();
        let config = TrainingConfig::from_json_file(&path).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.search.seed, DEFAULT_SEED);

        std::fs::write(&path, r#"{"seed": 7, "search": {"seed": 11}}"#).unwrap();
        let config = TrainingConfig::from_json_file(&path).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.search.seed, 11);
    }

    #[test]
    fn test_training_config_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("training.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            TrainingConfig::from_json_file(&path),
            Err(AutoMLError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validation_ratio_bounds() {
        assert!(TrainingConfig::default().validation_ratio(0.0).validate().is_err());
        assert!(TrainingConfig::default().validation_ratio(0.5).validate().is_ok());
    }
}
