//! Fitted tree ensembles.
//!
//! Trees are stored as flat node vectors. Child indices always point forward,
//! so a valid tree is acyclic and the root is node 0.

use serde::{Deserialize, Serialize};

use crate::contract::Regressor;
use crate::model::ModelFamily;

/// A node of a regression tree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TreeNode {
    Leaf {
        value: f64,
    },
    /// Rows with `x[feature] <= threshold` go left.
    Split {
        feature: u32,
        threshold: f64,
        left: u32,
        right: u32,
    },
}

/// A binary regression tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegressionTree {
    nodes: Vec<TreeNode>,
}

impl RegressionTree {
    pub fn new(nodes: Vec<TreeNode>) -> Self {
        Self { nodes }
    }

    /// A single-leaf tree.
    pub fn constant(value: f64) -> Self {
        Self {
            nodes: vec![TreeNode::Leaf { value }],
        }
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, TreeNode::Leaf { .. }))
            .count()
    }

    /// Length of the longest root-to-leaf path, in edges.
    pub fn depth(&self) -> usize {
        let mut depths = vec![0usize; self.nodes.len()];
        let mut max_depth = 0;
        for (idx, node) in self.nodes.iter().enumerate() {
            if let TreeNode::Split { left, right, .. } = node {
                let child_depth = depths[idx] + 1;
                for child in [*left as usize, *right as usize] {
                    if let Some(d) = depths.get_mut(child) {
                        *d = child_depth;
                    }
                }
                max_depth = max_depth.max(child_depth);
            }
        }
        max_depth
    }

    /// Walk from the root to a leaf.
    ///
    /// Returns NaN when the walk leaves the node array, which only happens
    /// for trees that fail [`RegressionTree::validate`].
    pub fn predict_row(&self, row: &[f64]) -> f64 {
        let mut idx = 0usize;
        for _ in 0..=self.nodes.len() {
            match self.nodes.get(idx) {
                Some(TreeNode::Leaf { value }) => return *value,
                Some(TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                }) => {
                    let x = row.get(*feature as usize).copied().unwrap_or(f64::NAN);
                    idx = if x <= *threshold { *left } else { *right } as usize;
                }
                None => return f64::NAN,
            }
        }
        f64::NAN
    }

    /// Check structural soundness against a feature count.
    pub fn validate(&self, n_features: usize) -> std::result::Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        let len = self.nodes.len();
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("leaf {} has non-finite value", idx));
                    }
                }
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if *feature as usize >= n_features {
                        return Err(format!(
                            "node {} splits on feature {} of {}",
                            idx, feature, n_features
                        ));
                    }
                    if threshold.is_nan() {
                        return Err(format!("node {} has NaN threshold", idx));
                    }
                    for child in [*left as usize, *right as usize] {
                        if child <= idx || child >= len {
                            return Err(format!("node {} has invalid child {}", idx, child));
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

/// Bagged regression trees; the prediction is the mean over trees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forest {
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl Forest {
    pub fn new(trees: Vec<RegressionTree>, n_features: usize) -> Self {
        Self { trees, n_features }
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    pub fn n_trees(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for Forest {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        if self.trees.is_empty() {
            return f64::NAN;
        }
        let sum: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
        sum / self.trees.len() as f64
    }
}

/// Additive boosted trees: `base_score + learning_rate * sum(tree(x))`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostedEnsemble {
    base_score: f64,
    learning_rate: f64,
    trees: Vec<RegressionTree>,
    n_features: usize,
}

impl BoostedEnsemble {
    pub fn new(base_score: f64, learning_rate: f64, n_features: usize) -> Self {
        Self {
            base_score,
            learning_rate,
            trees: Vec::new(),
            n_features,
        }
    }

    pub fn push(&mut self, tree: RegressionTree) {
        self.trees.push(tree);
    }

    /// Keep only the first `n_rounds` trees.
    pub fn truncate(&mut self, n_rounds: usize) {
        self.trees.truncate(n_rounds);
    }

    pub fn base_score(&self) -> f64 {
        self.base_score
    }

    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    pub fn trees(&self) -> &[RegressionTree] {
        &self.trees
    }

    pub fn n_rounds(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for BoostedEnsemble {
    fn n_features(&self) -> usize {
        self.n_features
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.predict_row(row)).sum();
        self.base_score + self.learning_rate * sum
    }
}

/// A fitted estimator of either supported family.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Estimator {
    RandomForest(Forest),
    GradientBoosting(BoostedEnsemble),
}

impl Estimator {
    pub fn family(&self) -> ModelFamily {
        match self {
            Estimator::RandomForest(_) => ModelFamily::RandomForest,
            Estimator::GradientBoosting(_) => ModelFamily::GradientBoosting,
        }
    }

    pub fn trees(&self) -> &[RegressionTree] {
        match self {
            Estimator::RandomForest(f) => f.trees(),
            Estimator::GradientBoosting(b) => b.trees(),
        }
    }

    /// Structural check of every tree and of the ensemble parameters.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let n_features = self.n_features();
        match self {
            Estimator::RandomForest(f) => {
                if f.trees.is_empty() {
                    return Err("forest has no trees".into());
                }
            }
            Estimator::GradientBoosting(b) => {
                if !b.base_score.is_finite() || !b.learning_rate.is_finite() {
                    return Err("boosted ensemble has non-finite parameters".into());
                }
            }
        }
        for (i, tree) in self.trees().iter().enumerate() {
            tree.validate(n_features)
                .map_err(|e| format!("tree {}: {}", i, e))?;
        }
        Ok(())
    }
}

impl Regressor for Estimator {
    fn n_features(&self) -> usize {
        match self {
            Estimator::RandomForest(f) => f.n_features(),
            Estimator::GradientBoosting(b) => b.n_features(),
        }
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        match self {
            Estimator::RandomForest(f) => f.predict_row(row),
            Estimator::GradientBoosting(b) => b.predict_row(row),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stump(threshold: f64, left: f64, right: f64) -> RegressionTree {
        RegressionTree::new(vec![
            TreeNode::Split {
                feature: 0,
                threshold,
                left: 1,
                right: 2,
            },
            TreeNode::Leaf { value: left },
            TreeNode::Leaf { value: right },
        ])
    }

    #[test]
    fn test_tree_routes_on_threshold() {
        let tree = stump(1.0, -1.0, 1.0);
        assert_eq!(tree.predict_row(&[0.5]), -1.0);
        assert_eq!(tree.predict_row(&[1.0]), -1.0);
        assert_eq!(tree.predict_row(&[1.5]), 1.0);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.n_leaves(), 2);
    }

    #[test]
    fn test_validate_rejects_backward_child() {
        let tree = RegressionTree::new(vec![
            TreeNode::Split {
                feature: 0,
                threshold: 0.0,
                left: 0,
                right: 1,
            },
            TreeNode::Leaf { value: 1.0 },
        ]);
        assert!(tree.validate(1).is_err());
        // Cyclic trees terminate with NaN instead of looping.
        assert!(tree.predict_row(&[-1.0]).is_nan());
    }

    #[test]
    fn test_validate_rejects_unknown_feature() {
        assert!(stump(0.0, 1.0, 2.0).validate(0).is_err());
        assert!(stump(0.0, 1.0, 2.0).validate(1).is_ok());
    }

    #[test]
    fn test_forest_averages_trees() {
        let forest = Forest::new(vec![stump(0.0, 1.0, 3.0), RegressionTree::constant(5.0)], 1);
        assert_eq!(forest.predict_row(&[-1.0]), 3.0);
        assert_eq!(forest.predict_row(&[1.0]), 4.0);
    }

    #[test]
    fn test_boosted_ensemble_is_additive() {
        let mut model = BoostedEnsemble::new(2.0, 0.5, 1);
        model.push(stump(0.0, -2.0, 2.0));
        model.push(RegressionTree::constant(1.0));
        assert_eq!(model.predict_row(&[1.0]), 2.0 + 0.5 * 3.0);

        model.truncate(1);
        assert_eq!(model.n_rounds(), 1);
        assert_eq!(model.predict_row(&[1.0]), 3.0);
    }

    #[test]
    fn test_empty_forest_is_invalid() {
        let est = Estimator::RandomForest(Forest::new(vec![], 8));
        assert!(est.validate().is_err());
    }
}
