//! Labeled examples and datasets.

use serde::{Deserialize, Serialize};

use super::FeatureVector;

/// Name of the target column.
pub const TARGET_NAME: &str = "MedHouseVal";

/// A feature vector with its observed target (`MedHouseVal`, units of $100,000).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabeledExample {
    pub features: FeatureVector,
    pub target: f64,
}

impl LabeledExample {
    pub fn new(features: FeatureVector, target: f64) -> Self {
        Self { features, target }
    }
}

/// An ordered collection of labeled examples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    examples: Vec<LabeledExample>,
}

impl Dataset {
    pub fn new(examples: Vec<LabeledExample>) -> Self {
        Self { examples }
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn examples(&self) -> &[LabeledExample] {
        &self.examples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledExample> {
        self.examples.iter()
    }

    pub fn push(&mut self, example: LabeledExample) {
        self.examples.push(example);
    }

    /// Feature rows in dataset order.
    pub fn feature_rows(&self) -> Vec<&[f64]> {
        self.examples.iter().map(|e| e.features.as_slice()).collect()
    }

    /// Targets in dataset order.
    pub fn targets(&self) -> Vec<f64> {
        self.examples.iter().map(|e| e.target).collect()
    }

    /// Build a new dataset from the rows at `indices`, in the given order.
    ///
    /// Indices out of range are skipped.
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        indices
            .iter()
            .filter_map(|&i| self.examples.get(i).copied())
            .collect()
    }
}

impl FromIterator<LabeledExample> for Dataset {
    fn from_iter<I: IntoIterator<Item = LabeledExample>>(iter: I) -> Self {
        Self {
            examples: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a LabeledExample;
    type IntoIter = std::slice::Iter<'a, LabeledExample>;

    fn into_iter(self) -> Self::IntoIter {
        self.examples.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(seed: f64) -> LabeledExample {
        let fv = FeatureVector::new([seed, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0]).unwrap();
        LabeledExample::new(fv, seed * 0.5)
    }

    #[test]
    fn test_dataset_targets_and_rows() {
        let ds: Dataset = (0..4).map(|i| example(i as f64)).collect();
        assert_eq!(ds.len(), 4);
        assert_eq!(ds.targets(), vec![0.0, 0.5, 1.0, 1.5]);
        assert_eq!(ds.feature_rows()[2][0], 2.0);
    }

    #[test]
    fn test_subset_preserves_requested_order() {
        let ds: Dataset = (0..5).map(|i| example(i as f64)).collect();
        let sub = ds.subset(&[4, 0, 2]);
        assert_eq!(sub.targets(), vec![2.0, 0.0, 1.0]);
    }

    #[test]
    fn test_subset_skips_out_of_range() {
        let ds: Dataset = (0..2).map(|i| example(i as f64)).collect();
        assert_eq!(ds.subset(&[0, 9]).len(), 1);
    }

    #[test]
    fn test_empty_dataset() {
        let ds = Dataset::default();
        assert!(ds.is_empty());
        assert!(ds.targets().is_empty());
    }
}
