//! Fixed-arity feature vector for the California housing data.

use serde::{Deserialize, Serialize};

use crate::error::{DataError, Result};

/// Number of input features.
pub const FEATURE_COUNT: usize = 8;

/// Feature names, in the order every model is trained and served with.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "MedInc",
    "HouseAge",
    "AveRooms",
    "AveBedrms",
    "Population",
    "AveOccup",
    "Latitude",
    "Longitude",
];

/// An ordered, finite feature vector.
///
/// Values are always laid out as in [`FEATURE_NAMES`]; construction rejects
/// the wrong arity and any NaN or infinite value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Create a feature vector, validating that every value is finite.
    pub fn new(values: [f64; FEATURE_COUNT]) -> Result<Self> {
        if let Some(idx) = values.iter().position(|v| !v.is_finite()) {
            return Err(DataError::NonFinite {
                field: FEATURE_NAMES[idx].to_string(),
            });
        }
        Ok(Self(values))
    }

    /// Create a feature vector from a slice of exactly [`FEATURE_COUNT`] values.
    pub fn from_slice(values: &[f64]) -> Result<Self> {
        let array: [f64; FEATURE_COUNT] =
            values.try_into().map_err(|_| DataError::FeatureCount {
                expected: FEATURE_COUNT,
                actual: values.len(),
            })?;
        Self::new(array)
    }

    /// Values in canonical order.
    pub fn values(&self) -> &[f64; FEATURE_COUNT] {
        &self.0
    }

    /// Values as a slice.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Look up a value by feature name.
    pub fn get(&self, name: &str) -> Option<f64> {
        FEATURE_NAMES
            .iter()
            .position(|n| *n == name)
            .map(|idx| self.0[idx])
    }

    /// Iterate `(name, value)` pairs in canonical order.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl TryFrom<&[f64]> for FeatureVector {
    type Error = DataError;

    fn try_from(values: &[f64]) -> Result<Self> {
        Self::from_slice(values)
    }
}

impl AsRef<[f64]> for FeatureVector {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> [f64; FEATURE_COUNT] {
        [8.3252, 41.0, 6.98, 1.02, 322.0, 2.55, 37.88, -122.23]
    }

    #[test]
    fn test_new_accepts_finite_values() {
        let fv = FeatureVector::new(sample()).unwrap();
        assert_eq!(fv.values(), &sample());
    }

    #[test]
    fn test_new_rejects_nan() {
        let mut values = sample();
        values[4] = f64::NAN;
        match FeatureVector::new(values) {
            Err(DataError::NonFinite { field }) => assert_eq!(field, "Population"),
            other => panic!("Expected NonFinite, got {:?}", other),
        }
    }

    #[test]
    fn test_new_rejects_infinity() {
        let mut values = sample();
        values[0] = f64::INFINITY;
        assert!(FeatureVector::new(values).is_err());
    }

    #[test]
    fn test_from_slice_wrong_arity() {
        match FeatureVector::from_slice(&[1.0, 2.0, 3.0]) {
            Err(DataError::FeatureCount { expected, actual }) => {
                assert_eq!(expected, 8);
                assert_eq!(actual, 3);
            }
            other => panic!("Expected FeatureCount, got {:?}", other),
        }
    }

    #[test]
    fn test_get_by_name() {
        let fv = FeatureVector::new(sample()).unwrap();
        assert_eq!(fv.get("Latitude"), Some(37.88));
        assert_eq!(fv.get("Longitude"), Some(-122.23));
        assert_eq!(fv.get("MedHouseVal"), None);
    }

    #[test]
    fn test_named_preserves_order() {
        let fv = FeatureVector::new(sample()).unwrap();
        let names: Vec<&str> = fv.named().map(|(n, _)| n).collect();
        assert_eq!(names, FEATURE_NAMES.to_vec());
    }
}
