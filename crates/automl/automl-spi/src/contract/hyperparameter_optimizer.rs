//! Hyperparameter optimization trait for AutoML.

use data_spi::Dataset;

use crate::Result;

/// Trait for hyperparameter optimizers.
pub trait HyperparameterOptimizer {
    /// The search outcome, including the refit estimator.
    type Outcome;

    /// Search the configured space on `data` and return the best configuration.
    fn optimize(&self, data: &Dataset) -> Result<Self::Outcome>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AutoMLError;
    use data_spi::DataError;

    struct RowCounter;

    impl HyperparameterOptimizer for RowCounter {
        type Outcome = usize;

        fn optimize(&self, data: &Dataset) -> Result<usize> {
            if data.is_empty() {
                return Err(DataError::Empty.into());
            }
            Ok(data.len())
        }
    }

    #[test]
    fn test_optimizer_errors_are_automl_errors() {
        let result: std::result::Result<usize, AutoMLError> = RowCounter.optimize(&Dataset::default());
        assert!(matches!(result, Err(AutoMLError::Data(DataError::Empty))));
    }
}
