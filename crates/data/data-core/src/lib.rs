//! Housing Data Core
//!
//! Implementations for the dataset collaborator of the training pipeline:
//! - [`CsvDatasetStore`]: the CSV artifact format (header row, values exact to 17 significant digits)
//! - [`train_test_split`]: deterministic seeded two-way partitioning

pub mod csv_store;
pub mod split;

pub use csv_store::{format_significant, max_abs_difference, CsvDatasetStore, SIGNIFICANT_DIGITS};
pub use split::{split_indices, train_test_split, Split};

// Re-export SPI for convenience
pub use data_spi::{
    DataError, Dataset, DatasetStore, FeatureVector, LabeledExample, Result, FEATURE_COUNT,
    FEATURE_NAMES, TARGET_NAME,
};
