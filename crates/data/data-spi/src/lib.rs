//! Housing Data Service Provider Interface
//!
//! Defines the tabular types shared by every stage of the pipeline:
//!
//! - [`FeatureVector`]: the fixed, ordered 8-field feature layout
//! - [`LabeledExample`] / [`Dataset`]: features plus the `MedHouseVal` target
//! - [`DatasetStore`]: persistence contract implemented in `data-core`
//! - [`DataError`]: errors for malformed or missing data

pub mod contract;
pub mod error;
pub mod model;

// Re-export all public items at crate root for convenience
pub use contract::DatasetStore;
pub use error::{DataError, Result};
pub use model::{
    Dataset, FeatureVector, LabeledExample, FEATURE_COUNT, FEATURE_NAMES, TARGET_NAME,
};
