//! Model module containing the housing data structures.
//!
//! - [`FeatureVector`] - the fixed 8-field feature layout
//! - [`LabeledExample`] - features plus target
//! - [`Dataset`] - ordered collection of examples

mod dataset;
mod feature_vector;

pub use dataset::{Dataset, LabeledExample, TARGET_NAME};
pub use feature_vector::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
