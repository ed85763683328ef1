//! Error module containing AutoML error types.
//!
//! This module defines error types for training, search and inference.

mod automl_error;

pub use automl_error::AutoMLError;
