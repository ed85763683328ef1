//! Data error types.

use thiserror::Error;

/// Errors raised while reading, validating or partitioning housing data.
#[derive(Debug, Error)]
pub enum DataError {
    /// Underlying file could not be read or written
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid CSV
    #[error("Parse error: {0}")]
    ParseError(String),

    /// A required column is absent from the header row
    #[error("Missing column '{0}'")]
    MissingColumn(String),

    /// A cell could not be parsed as a number
    #[error("Invalid value '{value}' in column '{column}' at row {row}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
    },

    /// A feature vector has the wrong arity
    #[error("Invalid number of features: expected {expected}, got {actual}")]
    FeatureCount { expected: usize, actual: usize },

    /// A value is NaN or infinite
    #[error("Non-finite value in field '{field}'")]
    NonFinite { field: String },

    /// Not enough rows for the requested operation
    #[error("Insufficient rows: need at least {required}, got {actual}")]
    InsufficientRows { required: usize, actual: usize },

    /// Split ratio outside (0, 1)
    #[error("Invalid split ratio {0}: must be strictly between 0 and 1")]
    InvalidRatio(f64),

    /// No data rows
    #[error("Dataset is empty")]
    Empty,
}

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;
