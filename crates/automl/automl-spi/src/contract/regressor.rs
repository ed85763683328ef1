//! Regressor trait for row-wise inference.

/// A fitted regression model over a fixed-width feature row.
///
/// Implementations are immutable after fitting and may be shared across
/// threads for concurrent inference.
pub trait Regressor: Send + Sync {
    /// Number of features each row must carry.
    fn n_features(&self) -> usize;

    /// Predict a single row. The caller guarantees `row.len() == n_features()`.
    fn predict_row(&self, row: &[f64]) -> f64;

    /// Predict many rows.
    fn predict_rows(&self, rows: &[&[f64]]) -> Vec<f64> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }
}
