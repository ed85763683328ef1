//! Regression accuracy metrics.

/// Mean Squared Error (MSE)
///
/// Average of squared differences. Lower is better. Returns NaN for empty or
/// mismatched inputs.
///
/// # Example
///
/// ```rust
/// use automl_core::metrics::mse;
///
/// let actual = vec![1.0, 2.0, 3.0];
/// let predicted = vec![1.0, 2.0, 5.0];
/// assert!((mse(&actual, &predicted) - 4.0 / 3.0).abs() < 1e-12);
/// ```
pub fn mse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.len() != predicted.len() || actual.is_empty() {
        return f64::NAN;
    }

    let sum: f64 = actual
        .iter()
        .zip(predicted.iter())
        .map(|(a, p)| (a - p).powi(2))
        .sum();

    sum / actual.len() as f64
}

/// Root Mean Squared Error (RMSE)
///
/// Square root of MSE, in the units of the target.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    mse(actual, predicted).sqrt()
}

/// Arithmetic mean; NaN when empty.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
