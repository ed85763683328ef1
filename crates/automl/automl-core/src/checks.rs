//! Pre-fit data checks.

use automl_spi::{AutoMLError, Result};
use data_spi::{DataError, Dataset, FEATURE_COUNT, TARGET_NAME};

/// Pivots smaller than this count as zero when computing rank.
const RANK_TOLERANCE: f64 = 1e-10;

/// Reject datasets that cannot be fitted: too few rows, non-finite targets,
/// or rank-deficient features.
pub fn check_training_data(dataset: &Dataset, min_rows: usize) -> Result<()> {
    if dataset.is_empty() {
        return Err(DataError::Empty.into());
    }
    if dataset.len() < min_rows {
        return Err(AutoMLError::InsufficientData {
            required: min_rows,
            actual: dataset.len(),
        });
    }
    if dataset.iter().any(|e| !e.target.is_finite()) {
        return Err(DataError::NonFinite {
            field: TARGET_NAME.to_string(),
        }
        .into());
    }

    let rank = feature_rank(dataset);
    if rank < FEATURE_COUNT {
        return Err(AutoMLError::RankDeficient {
            rank,
            expected: FEATURE_COUNT,
        });
    }
    Ok(())
}

/// Rank of the feature correlation matrix.
///
/// Constant columns have no defined correlation and do not contribute to
/// the rank.
pub fn feature_rank(dataset: &Dataset) -> usize {
    let n = dataset.len();
    if n < 2 {
        return 0;
    }

    let mut means = [0.0; FEATURE_COUNT];
    for example in dataset {
        for (m, x) in means.iter_mut().zip(example.features.values()) {
            *m += x;
        }
    }
    means.iter_mut().for_each(|m| *m /= n as f64);

    let mut cov = [[0.0; FEATURE_COUNT]; FEATURE_COUNT];
    for example in dataset {
        let x = example.features.values();
        for i in 0..FEATURE_COUNT {
            let di = x[i] - means[i];
            for j in i..FEATURE_COUNT {
                cov[i][j] += di * (x[j] - means[j]);
            }
        }
    }

    let active: Vec<usize> = (0..FEATURE_COUNT)
        .filter(|&i| cov[i][i] > f64::EPSILON * n as f64 * (1.0 + means[i].abs()).powi(2))
        .collect();

    let mut corr: Vec<Vec<f64>> = active
        .iter()
        .map(|&i| {
            active
                .iter()
                .map(|&j| {
                    let (a, b) = if i <= j { (i, j) } else { (j, i) };
                    cov[a][b] / (cov[i][i] * cov[j][j]).sqrt()
                })
                .collect()
        })
        .collect();

    matrix_rank(&mut corr)
}

/// Rank by Gaussian elimination with partial pivoting.
fn matrix_rank(m: &mut [Vec<f64>]) -> usize {
    let rows = m.len();
    let cols = m.first().map_or(0, Vec::len);
    let mut rank = 0;

    for col in 0..cols {
        if rank == rows {
            break;
        }
        let pivot = (rank..rows)
            .max_by(|&a, &b| m[a][col].abs().total_cmp(&m[b][col].abs()))
            .unwrap_or(rank);
        if m[pivot][col].abs() <= RANK_TOLERANCE {
            continue;
        }
        m.swap(rank, pivot);

        for r in rank + 1..rows {
            let factor = m[r][col] / m[rank][col];
            if factor != 0.0 {
                for c in col..cols {
                    m[r][c] -= factor * m[rank][c];
                }
            }
        }
        rank += 1;
    }
    rank
}
