//! Seeded dataset partitioning.
//!
//! A split shuffles row indices with a seeded RNG and takes the first
//! `ceil(ratio * n)` of them as the held-out side, so the same dataset, ratio
//! and seed always produce the same partition.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use data_spi::{DataError, Dataset, Result};

/// A two-way split with the source row indices of each side.
#[derive(Debug, Clone)]
pub struct Split {
    pub train: Dataset,
    pub test: Dataset,
    pub train_indices: Vec<usize>,
    pub test_indices: Vec<usize>,
}

/// Shuffle `0..n` and divide it into `(train, held_out)` index sets.
pub fn split_indices(n: usize, held_out_ratio: f64, seed: u64) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(held_out_ratio > 0.0 && held_out_ratio < 1.0) {
        return Err(DataError::InvalidRatio(held_out_ratio));
    }

    let n_held_out = (held_out_ratio * n as f64).ceil() as usize;
    if n_held_out == 0 || n_held_out >= n {
        return Err(DataError::InsufficientRows {
            required: 2,
            actual: n,
        });
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let train = indices.split_off(n_held_out);
    Ok((train, indices))
}

/// Split a dataset into train and test sides.
pub fn train_test_split(dataset: &Dataset, test_ratio: f64, seed: u64) -> Result<Split> {
    let (train_indices, test_indices) = split_indices(dataset.len(), test_ratio, seed)?;

    Ok(Split {
        train: dataset.subset(&train_indices),
        test: dataset.subset(&test_indices),
        train_indices,
        test_indices,
    })
}
