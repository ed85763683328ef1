//! Shuffled k-fold cross-validation splits.

use automl_spi::{AutoMLError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// One cross-validation fold: row indices to fit on and to score on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fold {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// K-Fold cross-validator.
///
/// Rows are shuffled with a seeded RNG and cut into `k` contiguous test
/// folds. The first `n % k` folds hold one extra row.
#[derive(Debug, Clone, Copy)]
pub struct KFold {
    folds: usize,
    seed: u64,
}

impl KFold {
    pub fn new(folds: usize, seed: u64) -> Self {
        Self { folds, seed }
    }

    pub fn folds(&self) -> usize {
        self.folds
    }

    pub fn splits(&self, n_rows: usize) -> Result<Vec<Fold>> {
        if self.folds < 2 {
            return Err(AutoMLError::InvalidConfig(format!(
                "folds must be >= 2, got {}",
                self.folds
            )));
        }
        if n_rows < self.folds {
            return Err(AutoMLError::InsufficientData {
                required: self.folds,
                actual: n_rows,
            });
        }

        let mut order: Vec<usize> = (0..n_rows).collect();
        order.shuffle(&mut StdRng::seed_from_u64(self.seed));

        let base = n_rows / self.folds;
        let extra = n_rows % self.folds;

        let mut splits = Vec::with_capacity(self.folds);
        let mut start = 0;
        for i in 0..self.folds {
            let size = base + usize::from(i < extra);
            let end = start + size;

            let test = order[start..end].to_vec();
            let train = order[..start]
                .iter()
                .chain(&order[end..])
                .copied()
                .collect();
            splits.push(Fold { train, test });
            start = end;
        }

        Ok(splits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_sizes() {
        let splits = KFold::new(5, 42).splits(23).unwrap();
        let sizes: Vec<usize> = splits.iter().map(|f| f.test.len()).collect();
        assert_eq!(sizes, vec![5, 5, 5, 4, 4]);
        assert!(splits.iter().all(|f| f.train.len() + f.test.len() == 23));
    }

    #[test]
    fn test_test_folds_partition_rows() {
        let splits = KFold::new(4, 7).splits(50).unwrap();
        let mut seen: Vec<usize> = splits.iter().flat_map(|f| f.test.clone()).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());

        for fold in &splits {
            assert!(fold.test.iter().all(|i| !fold.train.contains(i)));
        }
    }

    #[test]
    fn test_splits_are_seeded() {
        assert_eq!(
            KFold::new(3, 1).splits(30).unwrap(),
            KFold::new(3, 1).splits(30).unwrap()
        );
        assert_ne!(
            KFold::new(3, 1).splits(30).unwrap(),
            KFold::new(3, 2).splits(30).unwrap()
        );
    }

    #[test]
    fn test_invalid_fold_counts() {
        assert!(matches!(
            KFold::new(1, 0).splits(10),
            Err(AutoMLError::InvalidConfig(_))
        ));
        assert!(matches!(
            KFold::new(5, 0).splits(4),
            Err(AutoMLError::InsufficientData {
                required: 5,
                actual: 4
            })
        ));
    }
}
