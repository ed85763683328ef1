//! Integration tests for the housing data crate

use data_core::{
    max_abs_difference, train_test_split, CsvDatasetStore, DataError, Dataset, DatasetStore, FeatureVector,
    LabeledExample,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_dataset(n: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| {
            let values = [
                rng.gen_range(0.5..15.0),
                rng.gen_range(1.0..52.0),
                rng.gen_range(1.0..10.0),
                rng.gen_range(0.5..2.0),
                rng.gen_range(3.0..35682.0),
                rng.gen_range(0.7..1243.0),
                rng.gen_range(32.54..41.95),
                rng.gen_range(-124.35..-114.31),
            ];
            let fv = FeatureVector::new(values).unwrap();
            LabeledExample::new(fv, rng.gen_range(0.15..5.00001))
        })
        .collect()
}

#[test]
fn test_csv_round_trip_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data").join("train.csv");

    let original = random_dataset(500, 42);
    let store = CsvDatasetStore::new();
    store.save(&original, &path).unwrap();

    let reread = store.load(&path).unwrap();
    assert_eq!(reread.len(), original.len());
    let diff = max_abs_difference(&original, &reread).unwrap();
    assert!(diff < 1e-6, "round-trip difference {diff} exceeds tolerance");
}

#[test]
fn test_load_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = CsvDatasetStore::new().load(&dir.path().join("absent.csv"));
    assert!(matches!(result, Err(DataError::Io(_))));
}

#[test]
fn test_test_split_then_validation_split_stay_disjoint() {
    let ds = random_dataset(257, 1);
    for seed in 0..20 {
        // Held-out test rows first, then validation rows carved from the rest.
        let outer = train_test_split(&ds, 0.2, seed).unwrap();
        let inner = train_test_split(&outer.train, 0.2, seed + 1).unwrap();

        let fit: Vec<usize> = inner.train_indices.iter().map(|&i| outer.train_indices[i]).collect();
        let validation: Vec<usize> = inner.test_indices.iter().map(|&i| outer.train_indices[i]).collect();

        for (row, &idx) in inner.test.iter().zip(&validation) {
            assert_eq!(row, &ds.examples()[idx]);
        }

        let mut all: Vec<usize> = fit
            .iter()
            .chain(&validation)
            .chain(&outer.test_indices)
            .copied()
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..ds.len()).collect::<Vec<_>>());
    }
}
