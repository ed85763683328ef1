//! Integration tests for the model registry

use automl_spi::{Estimator, Forest, RegressionTree, TrainedModel, TreeNode};
use data_spi::FEATURE_COUNT;
use registry::{LoadError, ModelRegistry, SaveError, CURRENT_VERSION_MAJOR};

fn model(leaf: f64) -> TrainedModel {
    let tree = RegressionTree::new(vec![
        TreeNode::Split {
            feature: 6,
            threshold: 36.0,
            left: 1,
            right: 2,
        },
        TreeNode::Leaf { value: leaf },
        TreeNode::Leaf { value: leaf + 1.0 },
    ]);
    TrainedModel::new(Estimator::RandomForest(Forest::new(
        vec![tree, RegressionTree::constant(leaf)],
        FEATURE_COUNT,
    )))
}

#[test]
fn test_save_creates_directories_and_loads_back() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ModelRegistry::new(dir.path().join("models").join("nested").join("model.bin"));

    let original = model(1.5);
    registry.save(&original).unwrap();
    assert!(registry.exists());

    let loaded = registry.load().unwrap();
    assert_eq!(loaded, original);

    let row = [8.3, 41.0, 6.9, 1.0, 322.0, 2.5, 37.88, -122.23];
    assert_eq!(loaded.predict(&row).unwrap(), original.predict(&row).unwrap());
}

#[test]
fn test_save_overwrites_single_slot() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ModelRegistry::new(dir.path().join("model.bin"));

    registry.save(&model(1.0)).unwrap();
    registry.save(&model(2.0)).unwrap();
    assert_eq!(registry.load().unwrap(), model(2.0));

    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "temp file left behind");
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ModelRegistry::new(dir.path().join("model.bin"));
    match registry.load() {
        Err(err @ LoadError::NotFound { .. }) => assert_eq!(err.kind(), "not_found"),
        other => panic!("Expected NotFound, got {:?}", other),
    }
}

#[test]
fn test_garbage_file_is_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.bin");
    std::fs::write(&path, b"this is not a model, just some text padding it out").unwrap();

    let err = ModelRegistry::new(&path).load().unwrap_err();
    assert!(matches!(err, LoadError::Corrupt { .. }));
    assert_eq!(err.kind(), "corrupt");
}

#[test]
fn test_empty_and_truncated_files_are_corrupt() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.bin");
    let registry = ModelRegistry::new(&path);

    std::fs::write(&path, b"").unwrap();
    assert!(matches!(registry.load(), Err(LoadError::Corrupt { .. })));

    registry.save(&model(1.0)).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::write(&path, &bytes[..bytes.len() / 2]).unwrap();
    assert!(matches!(registry.load(), Err(LoadError::Corrupt { .. })));
}

#[test]
fn test_newer_format_is_unsupported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("model.bin");
    let registry = ModelRegistry::new(&path);
    registry.save(&model(1.0)).unwrap();

    let mut bytes = std::fs::read(&path).unwrap();
    bytes[4] = CURRENT_VERSION_MAJOR + 1;
    std::fs::write(&path, &bytes).unwrap();

    assert!(matches!(
        registry.load(),
        Err(LoadError::UnsupportedVersion { .. })
    ));
}

#[test]
fn test_directory_in_place_of_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ModelRegistry::new(dir.path());
    assert!(matches!(registry.load(), Err(LoadError::Io { .. })));
}

#[test]
fn test_invalid_model_is_not_saved() {
    let dir = tempfile::tempdir().unwrap();
    let registry = ModelRegistry::new(dir.path().join("model.bin"));
    let empty = TrainedModel::new(Estimator::RandomForest(Forest::new(vec![], FEATURE_COUNT)));

    assert!(matches!(registry.save(&empty), Err(SaveError::InvalidModel(_))));
    assert!(!registry.exists());
}
