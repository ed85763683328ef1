//! Dataset store trait definition.

use std::path::Path;

use crate::error::Result;
use crate::model::Dataset;

/// Reads and writes labeled housing datasets.
///
/// Implementations must preserve row order and every value to within
/// `1e-6` absolute difference across a write/read cycle.
pub trait DatasetStore: Send + Sync {
    /// Store name, used in log output.
    fn name(&self) -> &str;

    /// Load a dataset from `path`.
    fn load(&self, path: &Path) -> Result<Dataset>;

    /// Write `dataset` to `path`, replacing any existing file.
    fn save(&self, dataset: &Dataset, path: &Path) -> Result<()>;
}
