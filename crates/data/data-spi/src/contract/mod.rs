//! Contract module containing dataset persistence traits.

mod dataset_store;

pub use dataset_store::DatasetStore;
