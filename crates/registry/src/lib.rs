//! Model Registry
//!
//! Persists exactly one [`TrainedModel`](automl_spi::TrainedModel) at a
//! well-known path and loads it back with typed errors:
//!
//! - [`ModelRegistry`]: atomic save and validated load
//! - [`ModelCodec`]: the 32-byte header plus postcard payload format
//! - [`LoadError`] / [`SaveError`]: why a load or save failed

mod codec;
mod error;
mod store;

pub use codec::{
    FormatHeader, ModelCodec, CURRENT_VERSION_MAJOR, CURRENT_VERSION_MINOR, HEADER_SIZE, MAGIC,
};
pub use error::{DecodeError, LoadError, SaveError};
pub use store::{ModelRegistry, DEFAULT_MODEL_PATH};
