//! Single-slot model registry on the local filesystem.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use automl_spi::TrainedModel;

use crate::codec::ModelCodec;
use crate::error::{LoadError, SaveError};

/// Default artifact location, relative to the working directory.
pub const DEFAULT_MODEL_PATH: &str = "models/model.bin";

/// Stores one model at a fixed path.
///
/// Saves write a sibling temp file and rename it over the artifact, so a
/// reader never observes a half-written model.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    path: PathBuf,
    codec: ModelCodec,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_MODEL_PATH)
    }
}

impl ModelRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            codec: ModelCodec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether an artifact file exists.
    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Encode `model` and replace the artifact, creating parent directories.
    pub fn save(&self, model: &TrainedModel) -> Result<(), SaveError> {
        let bytes = self.codec.encode(model)?;
        let io_error = |source| SaveError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }

        let tmp = self.temp_path();
        let written = fs::File::create(&tmp).and_then(|mut file| {
            file.write_all(&bytes)?;
            file.sync_all()
        });
        if let Err(source) = written.and_then(|_| fs::rename(&tmp, &self.path)) {
            let _ = fs::remove_file(&tmp);
            return Err(io_error(source));
        }

        tracing::info!(
            path = %self.path.display(),
            family = %model.family(),
            bytes = bytes.len(),
            "saved model"
        );
        Ok(())
    }

    /// Read and validate the artifact.
    pub fn load(&self) -> Result<TrainedModel, LoadError> {
        let bytes = fs::read(&self.path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => LoadError::NotFound {
                path: self.path.clone(),
            },
            _ => LoadError::Io {
                path: self.path.clone(),
                source,
            },
        })?;

        let model = self
            .codec
            .decode(&bytes)
            .map_err(|e| LoadError::from_decode(self.path.clone(), e))?;

        tracing::info!(
            path = %self.path.display(),
            family = %model.family(),
            "loaded model"
        );
        Ok(model)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "model".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
