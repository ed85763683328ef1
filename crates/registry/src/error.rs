//! Registry error types.

use std::path::PathBuf;

use thiserror::Error;

/// Why an artifact's bytes could not be decoded into a model.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// Wrong magic bytes.
    #[error("not a housing model artifact")]
    NotAModel,

    /// Written by a newer format version.
    #[error("unsupported format version {major}.{minor}")]
    UnsupportedVersion { major: u8, minor: u8 },

    /// Fewer bytes than the header promises.
    #[error("artifact truncated: expected {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },

    /// Payload checksum does not match the header.
    #[error("checksum mismatch: expected {expected:#010x}, got {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },

    /// Payload could not be decoded.
    #[error("corrupt payload: {0}")]
    CorruptPayload(String),

    /// Decoded model does not match the housing feature layout or is malformed.
    #[error("invalid model: {0}")]
    InvalidModel(String),
}

/// Errors returned by [`ModelRegistry::load`](crate::ModelRegistry::load).
#[derive(Debug, Error)]
pub enum LoadError {
    /// No artifact at the registry path.
    #[error("No model artifact at {}", .path.display())]
    NotFound { path: PathBuf },

    /// Artifact exists but cannot be trusted.
    #[error("Model artifact at {} is corrupt: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: DecodeError,
    },

    /// Artifact was written by a newer format version.
    #[error("Model artifact at {} uses unsupported format version {major}.{minor}", .path.display())]
    UnsupportedVersion { path: PathBuf, major: u8, minor: u8 },

    /// Any other read failure (permissions, I/O).
    #[error("Failed to read model artifact at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl LoadError {
    pub(crate) fn from_decode(path: PathBuf, error: DecodeError) -> Self {
        match error {
            DecodeError::UnsupportedVersion { major, minor } => {
                LoadError::UnsupportedVersion { path, major, minor }
            }
            source => LoadError::Corrupt { path, source },
        }
    }

    /// Short machine-readable kind, used in logs and readiness responses.
    pub fn kind(&self) -> &'static str {
        match self {
            LoadError::NotFound { .. } => "not_found",
            LoadError::Corrupt { .. } => "corrupt",
            LoadError::UnsupportedVersion { .. } => "unsupported_version",
            LoadError::Io { .. } => "io",
        }
    }
}

/// Errors returned by [`ModelRegistry::save`](crate::ModelRegistry::save).
#[derive(Debug, Error)]
pub enum SaveError {
    /// The model failed validation and was not written.
    #[error("Refusing to save invalid model: {0}")]
    InvalidModel(String),

    /// Serialization failed.
    #[error("Failed to encode model: {0}")]
    Encode(#[from] postcard::Error),

    /// Writing the artifact failed.
    #[error("Failed to write model artifact at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
