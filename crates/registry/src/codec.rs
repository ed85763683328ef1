//! Binary artifact format.
//!
//! ```text
//! Offset  Size  Field
//! ------  ----  -----
//! 0       4     Magic ("HPRM")
//! 4       1     Version major
//! 5       1     Version minor
//! 6       1     Model family
//! 7       1     Reserved
//! 8       2     Flags
//! 10      2     Reserved
//! 12      4     Payload size (bytes)
//! 16      4     CRC32 of payload
//! 20      4     Number of features
//! 24      8     Reserved
//! ```
//!
//! All integers are little-endian. The payload is a postcard-encoded
//! [`TrainedModel`].

use automl_spi::{ModelFamily, Regressor, TrainedModel};
use data_spi::FEATURE_COUNT;

use crate::error::{DecodeError, SaveError};

/// Magic bytes identifying a model artifact.
pub const MAGIC: &[u8; 4] = b"HPRM";

/// Current format version (major).
pub const CURRENT_VERSION_MAJOR: u8 = 1;

/// Current format version (minor).
pub const CURRENT_VERSION_MINOR: u8 = 0;

/// Size of the format header in bytes.
pub const HEADER_SIZE: usize = 32;

/// 32-byte artifact header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatHeader {
    pub version_major: u8,
    pub version_minor: u8,
    pub family: ModelFamily,
    pub flags: u16,
    pub payload_size: u32,
    pub checksum: u32,
    pub num_features: u32,
}

impl FormatHeader {
    pub fn new(family: ModelFamily, num_features: u32) -> Self {
        Self {
            version_major: CURRENT_VERSION_MAJOR,
            version_minor: CURRENT_VERSION_MINOR,
            family,
            flags: 0,
            payload_size: 0,
            checksum: 0,
            num_features,
        }
    }

    pub fn to_bytes(&self) -> [u8; HEADER_SIZE] {
        let mut buf = [0u8; HEADER_SIZE];
        buf[0..4].copy_from_slice(MAGIC);
        buf[4] = self.version_major;
        buf[5] = self.version_minor;
        buf[6] = self.family.as_u8();
        buf[8..10].copy_from_slice(&self.flags.to_le_bytes());
        buf[12..16].copy_from_slice(&self.payload_size.to_le_bytes());
        buf[16..20].copy_from_slice(&self.checksum.to_le_bytes());
        buf[20..24].copy_from_slice(&self.num_features.to_le_bytes());
        buf
    }

    pub fn from_bytes(buf: &[u8; HEADER_SIZE]) -> Result<Self, DecodeError> {
        if &buf[0..4] != MAGIC {
            return Err(DecodeError::NotAModel);
        }

        let version_major = buf[4];
        let version_minor = buf[5];
        if version_major > CURRENT_VERSION_MAJOR {
            return Err(DecodeError::UnsupportedVersion {
                major: version_major,
                minor: version_minor,
            });
        }

        let family = ModelFamily::from_u8(buf[6]).ok_or_else(|| {
            DecodeError::CorruptPayload(format!("unknown model family byte {}", buf[6]))
        })?;

        Ok(Self {
            version_major,
            version_minor,
            family,
            flags: u16::from_le_bytes([buf[8], buf[9]]),
            payload_size: u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
            checksum: u32::from_le_bytes([buf[16], buf[17], buf[18], buf[19]]),
            num_features: u32::from_le_bytes([buf[20], buf[21], buf[22], buf[23]]),
        })
    }
}

/// Encodes and decodes model artifacts.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelCodec;

impl ModelCodec {
    pub fn new() -> Self {
        Self
    }

    pub fn encode(&self, model: &TrainedModel) -> Result<Vec<u8>, SaveError> {
        model
            .validate()
            .map_err(|e| SaveError::InvalidModel(e.to_string()))?;

        let payload = postcard::to_stdvec(model)?;
        let payload_size = u32::try_from(payload.len()).map_err(|_| {
            SaveError::InvalidModel(format!("payload of {} bytes is too large", payload.len()))
        })?;

        let mut header = FormatHeader::new(model.family(), model.n_features() as u32);
        header.payload_size = payload_size;
        header.checksum = crc32fast::hash(&payload);

        let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
        bytes.extend_from_slice(&header.to_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<TrainedModel, DecodeError> {
        let header_bytes: &[u8; HEADER_SIZE] = bytes
            .get(..HEADER_SIZE)
            .and_then(|h| h.try_into().ok())
            .ok_or(DecodeError::Truncated {
                expected: HEADER_SIZE,
                actual: bytes.len(),
            })?;
        let header = FormatHeader::from_bytes(header_bytes)?;

        let expected = HEADER_SIZE + header.payload_size as usize;
        if bytes.len() < expected {
            return Err(DecodeError::Truncated {
                expected,
                actual: bytes.len(),
            });
        }
        if bytes.len() > expected {
            return Err(DecodeError::CorruptPayload(format!(
                "{} trailing bytes after payload",
                bytes.len() - expected
            )));
        }

        let payload = &bytes[HEADER_SIZE..];
        let actual = crc32fast::hash(payload);
        if actual != header.checksum {
            return Err(DecodeError::ChecksumMismatch {
                expected: header.checksum,
                actual,
            });
        }

        if header.num_features as usize != FEATURE_COUNT {
            return Err(DecodeError::InvalidModel(format!(
                "artifact has {} features, expected {}",
                header.num_features, FEATURE_COUNT
            )));
        }

        let model: TrainedModel = postcard::from_bytes(payload)
            .map_err(|e| DecodeError::CorruptPayload(e.to_string()))?;
        if model.family() != header.family {
            return Err(DecodeError::InvalidModel(format!(
                "header says {} but payload holds {}",
                header.family,
                model.family()
            )));
        }
        model
            .validate()
            .map_err(|e| DecodeError::InvalidModel(e.to_string()))?;

        Ok(model)
    }
}
