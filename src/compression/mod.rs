//! Compression module for encoded payloads
//!
//! Encoded bytes are optionally wrapped with gzip before their size is
//! measured. The stream header carries no modification time, so equal input
//! always yields equal output.

use crate::error::{CompressionError, CompressionResult};
use flate2::bufread::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{Read, Write};

/// Transport mode of an encoded payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Encoded bytes as-is
    Plain,
    /// Encoded bytes wrapped in gzip
    Gzip,
}

impl Mode {
    /// Every mode, in report order
    pub const ALL: [Mode; 2] = [Mode::Plain, Mode::Gzip];

    /// Label used in reports
    pub fn label(self) -> &'static str {
        match self {
            Mode::Plain => "uncompressed",
            Mode::Gzip => "compressed",
        }
    }

    /// Whether payloads go through the compressor
    pub fn is_compressed(self) -> bool {
        matches!(self, Mode::Gzip)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Gzip compressor with a fixed level
#[derive(Debug, Clone, Copy)]
pub struct Compressor {
    level: Compression,
}

impl Default for Compressor {
    fn default() -> Self {
        Self::best()
    }
}

impl Compressor {
    /// Compressor at `level`, clamped to 0-9
    pub fn new(level: u32) -> Self {
        Self {
            level: Compression::new(level.min(9)),
        }
    }

    /// Maximum compression effort
    pub fn best() -> Self {
        Self {
            level: Compression::best(),
        }
    }

    /// Configured level
    pub fn level(&self) -> u32 {
        self.level.level()
    }

    /// Compress a buffer into a gzip stream
    pub fn compress(&self, data: &[u8]) -> CompressionResult<Vec<u8>> {
        let mut encoder = GzEncoder::new(Vec::with_capacity(data.len() / 4), self.level);
        encoder
            .write_all(data)
            .map_err(|e| CompressionError::Compress {
                reason: format!("gzip compress: {}", e),
            })?;
        encoder.finish().map_err(|e| CompressionError::Compress {
            reason: format!("gzip finish: {}", e),
        })
    }

    /// Decompress a single gzip member; anything after it is corrupt
    pub fn decompress(&self, data: &[u8]) -> CompressionResult<Vec<u8>> {
        let mut decoder = GzDecoder::new(data);
        let mut decompressed = Vec::new();
        decoder
            .read_to_end(&mut decompressed)
            .map_err(|e| CompressionError::CorruptData {
                reason: format!("gzip decompress: {}", e),
            })?;
        let rest = decoder.into_inner();
        if !rest.is_empty() {
            return Err(CompressionError::CorruptData {
                reason: format!("{} trailing bytes after gzip stream", rest.len()),
            });
        }
        Ok(decompressed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let compressor = Compressor::best();
        let data = b"band_tag=3 carrier=4g cell_id=5149123 ".repeat(64);
        let compressed = compressor.compress(&data).unwrap();
        assert!(compressed.len() < data.len());
        assert_eq!(compressor.decompress(&compressed).unwrap(), data);
    }

    #[test]
    fn test_deterministic_output() {
        let compressor = Compressor::best();
        let data = b"deterministic".repeat(10);
        assert_eq!(compressor.compress(&data).unwrap(), compressor.compress(&data).unwrap());
    }

    #[test]
    fn test_empty_input() {
        let compressor = Compressor::default();
        let compressed = compressor.compress(&[]).unwrap();
        assert!(compressor.decompress(&compressed).unwrap().is_empty());
    }

    #[test]
    fn test_corrupt_input() {
        let err = Compressor::best().decompress(b"definitely not gzip").unwrap_err();
        assert!(matches!(err, CompressionError::CorruptData { .. }));
    }

    #[test]
    fn test_trailing_garbage() {
        let compressor = Compressor::best();
        let mut compressed = compressor.compress(b"payload").unwrap();
        compressed.extend_from_slice(b"garbage");
        let err = compressor.decompress(&compressed).unwrap_err();
        assert!(matches!(err, CompressionError::CorruptData { .. }));
        assert!(err.to_string().contains("7 trailing bytes"));
    }

    #[test]
    fn test_level_clamped() {
        assert_eq!(Compressor::new(42).level(), 9);
        assert_eq!(Compressor::new(1).level(), 1);
        assert_eq!(Compressor::best().level(), 9);
    }

    #[test]
    fn test_mode_labels() {
        assert_eq!(Mode::Plain.to_string(), "uncompressed");
        assert_eq!(Mode::Gzip.to_string(), "compressed");
        assert!(Mode::Gzip.is_compressed());
    }
}
