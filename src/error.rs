//! Error types for the telemetry codec benchmark
//!
//! This module provides a unified error handling system using `thiserror` for
//! all components of the harness. Every error is returned to the caller; only
//! the binary decides to terminate the process.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for the benchmark harness
#[derive(Error, Debug)]
pub enum Error {
    /// Schema loading errors
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Encoding/decoding errors
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Compression errors
    #[error("Compression error: {0}")]
    Compression(#[from] CompressionError),

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration {
        /// What is wrong with the configuration
        message: String,
    },

    /// Generic I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Schema-specific error types
#[derive(Error, Debug)]
pub enum SchemaError {
    /// The schema file could not be read
    #[error("Failed to read schema file '{}': {source}", path.display())]
    Read {
        /// Schema file location
        path: PathBuf,
        /// Underlying read failure
        #[source]
        source: std::io::Error,
    },

    /// The schema file is not a valid Avro schema
    #[error("Failed to parse schema file '{}': {reason}", path.display())]
    Parse {
        /// Schema file location
        path: PathBuf,
        /// Parser message
        reason: String,
    },
}

/// Codec-specific error types
#[derive(Error, Debug)]
pub enum CodecError {
    /// Dataset shape and schema disagree
    #[error("{codec}: schema mismatch: {reason}")]
    SchemaMismatch {
        /// Codec name
        codec: &'static str,
        /// Offending field or type
        reason: String,
    },

    /// Serialization failed (or malformed text input)
    #[error("{codec}: encoding failed: {reason}")]
    Encoding {
        /// Codec name
        codec: &'static str,
        /// Underlying failure
        reason: String,
    },

    /// Deserialization failed
    #[error("{codec}: decoding failed: {reason}")]
    Decode {
        /// Codec name
        codec: &'static str,
        /// Underlying failure
        reason: String,
    },
}

impl CodecError {
    /// Name of the codec that raised the error
    pub fn codec(&self) -> &'static str {
        match self {
            CodecError::SchemaMismatch { codec, .. }
            | CodecError::Encoding { codec, .. }
            | CodecError::Decode { codec, .. } => codec,
        }
    }
}

/// Compression-specific error types
#[derive(Error, Debug)]
pub enum CompressionError {
    /// Input is not a valid compressed stream
    #[error("Corrupt compressed data: {reason}")]
    CorruptData {
        /// Decoder message
        reason: String,
    },

    /// The compressor failed to write its output
    #[error("Compression failed: {reason}")]
    Compress {
        /// Encoder message
        reason: String,
    },
}

/// Convenience type alias for Results
pub type Result<T> = std::result::Result<T, Error>;

/// Convenience type alias for Schema Results
pub type SchemaResult<T> = std::result::Result<T, SchemaError>;

/// Convenience type alias for Codec Results
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Convenience type alias for Compression Results
pub type CompressionResult<T> = std::result::Result<T, CompressionError>;
