//! # Telemetry Codec Bench
//!
//! A size and round-trip benchmark of three serialization encodings over a
//! synthetic dataset of fixed-shape telemetry records, each measured plain and
//! gzip-compressed.
//!
//! ## Modules
//!
//! - **Dataset Module**: record types and the seedable data generator
//! - **Schema Module**: Avro schema loading
//! - **Codec Module**: Avro, JSON and bincode adapters behind one trait
//! - **Compression Module**: gzip wrapper at configurable level
//! - **Report Module**: per-combination size results, text and JSON output
//! - **Harness Module**: the generate → encode → compress → decode sequence
//! - **Logging Module**: stderr tracing subscriber with span traces
//!
//! ## Example
//!
//! ```rust,no_run
//! use telemetry_codec_bench::compression::Compressor;
//! use telemetry_codec_bench::dataset::DataGenerator;
//! use telemetry_codec_bench::harness::Harness;
//!
//! let harness = Harness::new("schema")?;
//! let report = harness.run_with(&mut DataGenerator::seeded(1), 1000, &Compressor::best())?;
//! print!("{}", report.render_text());
//! # Ok::<(), telemetry_codec_bench::Error>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![deny(missing_docs)]
#![warn(clippy::all)]

// Re-export core error types
pub use error::{Error, Result};

// Core modules
pub mod error;
pub mod dataset;
pub mod schema;
pub mod codec;
pub mod compression;
pub mod report;
pub mod harness;
pub mod config;
pub mod logging;

// Re-export commonly used types
pub mod prelude {
    //! Common types and traits for convenient importing

    pub use crate::codec::{AvroCodec, BincodeCodec, Codec, CodecKind, JsonCodec};
    pub use crate::compression::{Compressor, Mode};
    pub use crate::config::HarnessConfig;
    pub use crate::dataset::{DataGenerator, Dataset, Record};
    pub use crate::error::{CodecError, CompressionError, Error, Result, SchemaError};
    pub use crate::harness::Harness;
    pub use crate::report::{BenchmarkReport, SizeReport};
}

// Version information
/// The version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
