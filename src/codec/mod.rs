//! Codec module for dataset encoding and decoding
//!
//! Every encoding under test sits behind the [`Codec`] trait so the harness
//! can run them uniformly:
//! - **avro** - schema-based binary, needs the parsed schema
//! - **json** - text
//! - **bincode** - native binary
//!
//! # Examples
//!
//! ```rust
//! use telemetry_codec_bench::codec::{Codec, JsonCodec};
//! use telemetry_codec_bench::dataset::DataGenerator;
//!
//! let dataset = DataGenerator::seeded(1).generate(10);
//! let bytes = JsonCodec.encode(&dataset)?;
//! let decoded = JsonCodec.decode(&bytes)?;
//! assert_eq!(decoded.len(), 10);
//! # Ok::<(), telemetry_codec_bench::error::CodecError>(())
//! ```

pub mod codec_avro;
pub mod codec_bincode;
pub mod codec_json;

// Re-export main types for convenience
pub use codec_avro::AvroCodec;
pub use codec_bincode::BincodeCodec;
pub use codec_json::JsonCodec;

use crate::dataset::Dataset;
use crate::error::CodecResult;
use apache_avro::Schema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Paired encode/decode for one serialization format
pub trait Codec {
    /// Short label used in reports
    fn name(&self) -> &'static str;

    /// Encode a dataset to bytes
    fn encode(&self, dataset: &Dataset) -> CodecResult<Vec<u8>>;

    /// Decode bytes back into a dataset
    fn decode(&self, bytes: &[u8]) -> CodecResult<Dataset>;
}

/// Selector for the codecs under test
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodecKind {
    /// Schema-based binary
    Avro,
    /// Text
    Json,
    /// Native binary
    Bincode,
}

impl CodecKind {
    /// Every codec, in report order
    pub const ALL: [CodecKind; 3] = [CodecKind::Avro, CodecKind::Json, CodecKind::Bincode];

    /// Short label used in reports
    pub fn name(self) -> &'static str {
        match self {
            CodecKind::Avro => "avro",
            CodecKind::Json => "json",
            CodecKind::Bincode => "bincode",
        }
    }

    /// Instantiate the codec; only avro reads the schema
    pub fn build(self, schema: &Arc<Schema>) -> Box<dyn Codec> {
        match self {
            CodecKind::Avro => Box::new(AvroCodec::new(Arc::clone(schema))),
            CodecKind::Json => Box::new(JsonCodec::new()),
            CodecKind::Bincode => Box::new(BincodeCodec::new()),
        }
    }
}

impl fmt::Display for CodecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
