//! Harness module driving the codec comparison
//!
//! The run is strictly linear: generate the dataset once, then for every
//! codec and mode encode, optionally compress, record the size, optionally
//! decompress, and decode. The first failure aborts the run and is returned
//! to the caller.

use crate::codec::{Codec, CodecKind};
use crate::compression::{Compressor, Mode};
use crate::config::HarnessConfig;
use crate::dataset::{DataGenerator, Dataset};
use crate::error::{CodecError, Result};
use crate::report::{BenchmarkReport, SizeReport};
use crate::schema::load_schema;
use apache_avro::Schema;
use rand::Rng;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Codec comparison harness bound to a parsed schema
#[derive(Debug, Clone)]
pub struct Harness {
    schema: Arc<Schema>,
}

impl Harness {
    /// Load the schema file; fails before any data is generated
    pub fn new(schema_path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::with_schema(load_schema(schema_path)?))
    }

    /// Use an already parsed schema
    pub fn with_schema(schema: Arc<Schema>) -> Self {
        Self { schema }
    }

    /// The schema handed to the avro codec
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Run with the settings of a parsed command line
    pub fn run(&self, config: &HarnessConfig) -> Result<BenchmarkReport> {
        config.validate()?;
        let compressor = Compressor::new(config.level);
        let mut generator = match config.seed {
            Some(seed) => DataGenerator::seeded(seed),
            None => DataGenerator::from_entropy(),
        };
        self.run_with(&mut generator, config.count, &compressor)
    }

    /// Generate `count` records and measure every codec/mode combination
    pub fn run_with<R: Rng>(
        &self,
        generator: &mut DataGenerator<R>,
        count: usize,
        compressor: &Compressor,
    ) -> Result<BenchmarkReport> {
        let dataset = generator.generate(count);
        info!(records = dataset.len(), level = compressor.level(), "dataset ready");

        let mut report = BenchmarkReport::new(dataset.len());
        for kind in CodecKind::ALL {
            let codec = kind.build(&self.schema);
            for mode in Mode::ALL {
                let result = measure(codec.as_ref(), kind, mode, &dataset, compressor)?;
                info!(
                    codec = %kind,
                    mode = %mode,
                    bytes = result.bytes,
                    per_record = result.per_record(),
                    "measured"
                );
                report.add_result(result);
            }
        }
        Ok(report)
    }
}

/// Encode, optionally compress, record the size, then decode the payload back
pub fn measure(
    codec: &dyn Codec,
    kind: CodecKind,
    mode: Mode,
    dataset: &Dataset,
    compressor: &Compressor,
) -> Result<SizeReport> {
    let encoded = codec.encode(dataset)?;
    debug!(codec = codec.name(), bytes = encoded.len(), "encoded");

    let payload = if mode.is_compressed() {
        let compressed = compressor.compress(&encoded)?;
        debug!(codec = codec.name(), bytes = compressed.len(), "compressed");
        compressed
    } else {
        encoded
    };
    let result = SizeReport::new(kind, mode, payload.len(), dataset.len());

    let decoded = if mode.is_compressed() {
        let restored = compressor.decompress(&payload)?;
        codec.decode(&restored)?
    } else {
        codec.decode(&payload)?
    };
    if decoded.len() != dataset.len() {
        return Err(CodecError::Decode {
            codec: codec.name(),
            reason: format!("decoded {} records, expected {}", decoded.len(), dataset.len()),
        }
        .into());
    }
    debug!(codec = codec.name(), mode = %mode, "decoded");

    Ok(result)
}
