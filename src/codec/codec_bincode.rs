//! Native binary codec (bincode over serde)

use crate::codec::Codec;
use crate::dataset::Dataset;
use crate::error::{CodecError, CodecResult};

const CODEC: &str = "bincode";

/// Stateless bincode codec using the standard configuration
#[derive(Debug, Clone, Copy, Default)]
pub struct BincodeCodec;

impl BincodeCodec {
    /// Create a bincode codec
    pub fn new() -> Self {
        Self
    }
}

impl Codec for BincodeCodec {
    fn name(&self) -> &'static str {
        CODEC
    }

    fn encode(&self, dataset: &Dataset) -> CodecResult<Vec<u8>> {
        let config = bincode::config::standard();
        bincode::serde::encode_to_vec(dataset, config).map_err(|e| CodecError::Encoding {
            codec: CODEC,
            reason: format!("Failed to serialize dataset: {}", e),
        })
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<Dataset> {
        let config = bincode::config::standard();
        let (dataset, read): (Dataset, usize) =
            bincode::serde::decode_from_slice(bytes, config).map_err(|e| CodecError::Decode {
                codec: CODEC,
                reason: format!("Failed to deserialize dataset: {}", e),
            })?;
        if read != bytes.len() {
            return Err(CodecError::Decode {
                codec: CODEC,
                reason: format!("{} trailing bytes after dataset", bytes.len() - read),
            });
        }
        Ok(dataset)
    }
}
