//! Text codec (JSON)

use crate::codec::Codec;
use crate::dataset::Dataset;
use crate::error::{CodecError, CodecResult};

const CODEC: &str = "json";

/// Stateless JSON codec
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create a JSON codec
    pub fn new() -> Self {
        Self
    }
}

impl Codec for JsonCodec {
    fn name(&self) -> &'static str {
        CODEC
    }

    fn encode(&self, dataset: &Dataset) -> CodecResult<Vec<u8>> {
        serde_json::to_vec(dataset).map_err(|e| CodecError::Encoding {
            codec: CODEC,
            reason: e.to_string(),
        })
    }

    // Malformed text is reported as an encoding error.
    fn decode(&self, bytes: &[u8]) -> CodecResult<Dataset> {
        serde_json::from_slice(bytes).map_err(|e| CodecError::Encoding {
            codec: CODEC,
            reason: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DataGenerator;

    #[test]
    fn test_round_trip_is_exact() {
        let dataset = DataGenerator::seeded(5).generate(100);
        let bytes = JsonCodec.encode(&dataset).unwrap();
        assert_eq!(JsonCodec.decode(&bytes).unwrap(), dataset);
    }

    #[test]
    fn test_document_shape() {
        let dataset = DataGenerator::seeded(5).generate(1);
        let bytes = JsonCodec.encode(&dataset).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        let metric = &value["metrics"][0];
        assert_eq!(metric["metadata"]["carrier"], "4g");
        assert_eq!(metric["data"]["band"], "5g");
        assert!(metric["data"]["rsrp"].is_f64());
        assert!(metric["timestamp"].is_string());
    }

    #[test]
    fn test_malformed_input() {
        let err = JsonCodec.decode(b"{\"metrics\": [").unwrap_err();
        assert!(matches!(err, CodecError::Encoding { codec: "json", .. }));
    }

    #[test]
    fn test_missing_field_rejected() {
        let err = JsonCodec
            .decode(br#"{"metrics": [{"timestamp": "2024-01-01T00:00:00Z", "metadata": {}}]}"#)
            .unwrap_err();
        assert!(matches!(err, CodecError::Encoding { .. }));
    }
}
