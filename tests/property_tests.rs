//! Property tests for generation, codecs and compression

use proptest::prelude::*;
use telemetry_codec_bench::dataset::{Measurements, Metadata};
use telemetry_codec_bench::prelude::*;
use telemetry_codec_bench::schema::load_schema;

fn assert_bytes_equal(actual: &[u8], expected: &[u8], context: &str) {
    if actual != expected {
        panic!(
            "Byte arrays differ in {}\nExpected: {}\nActual:   {}\nExpected (hex): {}\nActual (hex):   {}",
            context,
            expected.len(),
            actual.len(),
            hex::encode(expected),
            hex::encode(actual)
        );
    }
}

proptest! {
    #[test]
    fn gzip_round_trip_is_exact(data in prop::collection::vec(any::<u8>(), 0..4096), level in 0u32..=9) {
        let compressor = Compressor::new(level);
        let compressed = compressor.compress(&data).unwrap();
        let restored = compressor.decompress(&compressed).unwrap();
        assert_bytes_equal(&restored, &data, "gzip round trip");
    }

    #[test]
    fn generated_shape_is_fixed(count in 0usize..200, seed in any::<u64>()) {
        let dataset = DataGenerator::seeded(seed).generate(count);
        prop_assert_eq!(dataset.len(), count);
        for record in dataset.iter() {
            let metadata: Vec<_> = record.metadata.fields().into_iter().map(|(k, _)| k).collect();
            let data: Vec<_> = record.data.fields().into_iter().map(|(k, _)| k).collect();
            prop_assert_eq!(metadata.as_slice(), Metadata::keys());
            prop_assert_eq!(data.as_slice(), Measurements::keys());
        }
    }

    #[test]
    fn codecs_round_trip(count in 0usize..40, seed in any::<u64>()) {
        let schema = load_schema(concat!(env!("CARGO_MANIFEST_DIR"), "/schema")).unwrap();
        let dataset = DataGenerator::seeded(seed).generate(count);
        for kind in CodecKind::ALL {
            let codec = kind.build(&schema);
            let decoded = codec.decode(&codec.encode(&dataset).unwrap()).unwrap();
            prop_assert_eq!(&decoded, &dataset);
        }
    }
}
