//! Schema-based binary codec (Apache Avro)
//!
//! The dataset is converted to an Avro value by walking the schema, so the
//! same typed records can be written against record-shaped or map-shaped
//! blocks. Any disagreement between the two is a schema mismatch.

use crate::codec::Codec;
use crate::dataset::{Dataset, FieldValue, Measurements, Metadata, Record};
use crate::error::{CodecError, CodecResult};
use apache_avro::schema::{Name, ResolvedSchema, SchemaKind, UnionSchema};
use apache_avro::types::Value;
use apache_avro::Schema;
use chrono::{DateTime, SecondsFormat, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{trace, warn};

const CODEC: &str = "avro";

/// Conversion result; the error is a human readable reason
type Shape<T> = Result<T, String>;

/// Avro codec holding a read-only parsed schema
#[derive(Debug, Clone)]
pub struct AvroCodec {
    schema: Arc<Schema>,
    names: Arc<HashMap<Name, Schema>>,
}

impl AvroCodec {
    /// Create a codec over a parsed schema
    pub fn new(schema: Arc<Schema>) -> Self {
        let names = Arc::new(named_types(&schema));
        Self { schema, names }
    }

    /// The schema used for both directions
    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

impl Codec for AvroCodec {
    fn name(&self) -> &'static str {
        CODEC
    }

    fn encode(&self, dataset: &Dataset) -> CodecResult<Vec<u8>> {
        let writer = Writer { names: &self.names };
        let value = writer.dataset(dataset, &self.schema).map_err(mismatch)?;
        if !value.validate(&self.schema) {
            return Err(mismatch("converted value does not validate against schema".to_string()));
        }
        let bytes = apache_avro::to_avro_datum(&self.schema, value).map_err(|e| CodecError::Encoding {
            codec: CODEC,
            reason: e.to_string(),
        })?;
        trace!(bytes = bytes.len(), "avro datum written");
        Ok(bytes)
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<Dataset> {
        let mut reader = bytes;
        let value = apache_avro::from_avro_datum(&self.schema, &mut reader, None).map_err(|e| {
            CodecError::Decode {
                codec: CODEC,
                reason: e.to_string(),
            }
        })?;
        if !reader.is_empty() {
            return Err(CodecError::Decode {
                codec: CODEC,
                reason: format!("{} trailing bytes after datum", reader.len()),
            });
        }
        avro_to_dataset(&value).map_err(mismatch)
    }
}

fn mismatch(reason: String) -> CodecError {
    CodecError::SchemaMismatch { codec: CODEC, reason }
}

fn kind(schema: &Schema) -> SchemaKind {
    SchemaKind::from(schema)
}

/// Named types of `schema`, keyed by fully qualified name
fn named_types(schema: &Schema) -> HashMap<Name, Schema> {
    match ResolvedSchema::try_from(schema) {
        Ok(resolved) => resolved
            .get_names()
            .iter()
            .map(|(name, schema)| (name.clone(), (*schema).clone()))
            .collect(),
        Err(e) => {
            warn!(error = %e, "avro schema names could not be resolved");
            HashMap::new()
        }
    }
}

/// Try every union branch in order, keep the first that converts.
fn resolve_union(union: &UnionSchema, convert: impl Fn(&Schema) -> Shape<Value>) -> Shape<Value> {
    let mut reasons = Vec::new();
    for (idx, variant) in union.variants().iter().enumerate() {
        match convert(variant) {
            Ok(value) => return Ok(Value::Union(idx as u32, Box::new(value))),
            Err(reason) => reasons.push(reason),
        }
    }
    Err(format!("no union branch accepts value: [{}]", reasons.join("; ")))
}

// ---- Dataset → Avro ----

/// Schema walk from typed records to Avro values
struct Writer<'a> {
    names: &'a HashMap<Name, Schema>,
}

impl Writer<'_> {
    /// Follow named references to their definition
    fn deref<'s>(&'s self, schema: &'s Schema) -> Shape<&'s Schema> {
        match schema {
            Schema::Ref { name } => self
                .names
                .get(name)
                .or_else(|| {
                    self.names
                        .iter()
                        .find(|(known, _)| known.name == name.name)
                        .map(|(_, schema)| schema)
                })
                .ok_or_else(|| format!("unresolved schema reference '{}'", name.fullname(None))),
            other => Ok(other),
        }
    }

    /// Value for a schema field the dataset has nothing to put in
    fn null_for(&self, field: &str, schema: &Schema) -> Shape<Value> {
        match self.deref(schema)? {
            Schema::Null => Ok(Value::Null),
            Schema::Union(union) => resolve_union(union, |variant| match variant {
                Schema::Null => Ok(Value::Null),
                other => Err(format!("{:?} is not null", kind(other))),
            }),
            other => Err(format!(
                "schema field '{}' ({:?}) has no counterpart in the dataset",
                field,
                kind(other)
            )),
        }
    }

    fn dataset(&self, dataset: &Dataset, schema: &Schema) -> Shape<Value> {
        match self.deref(schema)? {
            Schema::Record(record) => {
                if !record.fields.iter().any(|f| f.name == "metrics") {
                    return Err(format!("container record '{}' has no 'metrics' field", record.name.name));
                }
                let mut fields = Vec::with_capacity(record.fields.len());
                for field in &record.fields {
                    let value = if field.name == "metrics" {
                        self.records(dataset, &field.schema)?
                    } else {
                        self.null_for(&field.name, &field.schema)?
                    };
                    fields.push((field.name.clone(), value));
                }
                Ok(Value::Record(fields))
            }
            array @ Schema::Array(_) => self.records(dataset, array),
            Schema::Union(union) => resolve_union(union, |variant| self.dataset(dataset, variant)),
            other => Err(format!("container must be a record or array, schema is {:?}", kind(other))),
        }
    }

    fn records(&self, dataset: &Dataset, schema: &Schema) -> Shape<Value> {
        match self.deref(schema)? {
            Schema::Array(array) => dataset
                .iter()
                .map(|record| self.record(record, &array.items))
                .collect::<Shape<Vec<_>>>()
                .map(Value::Array),
            Schema::Union(union) => resolve_union(union, |variant| self.records(dataset, variant)),
            other => Err(format!("'metrics' must be an array, schema is {:?}", kind(other))),
        }
    }

    fn record(&self, record: &Record, schema: &Schema) -> Shape<Value> {
        match self.deref(schema)? {
            Schema::Record(metric) => {
                for required in ["timestamp", "metadata", "data"] {
                    if !metric.fields.iter().any(|f| f.name == required) {
                        return Err(format!("metric record '{}' has no '{}' field", metric.name.name, required));
                    }
                }
                let mut fields = Vec::with_capacity(metric.fields.len());
                for field in &metric.fields {
                    let value = match field.name.as_str() {
                        "timestamp" => self.timestamp(&record.timestamp, &field.schema)?,
                        "metadata" => self.block("metadata", record.metadata.fields(), &field.schema)?,
                        "data" => self.block("data", record.data.fields(), &field.schema)?,
                        other => self.null_for(other, &field.schema)?,
                    };
                    fields.push((field.name.clone(), value));
                }
                Ok(Value::Record(fields))
            }
            Schema::Union(union) => resolve_union(union, |variant| self.record(record, variant)),
            other => Err(format!("metric must be a record, schema is {:?}", kind(other))),
        }
    }

    fn timestamp(&self, timestamp: &DateTime<Utc>, schema: &Schema) -> Shape<Value> {
        match self.deref(schema)? {
            Schema::TimestampMicros => Ok(Value::TimestampMicros(timestamp.timestamp_micros())),
            Schema::TimestampMillis => Ok(Value::TimestampMillis(timestamp.timestamp_millis())),
            Schema::Long => Ok(Value::Long(timestamp.timestamp_micros())),
            Schema::String => Ok(Value::String(timestamp.to_rfc3339_opts(SecondsFormat::Micros, true))),
            Schema::Union(union) => resolve_union(union, |variant| self.timestamp(timestamp, variant)),
            other => Err(format!("cannot store timestamp as {:?}", kind(other))),
        }
    }

    fn block(&self, block: &str, fields: Vec<(&'static str, FieldValue)>, schema: &Schema) -> Shape<Value> {
        match self.deref(schema)? {
            Schema::Record(record) => {
                if let Some((name, _)) = fields
                    .iter()
                    .find(|(name, _)| !record.fields.iter().any(|f| f.name == *name))
                {
                    return Err(format!("{} field '{}' is not present in record '{}'", block, name, record.name.name));
                }
                let mut out = Vec::with_capacity(record.fields.len());
                for field in &record.fields {
                    let value = match fields.iter().find(|(name, _)| *name == field.name) {
                        Some((name, value)) => self
                            .scalar(value, &field.schema)
                            .map_err(|reason| format!("{} field '{}': {}", block, name, reason))?,
                        None => self.null_for(&field.name, &field.schema)?,
                    };
                    out.push((field.name.clone(), value));
                }
                Ok(Value::Record(out))
            }
            Schema::Map(map) => fields
                .iter()
                .map(|(name, value)| {
                    self.scalar(value, &map.types)
                        .map(|v| (name.to_string(), v))
                        .map_err(|reason| format!("{} field '{}': {}", block, name, reason))
                })
                .collect::<Shape<_>>()
                .map(Value::Map),
            Schema::Union(union) => resolve_union(union, |variant| self.block(block, fields.clone(), variant)),
            other => Err(format!("{} must be a record or map, schema is {:?}", block, kind(other))),
        }
    }

    fn scalar(&self, value: &FieldValue, schema: &Schema) -> Shape<Value> {
        match (value, self.deref(schema)?) {
            (FieldValue::Text(s), Schema::String) => Ok(Value::String(s.clone())),
            (FieldValue::Number(n), Schema::Double) => Ok(Value::Double(*n)),
            (FieldValue::Number(n), Schema::Float) => Ok(Value::Float(*n as f32)),
            (value, Schema::Union(union)) => resolve_union(union, |variant| self.scalar(value, variant)),
            (value, other) => Err(format!("cannot store {} as {:?}", value.type_name(), kind(other))),
        }
    }
}

// ---- Avro → Dataset ----

fn unwrap_union(value: &Value) -> &Value {
    match value {
        Value::Union(_, inner) => unwrap_union(inner),
        other => other,
    }
}

fn record_field<'a>(fields: &'a [(String, Value)], name: &str) -> Shape<&'a Value> {
    fields
        .iter()
        .find(|(field, _)| field == name)
        .map(|(_, value)| value)
        .ok_or_else(|| format!("decoded record has no '{}' field", name))
}

fn avro_to_dataset(value: &Value) -> Shape<Dataset> {
    match unwrap_union(value) {
        Value::Record(fields) => avro_to_records(record_field(fields, "metrics")?),
        array @ Value::Array(_) => avro_to_records(array),
        other => Err(format!("decoded container is not a record or array: {:?}", other)),
    }
}

fn avro_to_records(value: &Value) -> Shape<Dataset> {
    match unwrap_union(value) {
        Value::Array(items) => items
            .iter()
            .map(avro_to_record)
            .collect::<Shape<Vec<_>>>()
            .map(Dataset::new),
        other => Err(format!("decoded 'metrics' is not an array: {:?}", other)),
    }
}

fn avro_to_record(value: &Value) -> Shape<Record> {
    let fields = match unwrap_union(value) {
        Value::Record(fields) => fields,
        other => return Err(format!("decoded metric is not a record: {:?}", other)),
    };
    let metadata = record_field(fields, "metadata")?;
    let data = record_field(fields, "data")?;
    Ok(Record {
        timestamp: avro_to_timestamp(record_field(fields, "timestamp")?)?,
        metadata: Metadata::from_lookup(|key| block_field(metadata, key).and_then(avro_to_scalar))?,
        data: Measurements::from_lookup(|key| block_field(data, key).and_then(avro_to_scalar))?,
    })
}

fn avro_to_timestamp(value: &Value) -> Shape<DateTime<Utc>> {
    let parsed = match unwrap_union(value) {
        Value::TimestampMicros(us) | Value::Long(us) => DateTime::from_timestamp_micros(*us),
        Value::TimestampMillis(ms) => DateTime::from_timestamp_millis(*ms),
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok(),
        other => return Err(format!("decoded timestamp has unsupported type: {:?}", other)),
    };
    parsed.ok_or_else(|| format!("decoded timestamp is out of range: {:?}", value))
}

fn block_field<'a>(block: &'a Value, key: &str) -> Shape<&'a Value> {
    match unwrap_union(block) {
        Value::Record(fields) => record_field(fields, key),
        Value::Map(entries) => entries
            .get(key)
            .ok_or_else(|| format!("decoded map has no '{}' entry", key)),
        other => Err(format!("decoded block is not a record or map: {:?}", other)),
    }
}

fn avro_to_scalar(value: &Value) -> Shape<FieldValue> {
    match unwrap_union(value) {
        Value::String(s) => Ok(FieldValue::Text(s.clone())),
        Value::Double(d) => Ok(FieldValue::Number(*d)),
        Value::Float(f) => Ok(FieldValue::Number(f64::from(*f))),
        Value::Long(l) => Ok(FieldValue::Number(*l as f64)),
        Value::Int(i) => Ok(FieldValue::Number(f64::from(*i))),
        other => Err(format!("decoded scalar has unsupported type: {:?}", other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::DataGenerator;

    fn codec_for(schema: &str) -> AvroCodec {
        AvroCodec::new(Arc::new(Schema::parse_str(schema).unwrap()))
    }

    fn bundled() -> AvroCodec {
        let text = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/schema"));
        codec_for(text)
    }

    const RECORD_BLOCKS: &str = r#"{
        "type": "array",
        "items": {
            "type": "record", "name": "Metric",
            "fields": [
                {"name": "timestamp", "type": "string"},
                {"name": "metadata", "type": {"type": "map", "values": "string"}},
                {"name": "data", "type": {
                    "type": "record", "name": "Data",
                    "fields": [
                        {"name": "band", "type": "string"},
                        {"name": "cell_id", "type": "double"},
                        {"name": "cqi", "type": "double"},
                        {"name": "dl_bw", "type": "double"},
                        {"name": "earfcn", "type": "double"},
                        {"name": "mcs", "type": "double"},
                        {"name": "phy_cell_id", "type": "double"},
                        {"name": "pmi", "type": "double"},
                        {"name": "ri", "type": "double"},
                        {"name": "rsrp", "type": "double"},
                        {"name": "rsrq", "type": "double"},
                        {"name": "rssi", "type": "double"},
                        {"name": "sinr", "type": "double"},
                        {"name": "txpower", "type": "double"},
                        {"name": "ul_bw", "type": "double"},
                        {"name": "comment", "type": ["null", "string"], "default": null}
                    ]
                }}
            ]
        }
    }"#;

    #[test]
    fn test_round_trip_bundled_schema() {
        let codec = bundled();
        let dataset = DataGenerator::seeded(11).generate(50);
        let bytes = codec.encode(&dataset).unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, dataset);
    }

    #[test]
    fn test_round_trip_alternate_shapes() {
        let codec = codec_for(RECORD_BLOCKS);
        let dataset = DataGenerator::seeded(12).generate(10);
        let bytes = codec.encode(&dataset).unwrap();
        let decoded = codec.decode(&bytes).unwrap();
        assert_eq!(decoded, dataset);
    }

    #[test]
    fn test_empty_dataset() {
        let codec = bundled();
        let bytes = codec.encode(&Dataset::default()).unwrap();
        assert!(codec.decode(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_missing_measurement_in_schema() {
        let schema = RECORD_BLOCKS.replace(r#"{"name": "rsrp", "type": "double"},"#, "");
        let codec = codec_for(&schema);
        let err = codec.encode(&DataGenerator::seeded(1).generate(1)).unwrap_err();
        assert!(matches!(err, CodecError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("rsrp"));
    }

    #[test]
    fn test_wrong_scalar_type() {
        let schema = RECORD_BLOCKS.replace(r#"{"name": "band", "type": "string"}"#, r#"{"name": "band", "type": "long"}"#);
        let codec = codec_for(&schema);
        let err = codec.encode(&DataGenerator::seeded(1).generate(1)).unwrap_err();
        assert!(matches!(err, CodecError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_container_must_hold_metrics() {
        let codec = codec_for(r#"{"type": "record", "name": "Other", "fields": [{"name": "x", "type": "long"}]}"#);
        let err = codec.encode(&Dataset::default()).unwrap_err();
        assert!(matches!(err, CodecError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_truncated_input() {
        let codec = bundled();
        let bytes = codec.encode(&DataGenerator::seeded(2).generate(5)).unwrap();
        let err = codec.decode(&bytes[..bytes.len() / 2]).unwrap_err();
        assert!(matches!(err, CodecError::Decode { .. }));
    }

    #[test]
    fn test_round_trip_named_reference() {
        // Metric is defined inside `latest`; `metrics` only names it
        let text = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/schema"));
        let container: serde_json::Value = serde_json::from_str(text).unwrap();
        let metric = container["fields"][0]["type"]["items"].clone();
        let schema = serde_json::json!({
            "type": "record",
            "name": "Container",
            "namespace": "telemetry",
            "fields": [
                {"name": "latest", "type": ["null", metric], "default": null},
                {"name": "metrics", "type": {"type": "array", "items": "Metric"}}
            ]
        });
        let codec = codec_for(&schema.to_string());
        assert!(matches!(
            &*codec.schema,
            Schema::Record(record) if matches!(
                &record.fields[1].schema,
                Schema::Array(array) if matches!(*array.items, Schema::Ref { .. })
            )
        ));

        let dataset = DataGenerator::seeded(13).generate(20);
        let bytes = codec.encode(&dataset).unwrap();
        assert_eq!(codec.decode(&bytes).unwrap(), dataset);
    }

    #[test]
    fn test_unresolved_reference() {
        let writer = Writer { names: &HashMap::new() };
        let schema = Schema::Ref { name: Name::new("Missing").unwrap() };
        let err = writer.records(&Dataset::default(), &schema).unwrap_err();
        assert!(err.contains("Missing"));
    }

    #[test]
    fn test_decoded_map_missing_key() {
        let schema = Schema::parse_str(
            r#"{
            "type": "record", "name": "Container",
            "fields": [{"name": "metrics", "type": {"type": "array", "items": {
                "type": "record", "name": "Metric",
                "fields": [
                    {"name": "timestamp", "type": {"type": "long", "logicalType": "timestamp-micros"}},
                    {"name": "metadata", "type": {"type": "map", "values": "string"}},
                    {"name": "data", "type": {"type": "map", "values": ["double", "string"]}}
                ]
            }}}]
        }"#,
        )
        .unwrap();

        let record = DataGenerator::seeded(3).generate(1).metrics.remove(0);
        let metadata = record
            .metadata
            .fields()
            .into_iter()
            .filter(|(key, _)| *key != "carrier")
            .map(|(key, value)| match value {
                FieldValue::Text(s) => (key.to_string(), Value::String(s)),
                FieldValue::Number(n) => (key.to_string(), Value::String(n.to_string())),
            })
            .collect();
        let data = record
            .data
            .fields()
            .into_iter()
            .map(|(key, value)| match value {
                FieldValue::Number(n) => (key.to_string(), Value::Union(0, Box::new(Value::Double(n)))),
                FieldValue::Text(s) => (key.to_string(), Value::Union(1, Box::new(Value::String(s)))),
            })
            .collect();
        let value = Value::Record(vec![(
            "metrics".to_string(),
            Value::Array(vec![Value::Record(vec![
                ("timestamp".to_string(), Value::TimestampMicros(record.timestamp.timestamp_micros())),
                ("metadata".to_string(), Value::Map(metadata)),
                ("data".to_string(), Value::Map(data)),
            ])]),
        )]);
        let bytes = apache_avro::to_avro_datum(&schema, value).unwrap();

        let err = AvroCodec::new(Arc::new(schema)).decode(&bytes).unwrap_err();
        assert!(matches!(err, CodecError::SchemaMismatch { .. }));
        assert!(err.to_string().contains("carrier"));
    }

    #[test]
    fn test_trailing_bytes() {
        let codec = bundled();
        let mut bytes = codec.encode(&DataGenerator::seeded(2).generate(1)).unwrap();
        bytes.push(0);
        let err = codec.decode(&bytes).unwrap_err();
        assert!(err.to_string().contains("trailing"));
    }
}
