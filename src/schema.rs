//! Avro schema loading
//!
//! The schema is read once at startup and shared read-only by the Avro codec.

use crate::error::{SchemaError, SchemaResult};
use apache_avro::Schema;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Default schema file name, resolved against the working directory
pub const DEFAULT_SCHEMA_PATH: &str = "schema";

/// Read and parse the schema file at `path`
pub fn load_schema(path: impl AsRef<Path>) -> SchemaResult<Arc<Schema>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let schema = Schema::parse_str(&text).map_err(|e| SchemaError::Parse {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    debug!(path = %path.display(), "loaded avro schema");
    Ok(Arc::new(schema))
}
