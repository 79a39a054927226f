//! Type definitions for the synthetic telemetry dataset
//!
//! A record carries a timestamp, a fixed block of string metadata and a fixed
//! block of measurements. Both blocks are plain structs; `fields()` exposes
//! them as ordered name/value pairs for schema-driven encoders.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Scalar value of a metadata or measurement field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// String value
    Text(String),
    /// Floating-point value
    Number(f64),
}

impl FieldValue {
    /// Type name used in mismatch diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "string",
            FieldValue::Number(_) => "double",
        }
    }
}

/// Identification block of a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Band tag
    pub band_tag: String,
    /// Radio technology
    pub carrier: String,
    /// Serving cell identifier
    pub cell_id: String,
    /// Event type
    pub event_type: String,
    /// Device identifier
    pub imei: String,
    /// Device serial number
    pub serial_number: String,
}

impl Metadata {
    /// Metadata keys in serialization order
    pub const KEYS: [&'static str; 6] = [
        "band_tag",
        "carrier",
        "cell_id",
        "event_type",
        "imei",
        "serial_number",
    ];

    /// Metadata keys in serialization order
    pub fn keys() -> &'static [&'static str] {
        &Self::KEYS
    }

    /// Ordered name/value pairs
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        vec![
            ("band_tag", FieldValue::Text(self.band_tag.clone())),
            ("carrier", FieldValue::Text(self.carrier.clone())),
            ("cell_id", FieldValue::Text(self.cell_id.clone())),
            ("event_type", FieldValue::Text(self.event_type.clone())),
            ("imei", FieldValue::Text(self.imei.clone())),
            ("serial_number", FieldValue::Text(self.serial_number.clone())),
        ]
    }

    /// Rebuild from a lookup returning the value stored under a key.
    ///
    /// The lookup returns `Err` with a reason when a key is absent or has the
    /// wrong type; the first failure is propagated.
    pub fn from_lookup<E>(mut lookup: impl FnMut(&'static str) -> Result<FieldValue, E>) -> Result<Self, E>
    where
        E: From<String>,
    {
        let mut text = |key: &'static str| -> Result<String, E> {
            match lookup(key)? {
                FieldValue::Text(s) => Ok(s),
                other => Err(E::from(format!(
                    "metadata field '{}' must be a string, got {}",
                    key,
                    other.type_name()
                ))),
            }
        };
        Ok(Self {
            band_tag: text("band_tag")?,
            carrier: text("carrier")?,
            cell_id: text("cell_id")?,
            event_type: text("event_type")?,
            imei: text("imei")?,
            serial_number: text("serial_number")?,
        })
    }
}

/// Measurement block of a record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurements {
    /// Band label
    pub band: String,
    /// Cell identifier metric
    pub cell_id: f64,
    /// Channel quality indicator
    pub cqi: f64,
    /// Downlink bandwidth
    pub dl_bw: f64,
    /// E-UTRA absolute radio frequency channel number
    pub earfcn: f64,
    /// Modulation and coding scheme
    pub mcs: f64,
    /// Physical cell id
    pub phy_cell_id: f64,
    /// Precoding matrix indicator
    pub pmi: f64,
    /// Rank indicator
    pub ri: f64,
    /// Reference signal received power
    pub rsrp: f64,
    /// Reference signal received quality
    pub rsrq: f64,
    /// Received signal strength indicator
    pub rssi: f64,
    /// Signal to interference plus noise ratio
    pub sinr: f64,
    /// Transmit power
    pub txpower: f64,
    /// Uplink bandwidth
    pub ul_bw: f64,
}

impl Measurements {
    /// Measurement keys in serialization order
    pub const KEYS: [&'static str; 15] = [
        "band",
        "cell_id",
        "cqi",
        "dl_bw",
        "earfcn",
        "mcs",
        "phy_cell_id",
        "pmi",
        "ri",
        "rsrp",
        "rsrq",
        "rssi",
        "sinr",
        "txpower",
        "ul_bw",
    ];

    /// Measurement keys in serialization order
    pub fn keys() -> &'static [&'static str] {
        &Self::KEYS
    }

    /// Ordered name/value pairs
    pub fn fields(&self) -> Vec<(&'static str, FieldValue)> {
        let mut fields = Vec::with_capacity(Self::KEYS.len());
        fields.push(("band", FieldValue::Text(self.band.clone())));
        fields.extend(
            Self::KEYS[1..]
                .iter()
                .zip(self.metrics())
                .map(|(key, value)| (*key, FieldValue::Number(value))),
        );
        fields
    }

    /// Numeric metrics in key order, `band` excluded
    pub fn metrics(&self) -> [f64; 14] {
        [
            self.cell_id,
            self.cqi,
            self.dl_bw,
            self.earfcn,
            self.mcs,
            self.phy_cell_id,
            self.pmi,
            self.ri,
            self.rsrp,
            self.rsrq,
            self.rssi,
            self.sinr,
            self.txpower,
            self.ul_bw,
        ]
    }

    /// Rebuild from a lookup returning the value stored under a key.
    pub fn from_lookup<E>(mut lookup: impl FnMut(&'static str) -> Result<FieldValue, E>) -> Result<Self, E>
    where
        E: From<String>,
    {
        let band = match lookup("band")? {
            FieldValue::Text(s) => s,
            other => {
                return Err(E::from(format!(
                    "data field 'band' must be a string, got {}",
                    other.type_name()
                )))
            }
        };
        let mut number = |key: &'static str| -> Result<f64, E> {
            match lookup(key)? {
                FieldValue::Number(n) => Ok(n),
                other => Err(E::from(format!(
                    "data field '{}' must be a number, got {}",
                    key,
                    other.type_name()
                ))),
            }
        };
        Ok(Self {
            band,
            cell_id: number("cell_id")?,
            cqi: number("cqi")?,
            dl_bw: number("dl_bw")?,
            earfcn: number("earfcn")?,
            mcs: number("mcs")?,
            phy_cell_id: number("phy_cell_id")?,
            pmi: number("pmi")?,
            ri: number("ri")?,
            rsrp: number("rsrp")?,
            rsrq: number("rsrq")?,
            rssi: number("rssi")?,
            sinr: number("sinr")?,
            txpower: number("txpower")?,
            ul_bw: number("ul_bw")?,
        })
    }
}

/// One telemetry sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Generation time, microsecond precision
    pub timestamp: DateTime<Utc>,
    /// Identification block
    pub metadata: Metadata,
    /// Measurement block
    pub data: Measurements,
}

/// Ordered collection of records, serialized as `{"metrics": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Records in generation order
    pub metrics: Vec<Record>,
}

impl Dataset {
    /// Wrap a list of records
    pub fn new(metrics: Vec<Record>) -> Self {
        Self { metrics }
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Whether the dataset holds no records
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Iterate over the records
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.metrics.iter()
    }
}
