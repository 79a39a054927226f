//! Size report types
//!
//! One [`SizeReport`] per codec/mode combination, collected in a
//! [`BenchmarkReport`] that renders as text lines or JSON.

use crate::codec::CodecKind;
use crate::compression::Mode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoded size of the dataset for one codec and mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeReport {
    /// Codec under test
    pub codec: CodecKind,
    /// Plain or compressed
    pub mode: Mode,
    /// Total payload size in bytes
    pub bytes: usize,
    /// Records in the dataset
    pub records: usize,
}

impl SizeReport {
    /// Create a report entry
    pub fn new(codec: CodecKind, mode: Mode, bytes: usize, records: usize) -> Self {
        Self {
            codec,
            mode,
            bytes,
            records,
        }
    }

    /// Average bytes per record, truncated; 0 for an empty dataset
    pub fn per_record(&self) -> usize {
        self.bytes.checked_div(self.records).unwrap_or(0)
    }

    /// `"<codec> <mode>"`, e.g. `avro compressed`
    pub fn label(&self) -> String {
        format!("{} {}", self.codec, self.mode)
    }
}

impl fmt::Display for SizeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>20} length {} - {} metrics, {} bytes per metric",
            self.label(),
            self.bytes,
            self.records,
            self.per_record()
        )
    }
}

/// All size reports of one harness run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkReport {
    /// When the run finished
    pub timestamp: DateTime<Utc>,
    /// Records in the dataset
    pub records: usize,
    /// Per-combination results, in run order
    pub results: Vec<SizeReport>,
}

impl BenchmarkReport {
    /// Create an empty report for a dataset of `records` records
    pub fn new(records: usize) -> Self {
        Self {
            timestamp: Utc::now(),
            records,
            results: Vec::new(),
        }
    }

    /// Append a result
    pub fn add_result(&mut self, result: SizeReport) {
        self.results.push(result);
    }

    /// Look up the result of one combination
    pub fn find(&self, codec: CodecKind, mode: Mode) -> Option<&SizeReport> {
        self.results
            .iter()
            .find(|r| r.codec == codec && r.mode == mode)
    }

    /// One line per result
    pub fn render_text(&self) -> String {
        self.results
            .iter()
            .map(|r| format!("{}\n", r))
            .collect()
    }

    /// Pretty-printed JSON
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
