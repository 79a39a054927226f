//! JSON report files
//!
//! Saves a run's report to a timestamped file for later comparison.

use crate::report::BenchmarkReport;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Errors that can occur while writing or reading report files
#[derive(Debug, Error)]
pub enum ReporterError {
    /// Filesystem failure
    #[error("Report file error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failure
    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Writes reports as JSON files into one directory
#[derive(Debug, Clone)]
pub struct JsonReporter {
    output_dir: PathBuf,
}

impl JsonReporter {
    /// Create a reporter, creating `output_dir` if needed
    pub fn new(output_dir: impl AsRef<Path>) -> Result<Self, ReporterError> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;
        Ok(Self { output_dir })
    }

    /// Save `report` to `codec_sizes_<timestamp>.json`, returning its path
    pub fn save(&self, report: &BenchmarkReport) -> Result<PathBuf, ReporterError> {
        let timestamp = report.timestamp.format("%Y-%m-%dT%H-%M-%S%.3fZ");
        let filepath = self.output_dir.join(format!("codec_sizes_{}.json", timestamp));

        let writer = BufWriter::new(File::create(&filepath)?);
        serde_json::to_writer_pretty(writer, report)?;

        info!(path = %filepath.display(), "saved report");
        Ok(filepath)
    }

    /// Load a report saved by [`JsonReporter::save`]
    pub fn load(path: impl AsRef<Path>) -> Result<BenchmarkReport, ReporterError> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}
