//! Command-line configuration
//!
//! Every option has a default, so a bare invocation runs the fixed sequence:
//! 1000 records, schema file `schema`, gzip level 9, text output.

use crate::dataset::constants::DEFAULT_RECORD_COUNT;
use crate::error::{Error, Result};
use crate::schema::DEFAULT_SCHEMA_PATH;
use clap::Parser;
use std::path::PathBuf;

/// Compare encoded sizes of Avro, JSON and bincode over synthetic telemetry
#[derive(Debug, Clone, Parser)]
#[command(name = "telemetry-codec-bench")]
#[command(author, version, about, long_about = None)]
pub struct HarnessConfig {
    /// Avro schema file
    #[arg(long, default_value = DEFAULT_SCHEMA_PATH)]
    pub schema: PathBuf,

    /// Number of records to generate
    #[arg(short = 'n', long, default_value_t = DEFAULT_RECORD_COUNT)]
    pub count: usize,

    /// Seed for the measurement generator (random when absent)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Gzip compression level, 0-9
    #[arg(long, default_value_t = 9, value_parser = clap::value_parser!(u32).range(0..=9))]
    pub level: u32,

    /// Print the report as JSON instead of text lines
    #[arg(long)]
    pub json: bool,

    /// Also save the JSON report into this directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            schema: PathBuf::from(DEFAULT_SCHEMA_PATH),
            count: DEFAULT_RECORD_COUNT,
            seed: None,
            level: 9,
            json: false,
            output: None,
            verbose: false,
        }
    }
}

impl HarnessConfig {
    /// Reject values clap cannot express as ranges
    pub fn validate(&self) -> Result<()> {
        if self.count == 0 {
            return Err(Error::Configuration {
                message: "record count must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Default log filter when `RUST_LOG` is unset
    pub fn log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "info"
        }
    }
}
