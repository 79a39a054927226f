//! Report module for encoded size results

pub mod report_json;
pub mod report_types;

pub use report_json::{JsonReporter, ReporterError};
pub use report_types::{BenchmarkReport, SizeReport};
