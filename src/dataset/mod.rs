//! Dataset module for synthetic telemetry records
//!
//! This module defines the record types shared by every codec and the
//! generator that fills them.

pub mod dataset_generator;
pub mod dataset_types;

// Re-export main types for convenience
pub use dataset_generator::DataGenerator;
pub use dataset_types::{Dataset, FieldValue, Measurements, Metadata, Record};

/// Dataset constants
pub mod constants {
    //! Constants used throughout the dataset module

    /// Default number of records per generated dataset
    pub const DEFAULT_RECORD_COUNT: usize = 1000;
}
