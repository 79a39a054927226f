//! Synthetic dataset generation
//!
//! Metadata is constant, measurements are i.i.d. uniform in `[0, 1)` drawn
//! from an explicitly supplied random source.

use crate::dataset::dataset_types::{Dataset, Measurements, Metadata, Record};
use chrono::{SubsecRound, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Builds telemetry records from a random source
#[derive(Debug)]
pub struct DataGenerator<R: Rng> {
    rng: R,
}

impl DataGenerator<StdRng> {
    /// Deterministic generator for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> DataGenerator<R> {
    /// Wrap a random source
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Generate `count` records
    pub fn generate(&mut self, count: usize) -> Dataset {
        let metrics: Vec<Record> = (0..count).map(|_| self.record()).collect();
        debug!(records = metrics.len(), "generated dataset");
        Dataset::new(metrics)
    }

    /// Generate one record stamped with the current time
    pub fn record(&mut self) -> Record {
        Record {
            timestamp: Utc::now().trunc_subsecs(6),
            metadata: Self::metadata(),
            data: self.measurements(),
        }
    }

    fn metadata() -> Metadata {
        Metadata {
            band_tag: "3".to_string(),
            carrier: "4g".to_string(),
            cell_id: "5149123".to_string(),
            event_type: "cellular".to_string(),
            imei: "13124125123".to_string(),
            serial_number: "S121Z1231".to_string(),
        }
    }

    fn measurements(&mut self) -> Measurements {
        let rng = &mut self.rng;
        Measurements {
            band: "5g".to_string(),
            cell_id: rng.random(),
            cqi: rng.random(),
            dl_bw: rng.random(),
            earfcn: rng.random(),
            mcs: rng.random(),
            phy_cell_id: rng.random(),
            pmi: rng.random(),
            ri: rng.random(),
            rsrp: rng.random(),
            rsrq: rng.random(),
            rssi: rng.random(),
            sinr: rng.random(),
            txpower: rng.random(),
            ul_bw: rng.random(),
        }
    }
}
