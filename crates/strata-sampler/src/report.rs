use std::time::Duration;

use serde::{Deserialize, Serialize};
use strata_backend::RelationName;

use crate::SamplingStrategy;

/// Outcome of a successful invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleReport {
    pub output: RelationName,
    pub strategy: SamplingStrategy,
    /// Seed the invocation ran with; pass it back through the config to reproduce it.
    pub seed: u64,
    /// Number of strata in the source relation (1 for the global stratum).
    pub strata: usize,
    pub rows_read: u64,
    pub rows_written: u64,
    pub elapsed: Duration,
}

impl SampleReport {
    /// Fraction of source rows that reached the output.
    pub fn sampling_ratio(&self) -> f64 {
        if self.rows_read == 0 {
            return 0.0;
        }
        self.rows_written as f64 / self.rows_read as f64
    }
}
