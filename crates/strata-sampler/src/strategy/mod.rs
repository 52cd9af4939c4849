mod with_replacement;
mod without_replacement;

use std::fmt;

use serde::{Deserialize, Serialize};
use strata_backend::{DataBackend, GroupCount};
use strata_common::error::Result;

use crate::staging::StagingArea;
use crate::validator::ValidatedRequest;

pub const LABEL_COLUMN: &str = "__strata_label";
pub const THRESHOLD_COLUMN: &str = "__strata_threshold";
pub const RANK_COLUMN: &str = "__strata_rank";
pub const DRAW_COLUMN: &str = "__strata_draw";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SamplingStrategy {
    WithoutReplacement,
    WithReplacement,
}

impl SamplingStrategy {
    pub fn for_request(with_replacement: bool) -> Self {
        if with_replacement {
            SamplingStrategy::WithReplacement
        } else {
            SamplingStrategy::WithoutReplacement
        }
    }

    /// Runs the pipeline for `plan`, materializing the output through `staging`.
    /// Returns the number of rows written.
    pub(crate) fn execute<B: DataBackend + ?Sized>(
        self,
        staging: &mut StagingArea<'_, B>,
        plan: &SamplePlan<'_>,
    ) -> Result<u64> {
        match self {
            SamplingStrategy::WithoutReplacement => without_replacement::execute(staging, plan),
            SamplingStrategy::WithReplacement => with_replacement::execute(staging, plan),
        }
    }
}

impl fmt::Display for SamplingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SamplingStrategy::WithoutReplacement => f.write_str("without_replacement"),
            SamplingStrategy::WithReplacement => f.write_str("with_replacement"),
        }
    }
}

/// Everything a strategy needs, resolved before the first mutating call.
#[derive(Debug)]
pub(crate) struct SamplePlan<'a> {
    pub request: &'a ValidatedRequest,
    pub seed: u64,
    /// Rows per stratum of the source relation.
    pub strata_sizes: &'a [GroupCount],
}

impl SamplePlan<'_> {
    pub fn total_rows(&self) -> u64 {
        self.strata_sizes.iter().map(|g| g.count).sum()
    }

    /// A column name starting with `base` that the source relation does not use.
    pub fn fresh_column(&self, base: &str) -> String {
        fresh_column(base, &self.request.source_columns)
    }
}

pub(crate) fn fresh_column(base: &str, taken: &[String]) -> String {
    if !taken.iter().any(|c| c == base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}_{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or_else(|| base.to_string())
}
