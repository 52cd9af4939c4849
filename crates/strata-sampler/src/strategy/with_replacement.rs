use strata_backend::{
    DataBackend, GroupCount, JoinPredicate, RelationSpec, describe_key, draw_count,
};
use strata_common::error::{Error, Result};
use strata_common::types::Value;
use tracing::debug;

use super::{DRAW_COLUMN, RANK_COLUMN, SamplePlan};
use crate::staging::StagingArea;

/// Number every row within its stratum, draw `floor(n * p)` ranks per stratum, and emit
/// one row per draw. Every draw must resolve to a row.
pub(super) fn execute<B: DataBackend + ?Sized>(
    staging: &mut StagingArea<'_, B>,
    plan: &SamplePlan<'_>,
) -> Result<u64> {
    let request = plan.request;
    let keys = request.strata.columns().to_vec();
    let rank = plan.fresh_column(RANK_COLUMN);
    let draw = plan.fresh_column(DRAW_COLUMN);

    let (ranked, rows) = staging.stage(
        "ranked",
        &RelationSpec::RowNumber {
            source: request.source.clone(),
            partition_by: keys.clone(),
            rank_column: rank.clone(),
        },
    )?;
    debug!(rows, rank = %rank, "Ranked source rows");

    let (draws, drawn) = staging.stage(
        "draws",
        &RelationSpec::GroupDraws {
            source: request.source.clone(),
            group_by: keys.clone(),
            proportion: request.proportion,
            index_column: draw.clone(),
            seed: plan.seed,
        },
    )?;
    let expected: u64 = plan
        .strata_sizes
        .iter()
        .map(|g| draw_count(g.count, request.proportion))
        .sum();
    debug!(drawn, expected, "Generated draws");

    let written = staging.create_output(
        &request.output,
        &RelationSpec::Join {
            left: ranked,
            right: draws,
            on: keys.clone(),
            predicate: Some(JoinPredicate::Eq {
                left: rank,
                right: draw,
            }),
            project: request.output_columns.clone(),
        },
    )?;

    if written != expected || drawn != expected {
        let written_per_stratum = staging.backend().row_count(&request.output, &keys)?;
        return Err(unresolved_draws(
            &keys,
            plan.strata_sizes,
            &written_per_stratum,
            request.proportion,
            written,
            expected,
        ));
    }
    Ok(written)
}

/// Names the first stratum whose output size differs from its draw count.
fn unresolved_draws(
    keys: &[String],
    strata_sizes: &[GroupCount],
    written: &[GroupCount],
    proportion: f64,
    total_written: u64,
    total_expected: u64,
) -> Error {
    let written_for = |key: &[Value]| {
        written
            .iter()
            .find(|g| g.key.as_slice() == key)
            .map_or(0, |g| g.count)
    };
    for stratum in strata_sizes {
        let expected = draw_count(stratum.count, proportion);
        let actual = written_for(&stratum.key);
        if actual != expected {
            return Error::consistency(
                describe_key(keys, &stratum.key),
                format!("{expected} draws resolved to {actual} rows"),
            );
        }
    }
    Error::consistency(
        describe_key(keys, &[]),
        format!("{total_expected} draws resolved to {total_written} rows"),
    )
}
