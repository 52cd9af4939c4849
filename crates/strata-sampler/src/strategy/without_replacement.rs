use strata_backend::{DataBackend, JoinPredicate, RelationSpec, draw_count};
use strata_common::error::Result;
use tracing::debug;

use super::{LABEL_COLUMN, SamplePlan, THRESHOLD_COLUMN};
use crate::staging::StagingArea;

/// Label every row, then keep the rows whose label is at most their stratum's
/// nearest-rank quantile. The global stratum takes the `floor(total * p)` smallest
/// labels instead.
pub(super) fn execute<B: DataBackend + ?Sized>(
    staging: &mut StagingArea<'_, B>,
    plan: &SamplePlan<'_>,
) -> Result<u64> {
    let request = plan.request;
    let label = plan.fresh_column(LABEL_COLUMN);
    let (labeled, rows) = staging.stage(
        "labeled",
        &RelationSpec::WithRandomLabel {
            source: request.source.clone(),
            label_column: label.clone(),
            seed: plan.seed,
        },
    )?;
    debug!(rows, label = %label, "Labeled source rows");

    if request.strata.is_global() {
        let limit = draw_count(plan.total_rows(), request.proportion);
        debug!(limit, "Selecting smallest labels");
        return staging.create_output(
            &request.output,
            &RelationSpec::SortLimit {
                source: labeled,
                order_by: label,
                limit,
                project: request.output_columns.clone(),
            },
        );
    }

    let threshold = plan.fresh_column(THRESHOLD_COLUMN);
    let (thresholds, strata) = staging.stage(
        "thresholds",
        &RelationSpec::GroupQuantile {
            source: labeled.clone(),
            group_by: request.strata.columns().to_vec(),
            value_column: label.clone(),
            proportion: request.proportion,
            output_column: threshold.clone(),
        },
    )?;
    debug!(strata, "Computed stratum thresholds");

    staging.create_output(
        &request.output,
        &RelationSpec::Join {
            left: labeled,
            right: thresholds,
            on: request.strata.columns().to_vec(),
            predicate: Some(JoinPredicate::LessEq {
                left: label,
                right: threshold,
            }),
            project: request.output_columns.clone(),
        },
    )
}
