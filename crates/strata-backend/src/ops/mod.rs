mod count;
mod draws;
mod join;
mod label;
mod quantile;
mod rank;
mod select;

pub(crate) use count::row_count;
pub(crate) use draws::group_draws;
pub(crate) use join::join;
pub(crate) use label::with_random_label;
pub(crate) use quantile::group_quantile;
pub(crate) use rank::row_number;
pub(crate) use select::{project, sort_limit};

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use strata_common::error::{Error, Result};
use strata_common::types::Value;
use strata_storage::{Column, Table};

pub(crate) type GroupMap = IndexMap<Vec<Value>, Vec<usize>, FxBuildHasher>;

const SNAP_TOLERANCE: f64 = 1e-9;

/// `n * proportion`, snapped to the nearest integer when it lies within rounding
/// error of one, so that e.g. `10 * 0.7` counts as exactly 7.
fn scaled(n: u64, proportion: f64) -> f64 {
    let x = n as f64 * proportion;
    let nearest = x.round();
    if (x - nearest).abs() <= SNAP_TOLERANCE * nearest.abs().max(1.0) {
        nearest
    } else {
        x
    }
}

/// `floor(n * proportion)`: the number of draws taken from a group of `n` rows.
pub fn draw_count(n: u64, proportion: f64) -> u64 {
    (scaled(n, proportion).floor() as u64).min(n)
}

/// `ceil(n * proportion)`: the 1-indexed nearest-rank position of the `proportion`
/// quantile in a group of `n` rows. Never below 1 for a non-empty group.
pub fn nearest_rank(n: u64, proportion: f64) -> u64 {
    if n == 0 {
        return 0;
    }
    (scaled(n, proportion).ceil() as u64).clamp(1, n)
}

/// Rejects proportions outside `(0, 1]`, including NaN and infinities.
pub fn check_proportion(proportion: f64) -> Result<()> {
    if proportion.is_finite() && proportion > 0.0 && proportion <= 1.0 {
        Ok(())
    } else {
        Err(Error::invalid_argument(format!(
            "proportion must be in (0, 1], got {proportion}"
        )))
    }
}

pub(crate) fn resolve_columns<'t>(table: &'t Table, names: &[String]) -> Result<Vec<&'t Column>> {
    let indices = table.schema().resolve_indices(names)?;
    indices
        .into_iter()
        .map(|i| {
            table
                .column(i)
                .ok_or_else(|| Error::internal(format!("column index {i} out of range")))
        })
        .collect()
}

pub(crate) fn check_new_column(table: &Table, name: &str) -> Result<()> {
    if table.schema().contains(name) {
        return Err(Error::schema_mismatch(format!(
            "column '{name}' already exists in the input relation"
        )));
    }
    Ok(())
}

/// Row positions per distinct key, in first-seen order. NULL key values compare equal.
pub(crate) fn group_rows(table: &Table, group_by: &[String]) -> Result<GroupMap> {
    let key_columns = resolve_columns(table, group_by)?;
    let mut groups = GroupMap::default();
    for row in 0..table.row_count() {
        let key: Vec<Value> = key_columns.iter().map(|c| c.get_value(row)).collect();
        groups.entry(key).or_default().push(row);
    }
    Ok(groups)
}
