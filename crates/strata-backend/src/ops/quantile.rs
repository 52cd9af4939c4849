use strata_common::error::{Error, Result};
use strata_common::types::Value;
use strata_storage::{Column, Field, FieldMode, Table};

use super::{check_proportion, group_rows, nearest_rank, resolve_columns};

/// One row per group holding the group key and the nearest-rank `proportion` quantile
/// of `value_column`. The threshold is always an observed value. NULLs are ignored; a
/// group with only NULLs gets a NULL threshold.
pub(crate) fn group_quantile(
    table: &Table,
    group_by: &[String],
    value_column: &str,
    proportion: f64,
    output_column: &str,
) -> Result<Table> {
    check_proportion(proportion)?;
    if group_by.iter().any(|g| g == output_column) {
        return Err(Error::schema_mismatch(format!(
            "output column '{output_column}' collides with a grouping column"
        )));
    }
    let values = resolve_columns(table, &[value_column.to_string()])?[0];

    let groups = group_rows(table, group_by)?;
    let mut representatives = Vec::with_capacity(groups.len());
    let mut chosen = Vec::with_capacity(groups.len());
    for rows in groups.values() {
        representatives.push(rows[0]);
        chosen.push(quantile_row(values, rows, proportion));
    }

    let keys = table.project(group_by)?.gather_rows(&representatives)?;
    let field = Field::new(output_column, values.data_type(), FieldMode::Nullable);
    keys.with_column(field, values.gather(&chosen)?)
}

fn quantile_row(values: &Column, rows: &[usize], proportion: f64) -> usize {
    let mut present: Vec<(Value, usize)> = rows
        .iter()
        .filter(|&&row| !values.is_null(row))
        .map(|&row| (values.get_value(row), row))
        .collect();
    if present.is_empty() {
        return rows[0];
    }
    let rank = nearest_rank(present.len() as u64, proportion) as usize;
    let (_, (_, row), _) = present.select_nth_unstable(rank - 1);
    *row
}
