use strata_common::error::Result;
use strata_common::types::Value;
use strata_storage::Table;

use super::resolve_columns;

pub(crate) fn project(table: &Table, columns: &[String]) -> Result<Table> {
    table.project(columns)
}

/// Rows ordered by `order_by` ascending (NULLs last, ties by position), cut to `limit`.
pub(crate) fn sort_limit(
    table: &Table,
    order_by: &str,
    limit: u64,
    columns: &[String],
) -> Result<Table> {
    let projected = table.project(columns)?;
    let order_column = resolve_columns(table, &[order_by.to_string()])?[0];

    let mut keyed: Vec<(Value, usize)> = (0..table.row_count())
        .map(|row| (order_column.get_value(row), row))
        .collect();
    let limit = usize::try_from(limit).unwrap_or(usize::MAX).min(keyed.len());
    if limit == 0 {
        return projected.gather_rows(&[]);
    }
    if limit < keyed.len() {
        keyed.select_nth_unstable(limit - 1);
        keyed.truncate(limit);
    }
    keyed.sort_unstable();

    let indices: Vec<usize> = keyed.into_iter().map(|(_, row)| row).collect();
    projected.gather_rows(&indices)
}
