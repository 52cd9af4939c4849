use rustc_hash::FxHashMap;
use strata_common::error::Result;
use strata_common::types::{DataType, Value};
use strata_storage::{Column, Field, NullBitmap, Table};

use super::{check_new_column, resolve_columns};

/// Appends `rank_column`: 1, 2, 3, ... restarting for every partition, in row order.
pub(crate) fn row_number(
    table: &Table,
    partition_by: &[String],
    rank_column: &str,
) -> Result<Table> {
    check_new_column(table, rank_column)?;
    let key_columns = resolve_columns(table, partition_by)?;
    let n = table.row_count();

    let ranks: Vec<i64> = if key_columns.is_empty() {
        (1..=n as i64).collect()
    } else {
        let mut counters: FxHashMap<Vec<Value>, i64> = FxHashMap::default();
        (0..n)
            .map(|row| {
                let key: Vec<Value> = key_columns.iter().map(|c| c.get_value(row)).collect();
                let counter = counters.entry(key).or_insert(0);
                *counter += 1;
                *counter
            })
            .collect()
    };

    let column = Column::Int64 {
        data: ranks,
        nulls: NullBitmap::new_valid(n),
    };
    table.with_column(Field::required(rank_column, DataType::Int64), column)
}
