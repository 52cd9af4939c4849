use rayon::prelude::*;
use strata_common::error::Result;
use strata_common::types::DataType;
use strata_storage::{Column, Field, NullBitmap, Table};
use tracing::debug;

use super::check_new_column;
use crate::BackendSettings;
use crate::rng::row_label;

pub(crate) fn with_random_label(
    table: &Table,
    label_column: &str,
    seed: u64,
    settings: &BackendSettings,
) -> Result<Table> {
    check_new_column(table, label_column)?;
    let n = table.row_count();
    let labels: Vec<f64> = if n >= settings.parallel_threshold {
        debug!(rows = n, "Generating labels in parallel");
        (0..n as u64)
            .into_par_iter()
            .map(|row| row_label(seed, row))
            .collect()
    } else {
        (0..n as u64).map(|row| row_label(seed, row)).collect()
    };
    let column = Column::Float64 {
        data: labels,
        nulls: NullBitmap::new_valid(n),
    };
    table.with_column(Field::required(label_column, DataType::Float64), column)
}
