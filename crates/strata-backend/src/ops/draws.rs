use rayon::prelude::*;
use strata_common::error::Result;
use strata_common::types::{DataType, Value};
use strata_storage::{Column, Field, NullBitmap, Table};
use tracing::debug;

use super::{check_new_column, check_proportion, draw_count, group_rows};
use crate::BackendSettings;
use crate::rng::{draw_index, stratum_seed};

/// `floor(n * proportion)` draws per group of `n` rows, each an independent uniform
/// index in `[1, n]`. Groups too small for a single draw contribute nothing.
pub(crate) fn group_draws(
    table: &Table,
    group_by: &[String],
    proportion: f64,
    index_column: &str,
    seed: u64,
    settings: &BackendSettings,
) -> Result<Table> {
    check_proportion(proportion)?;
    check_new_column(&table.project(group_by)?, index_column)?;

    let groups = group_rows(table, group_by)?;
    let groups: Vec<(&Vec<Value>, &Vec<usize>)> = groups.iter().collect();

    let draw_group = |(key, rows): &(&Vec<Value>, &Vec<usize>)| -> (usize, Vec<i64>) {
        let n = rows.len() as u64;
        let group_seed = stratum_seed(seed, key);
        let draws = (0..draw_count(n, proportion))
            .map(|ordinal| draw_index(group_seed, ordinal, n) as i64)
            .collect();
        (rows[0], draws)
    };
    let per_group: Vec<(usize, Vec<i64>)> = if table.row_count() >= settings.parallel_threshold {
        debug!(groups = groups.len(), "Generating draws in parallel");
        groups.par_iter().map(draw_group).collect()
    } else {
        groups.iter().map(draw_group).collect()
    };

    let total: usize = per_group.iter().map(|(_, d)| d.len()).sum();
    let mut representatives = Vec::with_capacity(total);
    let mut indices = Vec::with_capacity(total);
    for (representative, draws) in per_group {
        representatives.extend(std::iter::repeat_n(representative, draws.len()));
        indices.extend(draws);
    }

    let keys = table.project(group_by)?.gather_rows(&representatives)?;
    let column = Column::Int64 {
        data: indices,
        nulls: NullBitmap::new_valid(total),
    };
    keys.with_column(Field::required(index_column, DataType::Int64), column)
}
