use strata_common::error::Result;
use strata_storage::Table;

use super::group_rows;
use crate::GroupCount;

pub(crate) fn row_count(table: &Table, group_by: &[String]) -> Result<Vec<GroupCount>> {
    if group_by.is_empty() {
        return Ok(vec![GroupCount::new(Vec::new(), table.row_count() as u64)]);
    }
    Ok(group_rows(table, group_by)?
        .into_iter()
        .map(|(key, rows)| GroupCount::new(key, rows.len() as u64))
        .collect())
}
