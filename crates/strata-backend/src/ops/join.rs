use rustc_hash::FxHashMap;
use strata_common::error::{Error, Result};
use strata_common::types::Value;
use strata_storage::{Column, Schema, Table};

use super::resolve_columns;
use crate::JoinPredicate;

enum Side {
    Left(usize),
    Right(usize),
}

/// Hash join on the shared `on` columns, matched null-safely. An `Eq` predicate joins
/// the hash key; a `LessEq` predicate filters each key-matched pair, and a NULL on
/// either side of a predicate never matches.
pub(crate) fn join(
    left: &Table,
    right: &Table,
    on: &[String],
    predicate: Option<&JoinPredicate>,
    project: &[String],
) -> Result<Table> {
    if project.is_empty() {
        return Err(Error::invalid_argument("join must project at least one column"));
    }
    let outputs = resolve_outputs(left, right, project)?;

    let left_keys = resolve_columns(left, on)?;
    let right_keys = resolve_columns(right, on)?;
    let predicate_columns = match predicate {
        Some(p) => Some((
            resolve_columns(left, &[p.left_column().to_string()])?[0],
            resolve_columns(right, &[p.right_column().to_string()])?[0],
        )),
        None => None,
    };
    let (left_extra, right_extra) = match (predicate, predicate_columns) {
        (Some(JoinPredicate::Eq { .. }), Some((l, r))) => (Some(l), Some(r)),
        _ => (None, None),
    };

    let mut hash_table: FxHashMap<Vec<Value>, Vec<usize>> = FxHashMap::default();
    for row in 0..right.row_count() {
        if let Some(key) = join_key(&right_keys, right_extra, row) {
            hash_table.entry(key).or_default().push(row);
        }
    }

    let mut left_rows = Vec::new();
    let mut right_rows = Vec::new();
    for row in 0..left.row_count() {
        let Some(key) = join_key(&left_keys, left_extra, row) else {
            continue;
        };
        let Some(matches) = hash_table.get(&key) else {
            continue;
        };
        for &other in matches {
            let keep = match (predicate, predicate_columns) {
                (Some(JoinPredicate::LessEq { .. }), Some((l, r))) => {
                    let lv = l.get_value(row);
                    let rv = r.get_value(other);
                    !lv.is_null() && !rv.is_null() && lv <= rv
                }
                _ => true,
            };
            if keep {
                left_rows.push(row);
                right_rows.push(other);
            }
        }
    }

    let mut fields = Vec::with_capacity(outputs.len());
    let mut columns = Vec::with_capacity(outputs.len());
    for side in outputs {
        let (table, idx, rows) = match side {
            Side::Left(idx) => (left, idx, &left_rows),
            Side::Right(idx) => (right, idx, &right_rows),
        };
        fields.push(table.schema().fields()[idx].clone());
        let column = table
            .column(idx)
            .ok_or_else(|| Error::internal(format!("column index {idx} out of range")))?;
        columns.push(column.gather(rows)?);
    }
    Table::from_columns(Schema::from_fields(fields), columns)
}

fn join_key(columns: &[&Column], extra: Option<&Column>, row: usize) -> Option<Vec<Value>> {
    let mut key: Vec<Value> = columns.iter().map(|c| c.get_value(row)).collect();
    if let Some(col) = extra {
        let value = col.get_value(row);
        if value.is_null() {
            return None;
        }
        key.push(value);
    }
    Some(key)
}

fn resolve_outputs(left: &Table, right: &Table, project: &[String]) -> Result<Vec<Side>> {
    let mut outputs = Vec::with_capacity(project.len());
    let mut missing = Vec::new();
    for name in project {
        if let Some(idx) = left.schema().field_index(name) {
            outputs.push(Side::Left(idx));
        } else if let Some(idx) = right.schema().field_index(name) {
            outputs.push(Side::Right(idx));
        } else {
            missing.push(name.as_str());
        }
    }
    if !missing.is_empty() {
        return Err(Error::schema_mismatch(format!(
            "unknown column(s): {}",
            missing.join(", ")
        )));
    }
    Ok(outputs)
}
