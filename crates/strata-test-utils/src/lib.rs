#![allow(dead_code)]

use std::collections::HashSet;

use strata::{StrataEngine, StrataSession};
use strata_common::error::{ErrorKind, Result};
use strata_common::types::{DataType, Value};
use strata_storage::{Field, Schema, Table};

pub fn setup_session() -> StrataSession {
    StrataEngine::new().create_session()
}

/// Session whose invocations all run with `seed`.
pub fn seeded_session(seed: u64) -> StrataSession {
    let session = setup_session();
    session.set_variable(strata::SEED_VARIABLE, Value::int64(seed as i64));
    session
}

/// Columns `id` (1-based, unique), `region`, `tier`, `amount`. One stratum per entry of
/// `strata`: its region name and row count. Tiers alternate "gold"/"silver" within a
/// region.
pub fn strata_table(strata: &[(&str, usize)]) -> Table {
    let schema = Schema::from_fields(vec![
        Field::required("id", DataType::Int64),
        Field::nullable("region", DataType::String),
        Field::nullable("tier", DataType::String),
        Field::nullable("amount", DataType::Float64),
    ]);
    let mut rows = Vec::new();
    for (region, size) in strata {
        for i in 0..*size {
            let id = rows.len() as i64 + 1;
            let tier = if i % 2 == 0 { "gold" } else { "silver" };
            rows.push(vec![
                Value::int64(id),
                Value::string(*region),
                Value::string(tier),
                Value::float64(id as f64 * 2.5),
            ]);
        }
    }
    Table::from_values(schema, rows).expect("fixture table is well formed")
}

/// `sales` with an `east` stratum of 12 rows and a `west` stratum of 6.
pub fn load_two_strata(session: &StrataSession) {
    session
        .create_table("sales", strata_table(&[("east", 12), ("west", 6)]))
        .expect("create sales");
}

/// Rows per distinct value of `column`, in first-seen order, keyed by the display form.
pub fn stratum_sizes(table: &Table, column: &str) -> Vec<(String, usize)> {
    let values = table
        .column_by_name(column)
        .unwrap_or_else(|| panic!("column {column} missing"));
    let mut sizes: Vec<(String, usize)> = Vec::new();
    for row in 0..table.row_count() {
        let key = values.get_value(row).to_string();
        match sizes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => sizes.push((key, 1)),
        }
    }
    sizes
}

pub fn int_column(table: &Table, column: &str) -> Vec<i64> {
    let values = table
        .column_by_name(column)
        .unwrap_or_else(|| panic!("column {column} missing"));
    (0..table.row_count())
        .map(|row| values.get_value(row).as_i64().expect("int64 value"))
        .collect()
}

pub fn assert_distinct(values: &[i64]) {
    let unique: HashSet<&i64> = values.iter().collect();
    assert_eq!(
        unique.len(),
        values.len(),
        "expected distinct values, got {values:?}"
    );
}

pub fn assert_float_eq(actual: f64, expected: f64, epsilon: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff < epsilon,
        "Float values not equal within epsilon: actual={}, expected={}, diff={}, epsilon={}",
        actual,
        expected,
        diff,
        epsilon
    );
}

pub fn assert_error_kind<T: std::fmt::Debug>(result: Result<T>, kind: ErrorKind) {
    match result {
        Ok(value) => panic!("Expected {kind} error but got Ok({value:?})"),
        Err(e) => assert_eq!(e.kind(), kind, "unexpected error: {e}"),
    }
}

pub fn assert_error_contains<T>(result: Result<T>, keywords: &[&str]) {
    match result {
        Ok(_) => panic!("Expected error but got Ok result"),
        Err(e) => {
            let error_msg = e.to_string().to_lowercase();
            let found = keywords
                .iter()
                .any(|keyword| error_msg.contains(&keyword.to_lowercase()));
            assert!(
                found,
                "Error message '{}' does not contain any of the expected keywords: {:?}",
                e, keywords
            );
        }
    }
}
