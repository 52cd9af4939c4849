use mockall::mock;
use strata_backend::{DataBackend, GroupCount, MemoryBackend, RelationName, RelationSpec};
use strata_common::error::Result;
use strata_common::types::{DataType, Value};
use strata_storage::{Field, Schema, Table};

mock! {
    pub Backend {}

    impl DataBackend for Backend {
        fn relation_exists(&self, name: &RelationName) -> Result<bool>;
        fn is_empty(&self, name: &RelationName) -> Result<bool>;
        fn columns(&self, name: &RelationName) -> Result<Vec<String>>;
        fn row_count(&self, name: &RelationName, group_by: &[String]) -> Result<Vec<GroupCount>>;
        fn create_relation(&self, name: &RelationName, spec: &RelationSpec) -> Result<u64>;
        fn drop_relation(&self, name: &RelationName) -> Result<()>;
    }
}

pub fn name(s: &str) -> RelationName {
    RelationName::new(s).unwrap()
}

/// `id`, `group`, `score`: `a` rows of group "a" followed by `b` rows of group "b".
pub fn people_table(a: usize, b: usize) -> Table {
    let schema = Schema::from_fields(vec![
        Field::required("id", DataType::Int64),
        Field::nullable("group", DataType::String),
        Field::nullable("score", DataType::Float64),
    ]);
    let rows = (0..a + b)
        .map(|i| {
            let group = if i < a { "a" } else { "b" };
            vec![
                Value::int64(i as i64 + 1),
                Value::string(group),
                Value::float64(i as f64 * 1.5),
            ]
        })
        .collect();
    Table::from_values(schema, rows).unwrap()
}

/// Backend holding `people` with strata of 12 and 6 rows.
pub fn two_strata_backend() -> MemoryBackend {
    let backend = MemoryBackend::new();
    backend
        .insert_table(name("people"), people_table(12, 6))
        .unwrap();
    backend
}
