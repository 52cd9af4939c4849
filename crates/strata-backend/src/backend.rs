use std::sync::Arc;

use serde::{Deserialize, Serialize};
use strata_common::error::Result;
use strata_common::types::Value;

use crate::{RelationName, RelationSpec};

/// Number of rows sharing one grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupCount {
    pub key: Vec<Value>,
    pub count: u64,
}

impl GroupCount {
    pub fn new(key: Vec<Value>, count: u64) -> Self {
        Self { key, count }
    }

    /// Renders the key as `a=1, b='x'` for error messages. An empty key is the global
    /// group.
    pub fn describe(&self, columns: &[String]) -> String {
        describe_key(columns, &self.key)
    }
}

pub fn describe_key(columns: &[String], key: &[Value]) -> String {
    if key.is_empty() {
        return "<all rows>".to_string();
    }
    columns
        .iter()
        .zip(key)
        .map(|(c, v)| format!("{c}={v:?}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Storage and query engine the sampler drives.
///
/// All heavy work happens inside [`create_relation`](Self::create_relation); the other
/// calls are metadata lookups. Implementations must be safe to share across threads.
pub trait DataBackend: Send + Sync {
    fn relation_exists(&self, name: &RelationName) -> Result<bool>;

    /// Fails with `NotFound` when the relation is missing.
    fn is_empty(&self, name: &RelationName) -> Result<bool>;

    /// Column names in storage order. Fails with `NotFound` when the relation is missing.
    fn columns(&self, name: &RelationName) -> Result<Vec<String>>;

    /// Row counts per distinct `group_by` key, in first-seen order. With no grouping
    /// columns the result is a single entry with an empty key, even for an empty relation.
    fn row_count(&self, name: &RelationName, group_by: &[String]) -> Result<Vec<GroupCount>>;

    /// Materializes `spec` as a new relation and returns its row count. Fails with
    /// `AlreadyExists` when `name` is taken; nothing is created on failure.
    fn create_relation(&self, name: &RelationName, spec: &RelationSpec) -> Result<u64>;

    /// Removes a relation. Dropping a missing relation is not an error.
    fn drop_relation(&self, name: &RelationName) -> Result<()>;
}

macro_rules! forward_backend {
    ($ty:ty) => {
        impl<B: DataBackend + ?Sized> DataBackend for $ty {
            fn relation_exists(&self, name: &RelationName) -> Result<bool> {
                (**self).relation_exists(name)
            }

            fn is_empty(&self, name: &RelationName) -> Result<bool> {
                (**self).is_empty(name)
            }

            fn columns(&self, name: &RelationName) -> Result<Vec<String>> {
                (**self).columns(name)
            }

            fn row_count(
                &self,
                name: &RelationName,
                group_by: &[String],
            ) -> Result<Vec<GroupCount>> {
                (**self).row_count(name, group_by)
            }

            fn create_relation(&self, name: &RelationName, spec: &RelationSpec) -> Result<u64> {
                (**self).create_relation(name, spec)
            }

            fn drop_relation(&self, name: &RelationName) -> Result<()> {
                (**self).drop_relation(name)
            }
        }
    };
}

forward_backend!(Arc<B>);
forward_backend!(&B);

/// Tuning knobs for [`MemoryBackend`](crate::MemoryBackend).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    /// Random generation runs on the rayon pool once a relation has at least this many
    /// rows.
    pub parallel_threshold: usize,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            parallel_threshold: 16_384,
        }
    }
}
