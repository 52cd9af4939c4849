use std::sync::Arc;

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use strata_common::error::{Error, Result};
use strata_storage::{Schema, Table};
use tracing::{debug, instrument};

use crate::{BackendSettings, DataBackend, GroupCount, RelationName, RelationSpec, ops};

/// In-memory columnar backend.
///
/// Relations are immutable once created and shared behind `Arc`, so readers never
/// block a concurrent `create_relation` for longer than a map lookup.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    relations: DashMap<RelationName, Arc<Table>>,
    settings: BackendSettings,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: BackendSettings) -> Self {
        Self {
            relations: DashMap::new(),
            settings,
        }
    }

    pub fn settings(&self) -> &BackendSettings {
        &self.settings
    }

    /// Registers a table under `name`. Fails with `AlreadyExists` if the name is taken.
    pub fn insert_table(&self, name: RelationName, table: Table) -> Result<()> {
        table.schema().validate()?;
        match self.relations.entry(name) {
            Entry::Occupied(entry) => Err(Error::already_exists(entry.key().to_string())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(table));
                Ok(())
            }
        }
    }

    pub fn table(&self, name: &RelationName) -> Result<Arc<Table>> {
        self.relations
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| Error::not_found(name.to_string()))
    }

    pub fn schema(&self, name: &RelationName) -> Result<Schema> {
        Ok(self.table(name)?.schema().clone())
    }

    /// Names of all relations, sorted.
    pub fn relation_names(&self) -> Vec<RelationName> {
        let mut names: Vec<RelationName> =
            self.relations.iter().map(|entry| entry.key().clone()).collect();
        names.sort();
        names
    }

    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    fn evaluate(&self, spec: &RelationSpec) -> Result<Table> {
        match spec {
            RelationSpec::Project { source, columns } => {
                ops::project(&*self.table(source)?, columns)
            }
            RelationSpec::WithRandomLabel {
                source,
                label_column,
                seed,
            } => ops::with_random_label(
                &*self.table(source)?,
                label_column,
                *seed,
                &self.settings,
            ),
            RelationSpec::GroupQuantile {
                source,
                group_by,
                value_column,
                proportion,
                output_column,
            } => ops::group_quantile(
                &*self.table(source)?,
                group_by,
                value_column,
                *proportion,
                output_column,
            ),
            RelationSpec::RowNumber {
                source,
                partition_by,
                rank_column,
            } => ops::row_number(&*self.table(source)?, partition_by, rank_column),
            RelationSpec::GroupDraws {
                source,
                group_by,
                proportion,
                index_column,
                seed,
            } => ops::group_draws(
                &*self.table(source)?,
                group_by,
                *proportion,
                index_column,
                *seed,
                &self.settings,
            ),
            RelationSpec::Join {
                left,
                right,
                on,
                predicate,
                project,
            } => ops::join(
                &*self.table(left)?,
                &*self.table(right)?,
                on,
                predicate.as_ref(),
                project,
            ),
            RelationSpec::SortLimit {
                source,
                order_by,
                limit,
                project,
            } => ops::sort_limit(&*self.table(source)?, order_by, *limit, project),
        }
    }
}

impl DataBackend for MemoryBackend {
    fn relation_exists(&self, name: &RelationName) -> Result<bool> {
        Ok(self.relations.contains_key(name))
    }

    fn is_empty(&self, name: &RelationName) -> Result<bool> {
        Ok(self.table(name)?.is_empty())
    }

    fn columns(&self, name: &RelationName) -> Result<Vec<String>> {
        Ok(self.table(name)?.schema().field_names())
    }

    fn row_count(&self, name: &RelationName, group_by: &[String]) -> Result<Vec<GroupCount>> {
        ops::row_count(&*self.table(name)?, group_by)
    }

    #[instrument(skip(self, spec), fields(relation = %name, operation = spec.operation()))]
    fn create_relation(&self, name: &RelationName, spec: &RelationSpec) -> Result<u64> {
        if self.relations.contains_key(name) {
            return Err(Error::already_exists(name.to_string()));
        }
        let table = self.evaluate(spec)?;
        let rows = table.row_count() as u64;
        match self.relations.entry(name.clone()) {
            Entry::Occupied(_) => return Err(Error::already_exists(name.to_string())),
            Entry::Vacant(entry) => {
                entry.insert(Arc::new(table));
            }
        }
        debug!(rows, "Relation materialized");
        Ok(rows)
    }

    fn drop_relation(&self, name: &RelationName) -> Result<()> {
        if self.relations.remove(name).is_some() {
            debug!(relation = %name, "Relation dropped");
        }
        Ok(())
    }
}
