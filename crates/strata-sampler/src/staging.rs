use strata_backend::{DataBackend, RelationName, RelationSpec};
use strata_common::ErrorKind;
use strata_common::error::Result;
use tracing::{debug, warn};
use uuid::Uuid;

/// Intermediate relations owned by one invocation.
///
/// Every relation created through the guard is dropped when it goes out of scope. The
/// output relation survives only if [`commit`](Self::commit) was called; otherwise it is
/// dropped too, so a failed invocation leaves the catalog as it found it.
pub struct StagingArea<'b, B: DataBackend + ?Sized> {
    backend: &'b B,
    prefix: String,
    token: String,
    staged: Vec<RelationName>,
    output: Option<RelationName>,
    committed: bool,
}

impl<'b, B: DataBackend + ?Sized> StagingArea<'b, B> {
    pub fn new(backend: &'b B, prefix: &str) -> Self {
        Self {
            backend,
            prefix: prefix.trim().to_string(),
            token: Uuid::new_v4().simple().to_string(),
            staged: Vec::new(),
            output: None,
            committed: false,
        }
    }

    pub fn backend(&self) -> &'b B {
        self.backend
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Unique name for an intermediate relation of this invocation.
    pub fn name(&self, suffix: &str) -> Result<RelationName> {
        RelationName::new(format!("{}_{}_{}", self.prefix, self.token, suffix))
    }

    /// Materializes `spec` as a staging relation and returns its name and row count.
    pub fn stage(&mut self, suffix: &str, spec: &RelationSpec) -> Result<(RelationName, u64)> {
        let name = self.name(suffix)?;
        self.staged.push(name.clone());
        let rows = self.backend.create_relation(&name, spec)?;
        debug!(relation = %name, operation = spec.operation(), rows, "Staged relation");
        Ok((name, rows))
    }

    /// Materializes the output relation. It is rolled back unless the area is committed.
    ///
    /// An `AlreadyExists` failure means another writer owns the name, so it is never
    /// rolled back.
    pub fn create_output(&mut self, output: &RelationName, spec: &RelationSpec) -> Result<u64> {
        self.output = Some(output.clone());
        let result = self.backend.create_relation(output, spec);
        if matches!(&result, Err(e) if e.kind() == ErrorKind::AlreadyExists) {
            self.output = None;
        }
        result
    }

    pub fn staged(&self) -> &[RelationName] {
        &self.staged
    }

    /// Keeps the output relation; staging relations are still dropped.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl<B: DataBackend + ?Sized> Drop for StagingArea<'_, B> {
    fn drop(&mut self) {
        let rollback = if self.committed {
            None
        } else {
            self.output.take()
        };
        for name in self.staged.drain(..).rev().chain(rollback) {
            if let Err(e) = self.backend.drop_relation(&name) {
                warn!(relation = %name, error = %e, "Failed to drop intermediate relation");
            }
        }
    }
}
