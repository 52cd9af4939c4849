//! Strata - a stratified sampling engine.
//!
//! Strata draws a proportional random sample from every stratum of a relation (the
//! groups formed by one or more key columns) and writes it to a new relation, either
//! without replacement (nearest-rank quantile of per-row random labels) or with
//! replacement (independent uniform draws over per-stratum row numbers).
//!
//! # Architecture
//!
//! ```text
//! SampleRequest → Validator → Strategy → RelationSpec ops → DataBackend → output relation
//! ```
//!
//! The sampler only speaks to the [`DataBackend`] trait. `StrataEngine` creates
//! isolated sessions, each backed by its own in-memory columnar [`MemoryBackend`].
//!
//! # Example
//!
//! ```rust,ignore
//! use strata::{SampleRequest, StrataEngine};
//!
//! #[tokio::main]
//! async fn main() {
//!     let session = StrataEngine::new().create_session();
//!     session.create_table("people", people).unwrap();
//!
//!     let report = session
//!         .sample(SampleRequest::new("people", "people_sample", 0.1).with_keys(["region"]))
//!         .await
//!         .unwrap();
//!     println!("{} rows written", report.rows_written);
//! }
//! ```

mod variables;

use std::sync::Arc;

pub use strata_backend::{
    BackendSettings, DataBackend, GroupCount, JoinPredicate, MemoryBackend, RelationName,
    RelationSpec, draw_count, nearest_rank,
};
pub use strata_common::error::{Error, ErrorKind, Result};
pub use strata_common::result::{ColumnInfo, QueryResult, Row};
pub use strata_common::types::{DataType, Value};
pub use strata_sampler::{
    SampleReport, SampleRequest, SamplerConfig, SamplingMetrics, SamplingStrategy, Strata,
    StratifiedSampler, sample,
};
pub use strata_storage::{Column, Field, FieldMode, Record, Schema, Table};
use tracing::{debug, instrument};
pub use variables::{
    SEED_VARIABLE, SLOW_THRESHOLD_VARIABLE, STAGING_PREFIX_VARIABLE, SessionVariables,
};

/// Factory for isolated sampling sessions.
///
/// Each session owns its own catalog, so relations created in one session are not
/// visible to another. Engine-level config and backend settings are the defaults every
/// session starts from.
#[derive(Debug, Clone, Default)]
pub struct StrataEngine {
    config: SamplerConfig,
    backend_settings: BackendSettings,
}

impl StrataEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut self, config: SamplerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_backend_settings(mut self, settings: BackendSettings) -> Self {
        self.backend_settings = settings;
        self
    }

    pub fn create_session(&self) -> StrataSession {
        StrataSession {
            backend: Arc::new(MemoryBackend::with_settings(self.backend_settings.clone())),
            config: self.config.clone(),
            variables: SessionVariables::new(),
            metrics: Arc::new(
                SamplingMetrics::new().with_slow_threshold(self.config.slow_threshold_ms),
            ),
        }
    }
}

/// A sampling session over an in-memory catalog.
///
/// Relations are loaded with [`create_table`](Self::create_table), sampled with
/// [`sample`](Self::sample) and read back with [`table`](Self::table) or
/// [`query`](Self::query). Session variables (`STRATA_SEED`, `STRATA_STAGING_PREFIX`,
/// `STRATA_SLOW_THRESHOLD_MS`) override the engine config for later invocations.
pub struct StrataSession {
    backend: Arc<MemoryBackend>,
    config: SamplerConfig,
    variables: SessionVariables,
    metrics: Arc<SamplingMetrics>,
}

impl StrataSession {
    pub fn new() -> Self {
        StrataEngine::new().create_session()
    }

    /// Samples per [`SampleRequest`], writing the output relation into this session.
    ///
    /// The pipeline runs on the blocking pool; the returned report carries the seed the
    /// invocation used.
    #[instrument(skip(self, request), fields(source = %request.source, output = %request.output))]
    pub async fn sample(&self, request: SampleRequest) -> Result<SampleReport> {
        let config = self.config()?;
        let backend = Arc::clone(&self.backend);
        let metrics = Arc::clone(&self.metrics);
        debug!(seed = ?config.seed, "Dispatching sampling invocation");

        tokio::task::spawn_blocking(move || {
            StratifiedSampler::with_config(backend, config)
                .with_metrics(metrics)
                .sample(&request)
        })
        .await
        .map_err(|e| Error::internal(e.to_string()))?
    }

    /// Runs the requests in order. A failed request does not stop the ones after it.
    pub async fn sample_batch(&self, requests: Vec<SampleRequest>) -> Vec<Result<SampleReport>> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            results.push(self.sample(request).await);
        }
        results
    }

    /// Registers `table` under `name`. Fails with `AlreadyExists` when the name is taken.
    pub fn create_table(&self, name: &str, table: Table) -> Result<()> {
        self.backend.insert_table(RelationName::new(name)?, table)
    }

    pub fn table(&self, name: &str) -> Result<Arc<Table>> {
        self.backend.table(&RelationName::new(name)?)
    }

    /// The relation as row-oriented data, e.g. for serialization.
    pub fn query(&self, name: &str) -> Result<QueryResult> {
        self.table(name)?.to_query_result()
    }

    /// Removes a relation; a missing relation is not an error.
    pub fn drop_table(&self, name: &str) -> Result<()> {
        self.backend.drop_relation(&RelationName::new(name)?)
    }

    pub fn table_exists(&self, name: &str) -> Result<bool> {
        self.backend.relation_exists(&RelationName::new(name)?)
    }

    pub fn table_names(&self) -> Vec<String> {
        self.backend
            .relation_names()
            .into_iter()
            .map(RelationName::into_string)
            .collect()
    }

    /// Per-stratum row counts of a relation; an empty `keys` list counts all rows.
    pub fn stratum_counts<S: AsRef<str>>(
        &self,
        name: &str,
        keys: &[S],
    ) -> Result<Vec<GroupCount>> {
        let keys: Vec<String> = keys.iter().map(|k| k.as_ref().to_string()).collect();
        self.backend.row_count(&RelationName::new(name)?, &keys)
    }

    pub fn set_variable(&self, name: &str, value: Value) {
        self.variables.set_variable(name, value);
    }

    pub fn get_variable(&self, name: &str) -> Option<Value> {
        self.variables.get_variable(name)
    }

    pub fn variables(&self) -> &SessionVariables {
        &self.variables
    }

    /// Effective sampler config: the engine config with session variables applied.
    pub fn config(&self) -> Result<SamplerConfig> {
        self.variables.sampler_config(&self.config)
    }

    pub fn backend(&self) -> &MemoryBackend {
        &self.backend
    }

    pub fn metrics(&self) -> &SamplingMetrics {
        &self.metrics
    }
}

impl Default for StrataSession {
    fn default() -> Self {
        Self::new()
    }
}
