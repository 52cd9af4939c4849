use std::sync::Arc;
use std::time::Instant;

use debug_print::debug_eprintln;
use strata_backend::{DataBackend, rng};
use strata_common::error::Result;
use tracing::{debug, info, instrument};

use crate::config::SamplerConfig;
use crate::metrics::SamplingMetrics;
use crate::report::SampleReport;
use crate::request::SampleRequest;
use crate::staging::StagingArea;
use crate::strategy::{SamplePlan, SamplingStrategy};
use crate::validator::validate;

/// Draws stratified samples from relations of one backend.
///
/// Each call validates the request, stages its intermediate relations under a fresh
/// token and writes the output relation. Whatever happens, the staging relations are
/// gone when the call returns, and on failure so is the output.
pub struct StratifiedSampler<B: DataBackend> {
    backend: B,
    config: SamplerConfig,
    metrics: Arc<SamplingMetrics>,
}

impl<B: DataBackend> StratifiedSampler<B> {
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, SamplerConfig::default())
    }

    pub fn with_config(backend: B, config: SamplerConfig) -> Self {
        let metrics = SamplingMetrics::new().with_slow_threshold(config.slow_threshold_ms);
        Self {
            backend,
            config,
            metrics: Arc::new(metrics),
        }
    }

    /// Shares an existing metrics sink instead of the sampler's own. The sink adopts the
    /// configured slow threshold.
    pub fn with_metrics(mut self, metrics: Arc<SamplingMetrics>) -> Self {
        metrics.set_slow_threshold(self.config.slow_threshold_ms);
        self.metrics = metrics;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn metrics(&self) -> &SamplingMetrics {
        &self.metrics
    }

    #[instrument(
        skip(self, request),
        fields(
            source = %request.source,
            output = %request.output,
            proportion = request.proportion,
            with_replacement = request.with_replacement,
        )
    )]
    pub fn sample(&self, request: &SampleRequest) -> Result<SampleReport> {
        let start = Instant::now();
        let result = self.run(request, start);

        let elapsed = start.elapsed();
        self.metrics
            .record_invocation(elapsed, result.as_ref().ok().map(|r| r.rows_written));

        match &result {
            Ok(report) => info!(
                rows_read = report.rows_read,
                rows_written = report.rows_written,
                strata = report.strata,
                seed = report.seed,
                "Sample written"
            ),
            Err(e) => debug!(error = %e, "Sampling failed"),
        }

        if self.metrics.is_slow(elapsed) {
            debug_eprintln!(
                "[sampler::sample] Slow sampling detected: {:?} - {} -> {}",
                elapsed,
                request.source,
                request.output
            );
        }

        result
    }

    fn run(&self, request: &SampleRequest, start: Instant) -> Result<SampleReport> {
        self.config.validate()?;
        let validated = validate(&self.backend, request)?;
        let seed = self.config.seed.unwrap_or_else(rng::random_seed);
        let strata_sizes = self
            .backend
            .row_count(&validated.source, validated.strata.columns())?;
        let strategy = SamplingStrategy::for_request(validated.with_replacement);
        debug!(
            strata = strata_sizes.len(),
            keys = %validated.strata,
            %strategy,
            seed,
            "Request validated"
        );

        let plan = SamplePlan {
            request: &validated,
            seed,
            strata_sizes: &strata_sizes,
        };
        let mut staging = StagingArea::new(&self.backend, &self.config.staging_prefix);
        let rows_written = strategy.execute(&mut staging, &plan)?;
        staging.commit();

        Ok(SampleReport {
            output: validated.output.clone(),
            strategy,
            seed,
            strata: strata_sizes.len(),
            rows_read: plan.total_rows(),
            rows_written,
            elapsed: start.elapsed(),
        })
    }
}

/// Samples `proportion` of every stratum of `source` into the new relation `output`.
///
/// `keys` of `None` (or nothing but blanks) treats the relation as a single stratum;
/// `targets` of `None` keeps every non-key column. Without replacement each stratum of
/// `n` rows yields `ceil(n * proportion)` distinct rows (`floor` for the single global
/// stratum); with replacement it yields exactly `floor(n * proportion)` independent
/// draws.
pub fn sample<B: DataBackend + ?Sized>(
    backend: &B,
    source: &str,
    output: &str,
    proportion: f64,
    keys: Option<&[&str]>,
    targets: Option<&[&str]>,
    with_replacement: bool,
) -> Result<SampleReport> {
    let mut request =
        SampleRequest::new(source, output, proportion).with_replacement(with_replacement);
    if let Some(keys) = keys {
        request = request.with_keys(keys.iter().copied());
    }
    if let Some(targets) = targets {
        request = request.with_targets(targets.iter().copied());
    }
    StratifiedSampler::new(backend).sample(&request)
}
