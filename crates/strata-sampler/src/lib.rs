//! Stratified sampling over a [`DataBackend`](strata_backend::DataBackend).
//!
//! A [`SampleRequest`] names a source relation, an output relation, a proportion and
//! optionally the stratification keys and target columns. [`StratifiedSampler`]
//! validates it, plans the backend operations for the chosen [`SamplingStrategy`] and
//! writes the sample as a new relation:
//!
//! - without replacement, each stratum of `n` rows contributes the rows whose random
//!   label is at most the stratum's nearest-rank quantile, `ceil(n * p)` rows;
//! - with replacement, each stratum contributes `floor(n * p)` independent uniform
//!   draws over its rows.
//!
//! Intermediate relations live in a [`StagingArea`] and never outlive the call.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

pub mod config;
pub mod groups;
pub mod metrics;
pub mod projection;
mod report;
mod request;
mod sampler;
pub mod staging;
mod strategy;
pub mod validator;

#[cfg(test)]
mod test_support;

pub use config::SamplerConfig;
pub use groups::{Strata, split_column_list};
pub use metrics::SamplingMetrics;
pub use report::SampleReport;
pub use request::SampleRequest;
pub use sampler::{StratifiedSampler, sample};
pub use staging::StagingArea;
pub use strategy::SamplingStrategy;
pub use validator::{ValidatedRequest, validate};
