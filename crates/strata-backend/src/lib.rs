//! Data backend interface for the Strata sampling engine, plus an in-memory
//! columnar implementation.
//!
//! The sampler only ever talks to a [`DataBackend`]: metadata lookups, and bulk
//! operations described as [`RelationSpec`] values that the backend materializes as new
//! relations. [`MemoryBackend`] implements every operation over
//! [`strata_storage::Table`]s held in a concurrent catalog.

#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::broken_intra_doc_links)]

mod backend;
mod memory;
mod ops;
mod relation;
pub mod rng;

pub use backend::{BackendSettings, DataBackend, GroupCount, describe_key};
pub use memory::MemoryBackend;
pub use ops::{check_proportion, draw_count, nearest_rank};
pub use relation::{JoinPredicate, RelationName, RelationSpec};
