//! Per-row and per-draw random streams.
//!
//! Each value is a pure function of the call seed and the identity of the row or draw
//! it belongs to, so generation can be split across threads in any order and still
//! reproduce exactly under a fixed seed.

use std::hash::{Hash, Hasher};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use strata_common::types::Value;
use xxhash_rust::xxh3::{Xxh3, xxh3_64_with_seed};

fn derived_rng(seed: u64, ordinal: u64) -> StdRng {
    StdRng::seed_from_u64(xxh3_64_with_seed(&ordinal.to_le_bytes(), seed))
}

/// Uniform label in `[0, 1)` for the row at position `row`.
pub fn row_label(seed: u64, row: u64) -> f64 {
    derived_rng(seed, row).r#gen::<f64>()
}

/// Seed for the draws of one stratum, mixing the call seed with the stratum key.
pub fn stratum_seed(seed: u64, key: &[Value]) -> u64 {
    let mut hasher = Xxh3::with_seed(seed);
    key.hash(&mut hasher);
    hasher.finish()
}

/// The `ordinal`-th draw of a stratum of `n` rows, uniform in `[1, n]`.
pub fn draw_index(stratum_seed: u64, ordinal: u64, n: u64) -> u64 {
    derived_rng(stratum_seed, ordinal).gen_range(1..=n)
}

/// A fresh seed for calls that do not pin one.
pub fn random_seed() -> u64 {
    rand::random::<u64>()
}
