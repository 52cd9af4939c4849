use serde::{Deserialize, Serialize};
use strata_common::error::{Error, Result};

pub const DEFAULT_STAGING_PREFIX: &str = "__strata_stage";
pub const DEFAULT_SLOW_THRESHOLD_MS: u64 = 1000;

/// Sampler settings.
///
/// ```toml
/// seed = 42
/// staging_prefix = "__tmp"
/// slow_threshold_ms = 250
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SamplerConfig {
    /// Fixed call seed. Without one every invocation draws a fresh seed.
    pub seed: Option<u64>,
    /// Prefix of the intermediate relations an invocation stages.
    pub staging_prefix: String,
    /// Invocations at or above this duration count as slow.
    pub slow_threshold_ms: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            seed: None,
            staging_prefix: DEFAULT_STAGING_PREFIX.to_string(),
            slow_threshold_ms: DEFAULT_SLOW_THRESHOLD_MS,
        }
    }
}

impl SamplerConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| Error::invalid_argument(format!("invalid sampler config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_staging_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.staging_prefix = prefix.into();
        self
    }

    pub fn with_slow_threshold_ms(mut self, threshold_ms: u64) -> Self {
        self.slow_threshold_ms = threshold_ms;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.staging_prefix.trim().is_empty() {
            return Err(Error::invalid_argument("staging_prefix must not be blank"));
        }
        Ok(())
    }
}
