use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use strata_common::error::{Error, Result};
use strata_common::types::Value;
use strata_sampler::SamplerConfig;

pub const SEED_VARIABLE: &str = "STRATA_SEED";
pub const STAGING_PREFIX_VARIABLE: &str = "STRATA_STAGING_PREFIX";
pub const SLOW_THRESHOLD_VARIABLE: &str = "STRATA_SLOW_THRESHOLD_MS";

/// Session-scoped settings. Names are case-insensitive.
#[derive(Debug, Default)]
pub struct SessionVariables {
    values: RwLock<FxHashMap<String, Value>>,
}

impl SessionVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_variable(&self, name: &str, value: Value) {
        self.values.write().insert(name.to_uppercase(), value);
    }

    pub fn get_variable(&self, name: &str) -> Option<Value> {
        self.values.read().get(&name.to_uppercase()).cloned()
    }

    pub fn remove_variable(&self, name: &str) -> Option<Value> {
        self.values.write().remove(&name.to_uppercase())
    }

    /// Applies the `STRATA_*` variables on top of `base`. A NULL seed clears it; an
    /// INT64 seed is taken by its bit pattern, so every `u64` seed round-trips.
    pub fn sampler_config(&self, base: &SamplerConfig) -> Result<SamplerConfig> {
        let mut config = base.clone();

        match self.get_variable(SEED_VARIABLE) {
            None => {}
            Some(Value::Null) => config.seed = None,
            Some(value) => {
                let seed = value.as_i64().ok_or_else(|| {
                    Error::invalid_argument(format!(
                        "{SEED_VARIABLE} must be an integer, got {value:?}"
                    ))
                })?;
                config.seed = Some(seed as u64);
            }
        }

        if let Some(value) = self.get_variable(STAGING_PREFIX_VARIABLE) {
            let prefix = value.as_str().ok_or_else(|| {
                Error::invalid_argument(format!(
                    "{STAGING_PREFIX_VARIABLE} must be a string, got {value:?}"
                ))
            })?;
            config.staging_prefix = prefix.to_string();
        }

        if let Some(value) = self.get_variable(SLOW_THRESHOLD_VARIABLE) {
            config.slow_threshold_ms = non_negative(SLOW_THRESHOLD_VARIABLE, &value)?;
        }

        config.validate()?;
        Ok(config)
    }
}

fn non_negative(name: &str, value: &Value) -> Result<u64> {
    value
        .as_i64()
        .and_then(|v| u64::try_from(v).ok())
        .ok_or_else(|| {
            Error::invalid_argument(format!(
                "{name} must be a non-negative integer, got {value:?}"
            ))
        })
}
