use serde::{Deserialize, Serialize};

/// One sampling invocation, as supplied by the caller.
///
/// Names are raw strings here; the validator turns them into checked
/// [`RelationName`](strata_backend::RelationName)s.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRequest {
    pub source: String,
    pub output: String,
    pub proportion: f64,
    /// Stratification keys. `None` or an empty list samples the relation as one stratum.
    #[serde(default)]
    pub keys: Option<Vec<String>>,
    /// Output columns. `None`, an empty list or `["*"]` selects every column except the
    /// keys.
    #[serde(default)]
    pub targets: Option<Vec<String>>,
    #[serde(default)]
    pub with_replacement: bool,
}

impl SampleRequest {
    pub fn new(source: impl Into<String>, output: impl Into<String>, proportion: f64) -> Self {
        Self {
            source: source.into(),
            output: output.into(),
            proportion,
            keys: None,
            targets: None,
            with_replacement: false,
        }
    }

    pub fn with_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.targets = Some(targets.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_replacement(mut self, with_replacement: bool) -> Self {
        self.with_replacement = with_replacement;
        self
    }
}
