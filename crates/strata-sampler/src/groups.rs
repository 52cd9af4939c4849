use std::fmt;

use serde::{Deserialize, Serialize};

/// How rows are partitioned into strata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Strata {
    /// The whole relation is a single implicit stratum.
    Global,
    /// One stratum per distinct combination of these columns.
    Keys(Vec<String>),
}

impl Strata {
    /// Trims names, drops blanks and repeats (first occurrence wins). Nothing left means
    /// [`Strata::Global`].
    pub fn resolve<S: AsRef<str>>(keys: Option<&[S]>) -> Self {
        let keys = normalize_names(keys.unwrap_or_default());
        if keys.is_empty() {
            Strata::Global
        } else {
            Strata::Keys(keys)
        }
    }

    /// Grouping columns as a backend sees them; empty for the global stratum.
    pub fn columns(&self) -> &[String] {
        match self {
            Strata::Global => &[],
            Strata::Keys(keys) => keys,
        }
    }

    pub fn is_global(&self) -> bool {
        matches!(self, Strata::Global)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.columns().iter().any(|c| c == column)
    }
}

impl fmt::Display for Strata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strata::Global => f.write_str("<global>"),
            Strata::Keys(keys) => f.write_str(&keys.join(", ")),
        }
    }
}

pub(crate) fn normalize_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(names.len());
    for name in names {
        let name = name.as_ref().trim();
        if !name.is_empty() && !out.iter().any(|seen| seen == name) {
            out.push(name.to_string());
        }
    }
    out
}

/// Splits a comma-separated column list such as `"region, tier"`.
pub fn split_column_list(list: &str) -> Vec<String> {
    normalize_names(&list.split(',').collect::<Vec<_>>())
}
