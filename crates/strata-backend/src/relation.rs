use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strata_common::error::{Error, Result};

/// Name of a relation in a backend catalog.
///
/// Names are trimmed on construction and may not be blank. They are only ever passed
/// to a backend as structured values, never spliced into query text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RelationName(String);

impl RelationName {
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_argument("relation name must not be blank"));
        }
        if trimmed.len() == name.len() {
            Ok(Self(name))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for RelationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RelationName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for RelationName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for RelationName {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for RelationName {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<RelationName> for String {
    fn from(name: RelationName) -> Self {
        name.0
    }
}

/// Row filter applied to each key-matched pair in a [`RelationSpec::Join`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum JoinPredicate {
    /// `left.column <= right.column`.
    LessEq { left: String, right: String },
    /// `left.column = right.column`.
    Eq { left: String, right: String },
}

impl JoinPredicate {
    pub fn left_column(&self) -> &str {
        match self {
            JoinPredicate::LessEq { left, .. } | JoinPredicate::Eq { left, .. } => left,
        }
    }

    pub fn right_column(&self) -> &str {
        match self {
            JoinPredicate::LessEq { right, .. } | JoinPredicate::Eq { right, .. } => right,
        }
    }
}

/// A bulk, set-oriented operation whose result is materialized as a new relation.
///
/// Every variant reads whole relations already in the catalog. Grouping columns are
/// compared null-safely, so rows whose key is NULL form a group of their own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RelationSpec {
    /// Copies `columns` of `source`, in the order given.
    Project {
        source: RelationName,
        columns: Vec<String>,
    },
    /// Every source column plus `label_column`, an independent uniform draw in `[0, 1)`
    /// per row, derived from `seed` and the row's position.
    WithRandomLabel {
        source: RelationName,
        label_column: String,
        seed: u64,
    },
    /// One row per group: the `group_by` columns plus `output_column`, the nearest-rank
    /// quantile of `value_column` at `proportion` within the group.
    GroupQuantile {
        source: RelationName,
        group_by: Vec<String>,
        value_column: String,
        proportion: f64,
        output_column: String,
    },
    /// Every source column plus `rank_column`, numbering rows `1..=n` within each
    /// partition.
    RowNumber {
        source: RelationName,
        partition_by: Vec<String>,
        rank_column: String,
    },
    /// For each group of `n` rows, `floor(n * proportion)` rows holding the group key and
    /// `index_column`, an independent uniform integer in `[1, n]`.
    GroupDraws {
        source: RelationName,
        group_by: Vec<String>,
        proportion: f64,
        index_column: String,
        seed: u64,
    },
    /// Inner join on the `on` columns (present under the same name on both sides),
    /// filtered by `predicate`. Output columns are looked up in `left`, then `right`.
    Join {
        left: RelationName,
        right: RelationName,
        on: Vec<String>,
        predicate: Option<JoinPredicate>,
        project: Vec<String>,
    },
    /// The first `limit` rows of `source` in ascending `order_by` order, reduced to
    /// `project`.
    SortLimit {
        source: RelationName,
        order_by: String,
        limit: u64,
        project: Vec<String>,
    },
}

impl RelationSpec {
    pub fn operation(&self) -> &'static str {
        match self {
            RelationSpec::Project { .. } => "project",
            RelationSpec::WithRandomLabel { .. } => "random_label",
            RelationSpec::GroupQuantile { .. } => "group_quantile",
            RelationSpec::RowNumber { .. } => "row_number",
            RelationSpec::GroupDraws { .. } => "group_draws",
            RelationSpec::Join { .. } => "join",
            RelationSpec::SortLimit { .. } => "sort_limit",
        }
    }

    pub fn inputs(&self) -> Vec<&RelationName> {
        match self {
            RelationSpec::Project { source, .. }
            | RelationSpec::WithRandomLabel { source, .. }
            | RelationSpec::GroupQuantile { source, .. }
            | RelationSpec::RowNumber { source, .. }
            | RelationSpec::GroupDraws { source, .. }
            | RelationSpec::SortLimit { source, .. } => vec![source],
            RelationSpec::Join { left, right, .. } => vec![left, right],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> RelationName {
        RelationName::new(s).unwrap()
    }

    #[test]
    fn test_relation_name_trims() {
        assert_eq!(name("  sales ").as_str(), "sales");
        assert_eq!(name("sales").to_string(), "sales");
    }

    #[test]
    fn test_relation_name_rejects_blank() {
        for bad in ["", "   ", "\t\n"] {
            let err = RelationName::new(bad).unwrap_err();
            assert!(matches!(err, Error::InvalidArgument(_)));
        }
    }

    #[test]
    fn test_relation_name_parse() {
        let parsed: RelationName = "orders".parse().unwrap();
        assert_eq!(parsed, name("orders"));
        assert!(RelationName::try_from(" ").is_err());
    }

    #[test]
    fn test_relation_name_serde_validates() {
        let ok: RelationName = serde_json::from_str("\"orders\"").unwrap();
        assert_eq!(ok.as_str(), "orders");
        assert!(serde_json::from_str::<RelationName>("\"  \"").is_err());
    }

    #[test]
    fn test_join_predicate_columns() {
        let pred = JoinPredicate::LessEq {
            left: "label".into(),
            right: "threshold".into(),
        };
        assert_eq!(pred.left_column(), "label");
        assert_eq!(pred.right_column(), "threshold");
    }

    #[test]
    fn test_spec_inputs() {
        let join = RelationSpec::Join {
            left: name("a"),
            right: name("b"),
            on: vec![],
            predicate: None,
            project: vec!["x".into()],
        };
        assert_eq!(join.operation(), "join");
        assert_eq!(join.inputs(), vec![&name("a"), &name("b")]);

        let project = RelationSpec::Project {
            source: name("a"),
            columns: vec!["x".into()],
        };
        assert_eq!(project.inputs(), vec![&name("a")]);
    }
}
