use crate::groups::{Strata, normalize_names};

pub const WILDCARD: &str = "*";

/// Target columns for a request: the explicit list (trimmed, without blanks or
/// repeats), or every source column outside the stratification keys when the list is
/// absent, empty, or just `*`.
pub fn resolve_targets<S: AsRef<str>>(
    source_columns: &[String],
    strata: &Strata,
    targets: Option<&[S]>,
) -> Vec<String> {
    let explicit = normalize_names(targets.unwrap_or_default());
    if explicit.is_empty() || (explicit.len() == 1 && explicit[0] == WILDCARD) {
        return source_columns
            .iter()
            .filter(|c| !strata.contains(c))
            .cloned()
            .collect();
    }
    explicit
}

/// Columns of the output relation: targets first, then any key column not already
/// among them.
pub fn output_columns(targets: &[String], strata: &Strata) -> Vec<String> {
    let mut columns = targets.to_vec();
    for key in strata.columns() {
        if !columns.contains(key) {
            columns.push(key.clone());
        }
    }
    columns
}
