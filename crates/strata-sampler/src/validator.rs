use strata_backend::{DataBackend, RelationName, check_proportion};
use strata_common::error::{Error, Result};

use crate::SampleRequest;
use crate::groups::Strata;
use crate::projection::{output_columns, resolve_targets};

/// A request whose preconditions all held when it was checked.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRequest {
    pub source: RelationName,
    pub output: RelationName,
    pub proportion: f64,
    pub strata: Strata,
    /// Requested output columns, before keys are appended.
    pub targets: Vec<String>,
    /// Final column list of the output relation.
    pub output_columns: Vec<String>,
    /// Columns of the source relation, in storage order.
    pub source_columns: Vec<String>,
    pub with_replacement: bool,
}

fn relation_name(raw: &str, role: &str) -> Result<RelationName> {
    RelationName::new(raw)
        .map_err(|_| Error::invalid_argument(format!("{role} relation name must not be blank")))
}

/// Checks every precondition of `request` using read-only metadata lookups.
///
/// Checks run in a fixed order and the first failure wins: blank names, source equal
/// to output, output already present, source missing, source empty, proportion out of
/// `(0, 1]`, then unknown key or target columns (all of them named in one error).
pub fn validate<B: DataBackend + ?Sized>(
    backend: &B,
    request: &SampleRequest,
) -> Result<ValidatedRequest> {
    let output = relation_name(&request.output, "output")?;
    let source = relation_name(&request.source, "source")?;
    if source == output {
        return Err(Error::invalid_argument(format!(
            "output relation '{output}' must differ from the source"
        )));
    }
    if backend.relation_exists(&output)? {
        return Err(Error::already_exists(output.to_string()));
    }
    if !backend.relation_exists(&source)? {
        return Err(Error::not_found(source.to_string()));
    }
    if backend.is_empty(&source)? {
        return Err(Error::empty_input(source.to_string()));
    }
    check_proportion(request.proportion)?;

    let source_columns = backend.columns(&source)?;
    let strata = Strata::resolve(request.keys.as_deref());
    let targets = resolve_targets(&source_columns, &strata, request.targets.as_deref());

    let mut missing: Vec<&str> = Vec::new();
    for column in strata.columns().iter().chain(&targets) {
        if !source_columns.contains(column) && !missing.contains(&column.as_str()) {
            missing.push(column);
        }
    }
    if !missing.is_empty() {
        return Err(Error::schema_mismatch(format!(
            "unknown column(s) in '{}': {}",
            source,
            missing.join(", ")
        )));
    }

    let output_columns = output_columns(&targets, &strata);
    Ok(ValidatedRequest {
        source,
        output,
        proportion: request.proportion,
        strata,
        targets,
        output_columns,
        source_columns,
        with_replacement: request.with_replacement,
    })
}
