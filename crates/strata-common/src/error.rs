use std::fmt;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`], stable across message changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    AlreadyExists,
    NotFound,
    EmptyInput,
    SchemaMismatch,
    Consistency,
    Backend,
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidArgument => "InvalidArgument",
            ErrorKind::AlreadyExists => "AlreadyExists",
            ErrorKind::NotFound => "NotFound",
            ErrorKind::EmptyInput => "EmptyInput",
            ErrorKind::SchemaMismatch => "SchemaMismatch",
            ErrorKind::Consistency => "ConsistencyError",
            ErrorKind::Backend => "BackendError",
            ErrorKind::Internal => "Internal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Error)]
pub enum Error {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Relation already exists: {0}")]
    AlreadyExists(String),
    #[error("Relation not found: {0}")]
    NotFound(String),
    #[error("Relation is empty: {0}")]
    EmptyInput(String),
    #[error("Schema mismatch: {0}")]
    SchemaMismatch(String),
    #[error("Consistency error in stratum {stratum}: {message}")]
    Consistency { stratum: String, message: String },
    #[error("Backend error during {operation}: {message}")]
    Backend { operation: String, message: String },
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub fn already_exists(name: impl Into<String>) -> Self {
        Error::AlreadyExists(name.into())
    }

    pub fn not_found(name: impl Into<String>) -> Self {
        Error::NotFound(name.into())
    }

    pub fn empty_input(name: impl Into<String>) -> Self {
        Error::EmptyInput(name.into())
    }

    pub fn schema_mismatch(msg: impl Into<String>) -> Self {
        Error::SchemaMismatch(msg.into())
    }

    pub fn consistency(stratum: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::Consistency {
            stratum: stratum.into(),
            message: msg.into(),
        }
    }

    pub fn backend(operation: impl Into<String>, msg: impl Into<String>) -> Self {
        Error::Backend {
            operation: operation.into(),
            message: msg.into(),
        }
    }

    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Error::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    /// Type mismatches only arise inside storage, so they classify as backend failures.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Error::AlreadyExists(_) => ErrorKind::AlreadyExists,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::EmptyInput(_) => ErrorKind::EmptyInput,
            Error::SchemaMismatch(_) => ErrorKind::SchemaMismatch,
            Error::Consistency { .. } => ErrorKind::Consistency,
            Error::Backend { .. } | Error::TypeMismatch { .. } => ErrorKind::Backend,
            Error::Internal(_) => ErrorKind::Internal,
        }
    }
}
