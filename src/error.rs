//! Error types shared by the selection model and the compiler.

use std::fmt;

use crate::mdx::ParseError;
use crate::metadata::MetadataError;

/// Kind of schema object named in an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Hierarchy,
    Level,
    Member,
    Measure,
    CalculatedMember,
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjectKind::Hierarchy => "Hierarchy",
            ObjectKind::Level => "Level",
            ObjectKind::Member => "Member",
            ObjectKind::Measure => "Measure",
            ObjectKind::CalculatedMember => "Calculated member",
        })
    }
}

/// Error type for query building and compilation.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("{kind} '{name}' does not belong to hierarchy '{hierarchy}'")]
    DomainMismatch {
        kind: ObjectKind,
        name: String,
        hierarchy: String,
    },

    #[error("{kind} not found: {name}")]
    NotFound { kind: ObjectKind, name: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    ExpressionParse(#[from] ParseError),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Parameter '{0}' is referenced but has no value")]
    UnresolvedParameter(String),

    #[error("Metadata error: {0}")]
    Metadata(String),
}

impl QueryError {
    pub(crate) fn not_found(kind: ObjectKind, name: impl Into<String>) -> Self {
        QueryError::NotFound {
            kind,
            name: name.into(),
        }
    }

    pub(crate) fn mismatch(
        kind: ObjectKind,
        name: impl Into<String>,
        hierarchy: impl Into<String>,
    ) -> Self {
        QueryError::DomainMismatch {
            kind,
            name: name.into(),
            hierarchy: hierarchy.into(),
        }
    }
}

impl From<MetadataError> for QueryError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::NotFound { kind, name } => QueryError::NotFound { kind, name },
            other => QueryError::Metadata(other.to_string()),
        }
    }
}

/// Result type for query operations.
pub type QueryResult<T> = Result<T, QueryError>;
