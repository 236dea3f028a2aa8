//! MetadataProvider trait definition.
//!
//! The MetadataProvider trait abstracts over where cube schema comes from.
//! The query model consults it when a `Query` is constructed (to create one
//! selection per hierarchy and level) and whenever a mutator resolves a name.

use std::fmt;

use super::types::*;
use crate::error::ObjectKind;

/// Error type for metadata lookups.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    #[error("{kind} not found: {name}")]
    NotFound { kind: ObjectKind, name: String },

    #[error("Invalid cube schema: {0}")]
    InvalidSchema(String),

    #[error("Metadata unavailable: {0}")]
    Unavailable(String),
}

impl From<serde_json::Error> for MetadataError {
    fn from(err: serde_json::Error) -> Self {
        MetadataError::InvalidSchema(err.to_string())
    }
}

/// Result type for metadata operations.
pub type MetadataResult<T> = Result<T, MetadataError>;

/// Read-only access to the schema of one cube.
///
/// All calls are synchronous and must not have side effects. A provider
/// backed by a remote server is expected to cache what it fetched.
///
/// # Example
///
/// ```ignore
/// use olapq::metadata::{InMemoryCube, MetadataProvider};
///
/// let cube = InMemoryCube::builder("Sales")
///     .hierarchy("Product", &["Product Family", "Product Department"])
///     .member("[Product].[Drink]")
///     .build()?;
///
/// let product = cube.hierarchy("Product")?;
/// let levels = cube.levels(&product)?;
/// ```
pub trait MetadataProvider: Send + Sync + fmt::Debug {
    // =========================================================================
    // Required lookups
    // =========================================================================

    /// Name of the cube, as used in `FROM [..]`.
    fn cube_name(&self) -> &str;

    /// All hierarchies of the cube, including the measures hierarchy.
    fn hierarchies(&self) -> MetadataResult<Vec<Hierarchy>>;

    /// Levels of a hierarchy, top-most first.
    fn levels(&self, hierarchy: &Hierarchy) -> MetadataResult<Vec<Level>>;

    /// Members of a level, in schema order.
    fn members(&self, level: &Level) -> MetadataResult<Vec<Member>>;

    /// Resolve a member by unique name.
    fn lookup_member(&self, unique_name: &str) -> MetadataResult<Member>;

    /// Stored measures, in schema order.
    fn measures(&self) -> MetadataResult<Vec<Measure>>;

    // =========================================================================
    // Derived lookups
    // =========================================================================

    /// Find a hierarchy by name or unique name.
    fn hierarchy(&self, name: &str) -> MetadataResult<Hierarchy> {
        self.hierarchies()?
            .into_iter()
            .find(|h| h.name == name || h.unique_name == name)
            .ok_or_else(|| MetadataError::NotFound {
                kind: ObjectKind::Hierarchy,
                name: name.to_string(),
            })
    }

    /// Find a stored measure by name or unique name.
    fn measure(&self, name: &str) -> MetadataResult<Measure> {
        self.measures()?
            .into_iter()
            .find(|m| m.name == name || m.unique_name == name)
            .ok_or_else(|| MetadataError::NotFound {
                kind: ObjectKind::Measure,
                name: name.to_string(),
            })
    }
}
