//! Read-only schema objects handed out by a [`MetadataProvider`](super::MetadataProvider).
//!
//! These are plain owned values. Selection objects keep their own copies,
//! so a provider is free to build them on demand.

use serde::{Deserialize, Serialize};

/// What kind of dimension a hierarchy belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DimensionKind {
    #[default]
    Regular,
    Time,
    Measures,
}

/// A dimension hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hierarchy {
    pub name: String,
    /// e.g. `[Product]` or `[Time].[Weekly]`
    pub unique_name: String,
    pub dimension: String,
    #[serde(default)]
    pub kind: DimensionKind,
}

/// One rung of a hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Level {
    pub name: String,
    pub unique_name: String,
    /// Unique name of the owning hierarchy.
    pub hierarchy: String,
    /// Zero for the top-most level.
    pub depth: usize,
}

/// A concrete member of a level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Member {
    pub name: String,
    pub unique_name: String,
    #[serde(default)]
    pub caption: Option<String>,
    /// Unique name of the member's level.
    pub level: String,
    /// Unique name of the member's hierarchy.
    pub hierarchy: String,
    /// Unique name of the parent member, if any.
    #[serde(default)]
    pub parent: Option<String>,
}

impl Member {
    /// Caption if the schema defines one, otherwise the name.
    pub fn caption(&self) -> &str {
        self.caption.as_deref().unwrap_or(&self.name)
    }
}

/// A stored measure.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measure {
    pub name: String,
    pub unique_name: String,
    #[serde(default)]
    pub caption: Option<String>,
    /// Unique name of the measures hierarchy.
    pub hierarchy: String,
}
