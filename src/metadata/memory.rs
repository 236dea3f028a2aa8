//! In-memory cube schema.
//!
//! Useful for tests and for callers that already hold their schema in
//! memory. A cube can be assembled with [`CubeBuilder`] or loaded from JSON:
//!
//! ```json
//! {
//!   "name": "Sales",
//!   "hierarchies": [{ "name": "Gender", "unique_name": "[Gender]", "dimension": "Gender" }],
//!   "levels": [{ "name": "Gender", "unique_name": "[Gender].[Gender]", "hierarchy": "[Gender]", "depth": 0 }],
//!   "members": [{ "name": "F", "unique_name": "[Gender].[F]", "level": "[Gender].[Gender]", "hierarchy": "[Gender]" }],
//!   "measures": []
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::provider::{MetadataError, MetadataProvider, MetadataResult};
use super::types::*;
use crate::error::ObjectKind;
use crate::mdx::{quote_name, Identifier};

const MEASURES: &str = "Measures";
const MEASURES_LEVEL: &str = "MeasuresLevel";

/// A cube whose schema lives entirely in memory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InMemoryCube {
    pub name: String,
    #[serde(default)]
    pub hierarchies: Vec<Hierarchy>,
    #[serde(default)]
    pub levels: Vec<Level>,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub measures: Vec<Measure>,
}

impl InMemoryCube {
    pub fn builder(name: &str) -> CubeBuilder {
        CubeBuilder::new(name)
    }

    /// Load a cube schema from JSON.
    pub fn from_json(json: &str) -> MetadataResult<Self> {
        let cube: InMemoryCube = serde_json::from_str(json)?;
        Ok(cube)
    }

    /// Serialize the schema to pretty-printed JSON.
    pub fn to_json(&self) -> MetadataResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl MetadataProvider for InMemoryCube {
    fn cube_name(&self) -> &str {
        &self.name
    }

    fn hierarchies(&self) -> MetadataResult<Vec<Hierarchy>> {
        Ok(self.hierarchies.clone())
    }

    fn levels(&self, hierarchy: &Hierarchy) -> MetadataResult<Vec<Level>> {
        let mut levels: Vec<Level> = self
            .levels
            .iter()
            .filter(|l| l.hierarchy == hierarchy.unique_name)
            .cloned()
            .collect();
        levels.sort_by_key(|l| l.depth);
        Ok(levels)
    }

    fn members(&self, level: &Level) -> MetadataResult<Vec<Member>> {
        Ok(self
            .members
            .iter()
            .filter(|m| m.level == level.unique_name)
            .cloned()
            .collect())
    }

    fn lookup_member(&self, unique_name: &str) -> MetadataResult<Member> {
        let canonical = Identifier::from_unique_name(unique_name).to_string();
        self.members
            .iter()
            .find(|m| m.unique_name == unique_name || m.unique_name == canonical)
            .cloned()
            .ok_or_else(|| MetadataError::NotFound {
                kind: ObjectKind::Member,
                name: unique_name.to_string(),
            })
    }

    fn measures(&self) -> MetadataResult<Vec<Measure>> {
        Ok(self.measures.clone())
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Builder for [`InMemoryCube`].
///
/// Members are declared by unique name only; their level and parent are
/// inferred from how many segments follow the hierarchy's own name.
#[derive(Debug, Clone)]
#[must_use = "builders have no effect until built"]
pub struct CubeBuilder {
    cube: InMemoryCube,
    errors: Vec<String>,
}

impl CubeBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            cube: InMemoryCube {
                name: name.to_string(),
                ..Default::default()
            },
            errors: vec![],
        }
    }

    /// Add a regular hierarchy with the given levels, top-most first.
    pub fn hierarchy(self, name: &str, levels: &[&str]) -> Self {
        self.hierarchy_of_kind(name, DimensionKind::Regular, levels)
    }

    /// Add a time hierarchy with the given levels, top-most first.
    pub fn time_hierarchy(self, name: &str, levels: &[&str]) -> Self {
        self.hierarchy_of_kind(name, DimensionKind::Time, levels)
    }

    fn hierarchy_of_kind(mut self, name: &str, kind: DimensionKind, levels: &[&str]) -> Self {
        let unique_name = quote_name(name);
        self.cube.hierarchies.push(Hierarchy {
            name: name.to_string(),
            unique_name: unique_name.clone(),
            dimension: name.to_string(),
            kind,
        });
        for (depth, level) in levels.iter().enumerate() {
            self.cube.levels.push(Level {
                name: level.to_string(),
                unique_name: format!("{}.{}", unique_name, quote_name(level)),
                hierarchy: unique_name.clone(),
                depth,
            });
        }
        self
    }

    /// Add a member; its level is the hierarchy level at the member's depth.
    pub fn member(mut self, unique_name: &str) -> Self {
        match self.resolve_member(unique_name) {
            Ok(member) => self.cube.members.push(member),
            Err(message) => self.errors.push(message),
        }
        self
    }

    pub fn members(self, unique_names: &[&str]) -> Self {
        unique_names
            .iter()
            .fold(self, |builder, name| builder.member(name))
    }

    /// Add a stored measure, creating the measures hierarchy on first use.
    pub fn measure(mut self, name: &str) -> Self {
        let hierarchy = quote_name(MEASURES);
        if !self.cube.hierarchies.iter().any(|h| h.unique_name == hierarchy) {
            self.cube.hierarchies.push(Hierarchy {
                name: MEASURES.to_string(),
                unique_name: hierarchy.clone(),
                dimension: MEASURES.to_string(),
                kind: DimensionKind::Measures,
            });
            self.cube.levels.push(Level {
                name: MEASURES_LEVEL.to_string(),
                unique_name: format!("{}.{}", hierarchy, quote_name(MEASURES_LEVEL)),
                hierarchy: hierarchy.clone(),
                depth: 0,
            });
        }

        let unique_name = format!("{}.{}", hierarchy, quote_name(name));
        self.cube.measures.push(Measure {
            name: name.to_string(),
            unique_name: unique_name.clone(),
            caption: None,
            hierarchy: hierarchy.clone(),
        });
        self.cube.members.push(Member {
            name: name.to_string(),
            unique_name,
            caption: None,
            level: format!("{}.{}", hierarchy, quote_name(MEASURES_LEVEL)),
            hierarchy,
            parent: None,
        });
        self
    }

    pub fn build(self) -> MetadataResult<InMemoryCube> {
        if self.errors.is_empty() {
            Ok(self.cube)
        } else {
            Err(MetadataError::InvalidSchema(self.errors.join("; ")))
        }
    }

    fn resolve_member(&self, unique_name: &str) -> Result<Member, String> {
        let id = Identifier::from_unique_name(unique_name);

        let hierarchy = self
            .cube
            .hierarchies
            .iter()
            .find(|h| {
                let prefix = Identifier::from_unique_name(&h.unique_name);
                prefix.segments.len() < id.segments.len()
                    && prefix
                        .segments
                        .iter()
                        .zip(&id.segments)
                        .all(|(a, b)| a.name == b.name)
            })
            .ok_or_else(|| format!("no hierarchy for member {unique_name}"))?;

        let prefix_len = Identifier::from_unique_name(&hierarchy.unique_name)
            .segments
            .len();
        let depth = id.segments.len() - prefix_len - 1;

        let level = self
            .cube
            .levels
            .iter()
            .find(|l| l.hierarchy == hierarchy.unique_name && l.depth == depth)
            .ok_or_else(|| format!("member {unique_name} is deeper than hierarchy {}", hierarchy.name))?;

        let parent = (depth > 0).then(|| {
            Identifier::new(id.segments[..id.segments.len() - 1].to_vec()).to_string()
        });

        Ok(Member {
            name: id.last_name().unwrap_or_default().to_string(),
            unique_name: id.to_string(),
            caption: None,
            level: level.unique_name.clone(),
            hierarchy: hierarchy.unique_name.clone(),
            parent,
        })
    }
}
