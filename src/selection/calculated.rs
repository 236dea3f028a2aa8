//! Query-scoped calculated members and measures.

use std::collections::BTreeMap;

use crate::error::{ObjectKind, QueryError, QueryResult};
use crate::mdx::quote_name;
use crate::metadata::{Hierarchy, Member};

/// A formula-defined member that lives for the duration of one query.
///
/// The unique name is `<parent>.[name]` when a parent member is given and
/// `<hierarchy>.[name]` otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatedMember {
    name: String,
    unique_name: String,
    hierarchy: String,
    parent: Option<String>,
    formula: String,
    properties: BTreeMap<String, String>,
}

impl CalculatedMember {
    /// Fails with `DomainMismatch` when `parent` is not in `hierarchy`.
    pub fn new(
        hierarchy: &Hierarchy,
        name: &str,
        formula: &str,
        parent: Option<&Member>,
    ) -> QueryResult<Self> {
        if let Some(parent) = parent {
            if parent.hierarchy != hierarchy.unique_name {
                return Err(QueryError::mismatch(
                    ObjectKind::Member,
                    &parent.unique_name,
                    &hierarchy.unique_name,
                ));
            }
        }
        let prefix = parent
            .map(|p| p.unique_name.as_str())
            .unwrap_or(&hierarchy.unique_name);

        Ok(Self {
            name: name.to_string(),
            unique_name: format!("{}.{}", prefix, quote_name(name)),
            hierarchy: hierarchy.unique_name.clone(),
            parent: parent.map(|p| p.unique_name.clone()),
            formula: formula.to_string(),
            properties: BTreeMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unique_name(&self) -> &str {
        &self.unique_name
    }

    /// Unique name of the owning hierarchy.
    pub fn hierarchy(&self) -> &str {
        &self.hierarchy
    }

    pub fn parent(&self) -> Option<&str> {
        self.parent.as_deref()
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    /// Member properties such as `FORMAT_STRING` or `SOLVE_ORDER`. Values
    /// are MDX expressions.
    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.set_property(name, value);
        self
    }

    pub fn set_property(&mut self, name: &str, value: &str) {
        self.properties.insert(name.to_string(), value.to_string());
    }

    pub(crate) fn literals(&self) -> Vec<&str> {
        std::iter::once(self.formula.as_str())
            .chain(self.properties.values().map(String::as_str))
            .collect()
    }
}

/// A calculated member on the measures hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatedMeasure {
    member: CalculatedMember,
}

impl CalculatedMeasure {
    pub fn new(measures: &Hierarchy, name: &str, formula: &str) -> QueryResult<Self> {
        Ok(Self {
            member: CalculatedMember::new(measures, name, formula, None)?,
        })
    }

    pub fn name(&self) -> &str {
        self.member.name()
    }

    pub fn unique_name(&self) -> &str {
        self.member.unique_name()
    }

    pub fn formula(&self) -> &str {
        self.member.formula()
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.member.set_property(name, value);
        self
    }

    pub fn as_member(&self) -> &CalculatedMember {
        &self.member
    }
}
