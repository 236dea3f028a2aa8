//! Query axes.

use serde::{Deserialize, Serialize};

use crate::mdx::Axis;

use super::hierarchy::HierarchyId;
use super::modifiers::{QuerySet, SelectionModifiers};

/// Where a hierarchy sits in the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisLocation {
    Columns,
    Rows,
    /// Optional third positional axis; see [`Query::enable_axis`](super::Query::enable_axis).
    Pages,
    /// The slicer (`WHERE` clause).
    Filter,
    /// Holding area for hierarchies not in the query.
    Unused,
}

impl AxisLocation {
    pub fn name(&self) -> &'static str {
        match self {
            AxisLocation::Columns => "COLUMNS",
            AxisLocation::Rows => "ROWS",
            AxisLocation::Pages => "PAGES",
            AxisLocation::Filter => "FILTER",
            AxisLocation::Unused => "UNUSED",
        }
    }

    /// The positional statement axis, if this location is one.
    pub fn statement_axis(&self) -> Option<Axis> {
        match self {
            AxisLocation::Columns => Some(Axis::Columns),
            AxisLocation::Rows => Some(Axis::Rows),
            AxisLocation::Pages => Some(Axis::Pages),
            AxisLocation::Filter | AxisLocation::Unused => None,
        }
    }
}

/// An ordered list of hierarchies on one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSelection {
    location: AxisLocation,
    hierarchies: Vec<HierarchyId>,
    non_empty: bool,
    modifiers: SelectionModifiers,
}

impl AxisSelection {
    pub(crate) fn new(location: AxisLocation) -> Self {
        Self {
            location,
            hierarchies: vec![],
            non_empty: false,
            modifiers: SelectionModifiers::default(),
        }
    }

    pub fn location(&self) -> AxisLocation {
        self.location
    }

    pub fn hierarchy_ids(&self) -> &[HierarchyId] {
        &self.hierarchies
    }

    pub fn is_empty(&self) -> bool {
        self.hierarchies.is_empty()
    }

    /// Whether empty tuples are suppressed (`NON EMPTY`).
    pub fn is_non_empty(&self) -> bool {
        self.non_empty
    }

    pub fn set_non_empty(&mut self, non_empty: bool) {
        self.non_empty = non_empty;
    }

    // Position is clamped to the end of the list.
    pub(crate) fn insert(&mut self, id: HierarchyId, position: Option<usize>) {
        let at = position.map_or(self.hierarchies.len(), |p| p.min(self.hierarchies.len()));
        self.hierarchies.insert(at, id);
    }

    pub(crate) fn remove(&mut self, id: HierarchyId) -> bool {
        let before = self.hierarchies.len();
        self.hierarchies.retain(|h| *h != id);
        self.hierarchies.len() != before
    }

    pub(crate) fn take_hierarchies(&mut self) -> Vec<HierarchyId> {
        std::mem::take(&mut self.hierarchies)
    }

    pub(crate) fn replace_hierarchies(&mut self, hierarchies: Vec<HierarchyId>) {
        self.hierarchies = hierarchies;
    }
}

impl QuerySet for AxisSelection {
    fn modifiers(&self) -> &SelectionModifiers {
        &self.modifiers
    }

    fn modifiers_mut(&mut self) -> &mut SelectionModifiers {
        &mut self.modifiers
    }
}
