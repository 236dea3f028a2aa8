//! The query root: axes, hierarchies, measures and parameters.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Settings;
use crate::error::{ObjectKind, QueryError, QueryResult};
use crate::mdx::SelectStatement;
use crate::metadata::MetadataProvider;
use crate::params;

use super::axis::{AxisLocation, AxisSelection};
use super::calculated::{CalculatedMeasure, CalculatedMember};
use super::details::{DetailMeasure, QueryDetails};
use super::hierarchy::{HierarchyId, HierarchySelection};
use super::level::ParameterMode;
use super::modifiers::{HierarchizeMode, QuerySet, SelectionModifiers};

/// When the levels of a consistent hierarchy are chained with `Exists`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyPolicy {
    /// Every level after the first is restricted by the level before it.
    #[default]
    Chained,
    /// Only when the level before it restricts its members.
    RestrictedOnly,
}

/// An OLAP query under construction.
///
/// Every hierarchy of the cube gets a [`HierarchySelection`] when the
/// query is created, parked on [`AxisLocation::Unused`]. Each hierarchy
/// is on exactly one axis at a time.
///
/// A query is not synchronised. Mutating it while another thread compiles
/// it needs outside locking.
#[derive(Debug, Clone)]
pub struct Query {
    name: String,
    cube: Arc<dyn MetadataProvider>,
    hierarchies: Vec<HierarchySelection>,
    axes: Vec<AxisSelection>,
    calculated_measures: Vec<CalculatedMeasure>,
    details: QueryDetails,
    default_hierarchize_mode: HierarchizeMode,
    lowest_levels_only: bool,
    visual_totals: bool,
    visual_totals_pattern: Option<String>,
    consistency: ConsistencyPolicy,
    parameters: BTreeMap<String, String>,
}

impl Query {
    pub fn new(name: &str, cube: Arc<dyn MetadataProvider>) -> QueryResult<Self> {
        let mut hierarchies = Vec::new();
        let mut unused = AxisSelection::new(AxisLocation::Unused);
        for (index, hierarchy) in cube.hierarchies()?.into_iter().enumerate() {
            let levels = cube.levels(&hierarchy)?;
            let id = HierarchyId(index);
            unused.insert(id, None);
            hierarchies.push(HierarchySelection::new(id, hierarchy, levels));
        }
        debug!(query = name, cube = cube.cube_name(), hierarchies = hierarchies.len(), "created query");

        Ok(Self {
            name: name.to_string(),
            cube,
            hierarchies,
            axes: vec![
                AxisSelection::new(AxisLocation::Columns),
                AxisSelection::new(AxisLocation::Rows),
                AxisSelection::new(AxisLocation::Filter),
                unused,
            ],
            calculated_measures: vec![],
            details: QueryDetails::default(),
            default_hierarchize_mode: HierarchizeMode::default(),
            lowest_levels_only: false,
            visual_totals: false,
            visual_totals_pattern: None,
            consistency: ConsistencyPolicy::default(),
            parameters: BTreeMap::new(),
        })
    }

    /// Create a query seeded with configured defaults.
    pub fn with_settings(
        name: &str,
        cube: Arc<dyn MetadataProvider>,
        settings: &Settings,
    ) -> QueryResult<Self> {
        let mut query = Self::new(name, cube)?;
        query.default_hierarchize_mode = settings.query.default_hierarchize_mode;
        query.lowest_levels_only = settings.query.lowest_levels_only;
        query.consistency = settings.query.consistency;
        query.visual_totals = settings.visual_totals.enabled;
        query.visual_totals_pattern = settings.visual_totals.pattern.clone();
        query.details.set_axis(settings.details.axis)?;
        query.details.set_location(settings.details.location);
        for location in [AxisLocation::Columns, AxisLocation::Rows] {
            query.axis_mut(location)?.set_non_empty(settings.axes.non_empty);
        }
        Ok(query)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn cube(&self) -> &dyn MetadataProvider {
        self.cube.as_ref()
    }

    // =========================================================================
    // Hierarchies and axes
    // =========================================================================

    pub fn hierarchies(&self) -> &[HierarchySelection] {
        &self.hierarchies
    }

    /// Look a hierarchy up by name or unique name.
    pub fn hierarchy(&self, name: &str) -> QueryResult<&HierarchySelection> {
        self.hierarchies
            .iter()
            .find(|h| h.matches(name))
            .ok_or_else(|| QueryError::not_found(ObjectKind::Hierarchy, name))
    }

    pub fn hierarchy_mut(&mut self, name: &str) -> QueryResult<&mut HierarchySelection> {
        self.hierarchies
            .iter_mut()
            .find(|h| h.matches(name))
            .ok_or_else(|| QueryError::not_found(ObjectKind::Hierarchy, name))
    }

    pub fn hierarchy_by_id(&self, id: HierarchyId) -> Option<&HierarchySelection> {
        self.hierarchies.get(id.0)
    }

    /// `None` for an axis that has not been enabled.
    pub fn axis(&self, location: AxisLocation) -> Option<&AxisSelection> {
        self.axes.iter().find(|a| a.location() == location)
    }

    pub fn axis_mut(&mut self, location: AxisLocation) -> QueryResult<&mut AxisSelection> {
        self.axes
            .iter_mut()
            .find(|a| a.location() == location)
            .ok_or_else(|| {
                QueryError::InvalidState(format!("Axis {} is not enabled", location.name()))
            })
    }

    /// Hierarchies on an axis, in axis order.
    pub fn axis_hierarchies(&self, location: AxisLocation) -> Vec<&HierarchySelection> {
        self.axis(location)
            .map(|axis| {
                axis.hierarchy_ids()
                    .iter()
                    .filter_map(|id| self.hierarchy_by_id(*id))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Add an optional axis. Enabling an axis that exists does nothing.
    pub fn enable_axis(&mut self, location: AxisLocation) {
        if self.axis(location).is_none() {
            self.axes.push(AxisSelection::new(location));
        }
    }

    /// Move a hierarchy to `to`, at `position` or appended.
    ///
    /// Does nothing when the hierarchy is already on `to` and no position
    /// is given.
    pub fn move_hierarchy(
        &mut self,
        hierarchy: &str,
        to: AxisLocation,
        position: Option<usize>,
    ) -> QueryResult<()> {
        let (id, from) = {
            let h = self.hierarchy(hierarchy)?;
            (h.id(), h.axis())
        };
        self.axis_mut(to)?;
        if from == to && position.is_none() {
            return Ok(());
        }

        self.axis_mut(from)?.remove(id);
        self.axis_mut(to)?.insert(id, position);
        self.hierarchies[id.0].set_axis(to);
        debug!(hierarchy, from = from.name(), to = to.name(), "moved hierarchy");
        Ok(())
    }

    /// Exchange the hierarchies of COLUMNS and ROWS.
    ///
    /// Fails when a PAGES axis is enabled, since the swap would be ambiguous.
    pub fn swap_axes(&mut self) -> QueryResult<()> {
        if self.axis(AxisLocation::Pages).is_some() {
            return Err(QueryError::InvalidState(
                "Cannot swap axes when more than two positional axes exist".into(),
            ));
        }
        let columns = self.axis_mut(AxisLocation::Columns)?.take_hierarchies();
        let rows = self.axis_mut(AxisLocation::Rows)?.take_hierarchies();

        for id in &columns {
            self.hierarchies[id.0].set_axis(AxisLocation::Rows);
        }
        for id in &rows {
            self.hierarchies[id.0].set_axis(AxisLocation::Columns);
        }
        self.axis_mut(AxisLocation::Columns)?.replace_hierarchies(rows);
        self.axis_mut(AxisLocation::Rows)?.replace_hierarchies(columns);
        Ok(())
    }

    /// Move every hierarchy on an axis to UNUSED and reset the axis
    /// modifiers.
    pub fn clear_axis(&mut self, location: AxisLocation) -> QueryResult<()> {
        if location == AxisLocation::Unused {
            return Ok(());
        }
        let axis = self.axis_mut(location)?;
        let ids = axis.take_hierarchies();
        *axis.modifiers_mut() = SelectionModifiers::default();

        let unused = self.axis_mut(AxisLocation::Unused)?;
        for id in &ids {
            unused.insert(*id, None);
        }
        for id in ids {
            self.hierarchies[id.0].set_axis(AxisLocation::Unused);
        }
        Ok(())
    }

    // =========================================================================
    // Selections by name
    // =========================================================================

    /// Include a member, looked up by unique name, on `hierarchy`.
    pub fn include_member(&mut self, hierarchy: &str, member: &str) -> QueryResult<()> {
        let member = self.cube.lookup_member(member)?;
        self.hierarchy_mut(hierarchy)?.include_member(member)
    }

    pub fn exclude_member(&mut self, hierarchy: &str, member: &str) -> QueryResult<()> {
        let member = self.cube.lookup_member(member)?;
        self.hierarchy_mut(hierarchy)?.exclude_member(member)
    }

    pub fn include_level(&mut self, hierarchy: &str, level: &str) -> QueryResult<()> {
        self.hierarchy_mut(hierarchy)?.include_level(level)?;
        Ok(())
    }

    pub fn exclude_level(&mut self, hierarchy: &str, level: &str) -> QueryResult<()> {
        self.hierarchy_mut(hierarchy)?.exclude_level(level)
    }

    pub fn set_range(&mut self, hierarchy: &str, start: &str, end: &str) -> QueryResult<()> {
        let start = self.cube.lookup_member(start)?;
        let end = self.cube.lookup_member(end)?;
        self.hierarchy_mut(hierarchy)?.set_range(start, end)
    }

    pub fn set_range_expressions(
        &mut self,
        hierarchy: &str,
        level: &str,
        start: &str,
        end: &str,
    ) -> QueryResult<()> {
        self.hierarchy_mut(hierarchy)?
            .set_range_expressions(level, start, end)
    }

    /// Bind a query parameter to a level, activating the level.
    pub fn bind_level_parameter(
        &mut self,
        hierarchy: &str,
        level: &str,
        parameter: &str,
        mode: ParameterMode,
    ) -> QueryResult<()> {
        self.hierarchy_mut(hierarchy)?
            .include_level(level)?
            .bind_parameter(parameter, mode);
        Ok(())
    }

    // =========================================================================
    // Calculated members and measures
    // =========================================================================

    /// Create a calculated member on `hierarchy` and register it. It is
    /// not active until passed to [`Query::include_calculated_member`].
    pub fn create_calculated_member(
        &mut self,
        hierarchy: &str,
        name: &str,
        formula: &str,
        parent: Option<&str>,
    ) -> QueryResult<CalculatedMember> {
        let parent = parent.map(|p| self.cube.lookup_member(p)).transpose()?;
        let h = self.hierarchy_mut(hierarchy)?;
        let cm = CalculatedMember::new(h.hierarchy(), name, formula, parent.as_ref())?;
        h.add_calculated_member(cm.clone())?;
        Ok(cm)
    }

    pub fn include_calculated_member(
        &mut self,
        hierarchy: &str,
        cm: CalculatedMember,
    ) -> QueryResult<()> {
        self.hierarchy_mut(hierarchy)?.include_calculated_member(cm)
    }

    /// Create and register a calculated measure. Without a hierarchy it
    /// goes on the hierarchy of the cube's first measure.
    pub fn create_calculated_measure(
        &mut self,
        name: &str,
        formula: &str,
        hierarchy: Option<&str>,
    ) -> QueryResult<CalculatedMeasure> {
        let hierarchy = match hierarchy {
            Some(h) => self.cube.hierarchy(h)?,
            None => {
                let first = self.cube.measures()?.into_iter().next().ok_or_else(|| {
                    QueryError::not_found(ObjectKind::Measure, "any measure in the cube")
                })?;
                self.cube.hierarchy(&first.hierarchy)?
            }
        };
        let cm = CalculatedMeasure::new(&hierarchy, name, formula)?;
        self.add_calculated_measure(cm.clone());
        Ok(cm)
    }

    /// Register a calculated measure, replacing one with the same unique
    /// name both here and on the details axis.
    pub fn add_calculated_measure(&mut self, cm: CalculatedMeasure) {
        self.details.refresh_calculated(&cm);
        match self
            .calculated_measures
            .iter_mut()
            .find(|m| m.unique_name() == cm.unique_name())
        {
            Some(existing) => *existing = cm,
            None => self.calculated_measures.push(cm),
        }
    }

    pub fn calculated_measures(&self) -> &[CalculatedMeasure] {
        &self.calculated_measures
    }

    pub fn calculated_measure(&self, name: &str) -> Option<&CalculatedMeasure> {
        self.calculated_measures
            .iter()
            .find(|m| m.name() == name || m.unique_name() == name)
    }

    /// Put a measure on the details axis. Calculated measures of this
    /// query are matched before the cube's stored measures.
    pub fn add_measure(&mut self, name: &str) -> QueryResult<()> {
        let measure = match self.calculated_measure(name) {
            Some(cm) => DetailMeasure::Calculated(cm.clone()),
            None => DetailMeasure::Stored(self.cube.measure(name)?),
        };
        self.details.add(measure);
        Ok(())
    }

    pub fn details(&self) -> &QueryDetails {
        &self.details
    }

    pub fn details_mut(&mut self) -> &mut QueryDetails {
        &mut self.details
    }

    // =========================================================================
    // Query-wide defaults
    // =========================================================================

    pub fn default_hierarchize_mode(&self) -> HierarchizeMode {
        self.default_hierarchize_mode
    }

    pub fn set_default_hierarchize_mode(&mut self, mode: HierarchizeMode) {
        self.default_hierarchize_mode = mode;
    }

    pub fn lowest_levels_only(&self) -> bool {
        self.lowest_levels_only
    }

    pub fn set_lowest_levels_only(&mut self, enabled: bool) {
        self.lowest_levels_only = enabled;
    }

    /// Visual totals for hierarchies that do not set their own.
    pub fn visual_totals(&self) -> bool {
        self.visual_totals
    }

    pub fn set_visual_totals(&mut self, enabled: bool) {
        self.visual_totals = enabled;
    }

    pub fn visual_totals_pattern(&self) -> Option<&str> {
        self.visual_totals_pattern.as_deref()
    }

    pub fn set_visual_totals_pattern(&mut self, pattern: Option<&str>) {
        self.visual_totals_pattern = pattern.map(str::to_string);
    }

    pub fn consistency_policy(&self) -> ConsistencyPolicy {
        self.consistency
    }

    pub fn set_consistency_policy(&mut self, policy: ConsistencyPolicy) {
        self.consistency = policy;
    }

    // =========================================================================
    // Parameters
    // =========================================================================

    /// Bind a parameter value, or clear it with `None`. Values are only
    /// read when the query is compiled.
    pub fn set_parameter(&mut self, name: &str, value: Option<&str>) {
        match value {
            Some(value) => {
                self.parameters.insert(name.to_string(), value.to_string());
            }
            None => {
                self.parameters.remove(name);
            }
        }
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters.get(name).map(String::as_str)
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    /// Every parameter the query refers to, bound or not.
    pub fn required_parameters(&self) -> BTreeSet<String> {
        let mut literals: Vec<&str> = Vec::new();
        let mut names = BTreeSet::new();

        for axis in &self.axes {
            if axis.location() == AxisLocation::Unused {
                continue;
            }
            literals.extend(axis.modifiers().literals());
            for h in self.axis_hierarchies(axis.location()) {
                literals.extend(h.literals());
                names.extend(
                    h.active_levels()
                        .filter_map(|l| l.parameter())
                        .map(|p| p.name.clone()),
                );
            }
        }
        for measure in self.details.measures() {
            if let DetailMeasure::Calculated(cm) = measure {
                literals.extend(cm.as_member().literals());
            }
        }

        names.extend(literals.into_iter().flat_map(params::placeholders));
        names
    }

    // =========================================================================
    // Compilation
    // =========================================================================

    /// Compile into a fresh statement. The query is not modified.
    pub fn compile(&self) -> QueryResult<SelectStatement> {
        crate::compile::compile(self)
    }

    /// Compile and render as MDX text.
    pub fn to_mdx(&self) -> QueryResult<String> {
        Ok(self.compile()?.to_mdx())
    }
}
