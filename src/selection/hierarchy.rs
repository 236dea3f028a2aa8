//! Per-hierarchy selections.

use crate::error::{ObjectKind, QueryError, QueryResult};
use crate::metadata::{Hierarchy, Level, Member};

use super::axis::AxisLocation;
use super::calculated::CalculatedMember;
use super::level::{LevelRange, LevelSelection};
use super::modifiers::{QuerySet, SelectionModifiers};

/// Stable handle of a hierarchy selection inside its query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HierarchyId(pub(crate) usize);

/// Selection state of one cube hierarchy.
///
/// Every level of the hierarchy has a [`LevelSelection`] from the start;
/// only active levels contribute to the compiled set. Active levels are
/// kept in depth order regardless of the order they were included in.
#[derive(Debug, Clone, PartialEq)]
pub struct HierarchySelection {
    id: HierarchyId,
    hierarchy: Hierarchy,
    levels: Vec<LevelSelection>,
    active_levels: Vec<String>,
    calculated_members: Vec<CalculatedMember>,
    active_calculated_members: Vec<String>,
    consistent: bool,
    visual_totals: Option<bool>,
    visual_totals_pattern: Option<String>,
    axis: AxisLocation,
    modifiers: SelectionModifiers,
}

impl HierarchySelection {
    pub(crate) fn new(id: HierarchyId, hierarchy: Hierarchy, mut levels: Vec<Level>) -> Self {
        levels.sort_by_key(|l| l.depth);
        Self {
            id,
            hierarchy,
            levels: levels.into_iter().map(LevelSelection::new).collect(),
            active_levels: vec![],
            calculated_members: vec![],
            active_calculated_members: vec![],
            consistent: true,
            visual_totals: None,
            visual_totals_pattern: None,
            axis: AxisLocation::Unused,
            modifiers: SelectionModifiers::default(),
        }
    }

    pub fn id(&self) -> HierarchyId {
        self.id
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn name(&self) -> &str {
        &self.hierarchy.name
    }

    pub fn unique_name(&self) -> &str {
        &self.hierarchy.unique_name
    }

    /// Axis currently holding this hierarchy.
    pub fn axis(&self) -> AxisLocation {
        self.axis
    }

    pub(crate) fn set_axis(&mut self, axis: AxisLocation) {
        self.axis = axis;
    }

    pub(crate) fn matches(&self, name: &str) -> bool {
        self.hierarchy.name == name || self.hierarchy.unique_name == name
    }

    // =========================================================================
    // Levels
    // =========================================================================

    pub fn levels(&self) -> &[LevelSelection] {
        &self.levels
    }

    /// Look a level up by name or unique name.
    pub fn level(&self, name: &str) -> Option<&LevelSelection> {
        self.levels
            .iter()
            .find(|l| l.name() == name || l.unique_name() == name)
    }

    pub fn level_mut(&mut self, name: &str) -> Option<&mut LevelSelection> {
        self.levels
            .iter_mut()
            .find(|l| l.name() == name || l.unique_name() == name)
    }

    /// Active levels, top-most first.
    pub fn active_levels(&self) -> impl Iterator<Item = &LevelSelection> {
        self.levels
            .iter()
            .filter(|l| self.active_levels.iter().any(|a| a == l.unique_name()))
    }

    pub fn is_level_active(&self, name: &str) -> bool {
        self.level(name)
            .is_some_and(|l| self.active_levels.iter().any(|a| a == l.unique_name()))
    }

    /// Activate a level and return it for further changes.
    pub fn include_level(&mut self, name: &str) -> QueryResult<&mut LevelSelection> {
        let unique_name = self.require_level(name)?.to_string();
        if !self.active_levels.contains(&unique_name) {
            self.active_levels.push(unique_name.clone());
        }
        self.level_mut(&unique_name)
            .ok_or_else(|| QueryError::not_found(ObjectKind::Level, name))
    }

    /// Deactivate a level. Its selections are kept for a later include.
    pub fn exclude_level(&mut self, name: &str) -> QueryResult<()> {
        let unique_name = self.require_level(name)?.to_string();
        self.active_levels.retain(|a| *a != unique_name);
        Ok(())
    }

    /// Include a member on its level, activating the level.
    pub fn include_member(&mut self, member: Member) -> QueryResult<()> {
        let level = self.member_level(&member)?;
        self.include_level(&level)?.include(member);
        Ok(())
    }

    /// Exclude a member on its level, activating the level.
    pub fn exclude_member(&mut self, member: Member) -> QueryResult<()> {
        let level = self.member_level(&member)?;
        self.include_level(&level)?.exclude(member);
        Ok(())
    }

    /// Select the members from `start` to `end`; both must be on the same
    /// level of this hierarchy.
    pub fn set_range(&mut self, start: Member, end: Member) -> QueryResult<()> {
        let level = self.member_level(&start)?;
        if self.member_level(&end)? != level {
            return Err(QueryError::InvalidArgument(format!(
                "Range bounds {} and {} are on different levels",
                start.unique_name, end.unique_name
            )));
        }
        self.include_level(&level)?
            .set_range(LevelRange::Members { start, end });
        Ok(())
    }

    /// Select a range given as two MDX expressions. The boundaries are not
    /// checked against metadata.
    pub fn set_range_expressions(&mut self, level: &str, start: &str, end: &str) -> QueryResult<()> {
        self.include_level(level)?.set_range(LevelRange::Expressions {
            start: start.to_string(),
            end: end.to_string(),
        });
        Ok(())
    }

    fn require_level(&self, name: &str) -> QueryResult<&str> {
        self.level(name)
            .map(|l| l.unique_name())
            .ok_or_else(|| QueryError::not_found(ObjectKind::Level, name))
    }

    fn member_level(&self, member: &Member) -> QueryResult<String> {
        if member.hierarchy != self.hierarchy.unique_name {
            return Err(QueryError::mismatch(
                ObjectKind::Member,
                &member.unique_name,
                &self.hierarchy.unique_name,
            ));
        }
        self.level(&member.level)
            .map(|l| l.unique_name().to_string())
            .ok_or_else(|| {
                QueryError::mismatch(ObjectKind::Level, &member.level, &self.hierarchy.unique_name)
            })
    }

    // =========================================================================
    // Calculated members
    // =========================================================================

    /// Register a calculated member without activating it.
    pub fn add_calculated_member(&mut self, cm: CalculatedMember) -> QueryResult<()> {
        self.check_calculated(&cm)?;
        match self
            .calculated_members
            .iter_mut()
            .find(|c| c.unique_name() == cm.unique_name())
        {
            Some(existing) => *existing = cm,
            None => self.calculated_members.push(cm),
        }
        Ok(())
    }

    /// Register and activate a calculated member.
    pub fn include_calculated_member(&mut self, cm: CalculatedMember) -> QueryResult<()> {
        let unique_name = cm.unique_name().to_string();
        self.add_calculated_member(cm)?;
        if !self.active_calculated_members.contains(&unique_name) {
            self.active_calculated_members.push(unique_name);
        }
        Ok(())
    }

    pub fn exclude_calculated_member(&mut self, unique_name: &str) {
        self.active_calculated_members.retain(|a| a != unique_name);
    }

    pub fn calculated_members(&self) -> &[CalculatedMember] {
        &self.calculated_members
    }

    /// Active calculated members, in the order they were included.
    pub fn active_calculated_members(&self) -> impl Iterator<Item = &CalculatedMember> {
        self.active_calculated_members.iter().filter_map(|name| {
            self.calculated_members
                .iter()
                .find(|c| c.unique_name() == name)
        })
    }

    fn check_calculated(&self, cm: &CalculatedMember) -> QueryResult<()> {
        if cm.hierarchy() == self.hierarchy.unique_name {
            Ok(())
        } else {
            Err(QueryError::mismatch(
                ObjectKind::CalculatedMember,
                cm.unique_name(),
                &self.hierarchy.unique_name,
            ))
        }
    }

    // =========================================================================
    // Flags
    // =========================================================================

    /// Whether later levels are restricted to descendants of earlier ones.
    pub fn is_consistent(&self) -> bool {
        self.consistent
    }

    pub fn set_consistent(&mut self, consistent: bool) {
        self.consistent = consistent;
    }

    /// Visual totals for this hierarchy; `None` defers to the query.
    pub fn visual_totals(&self) -> Option<bool> {
        self.visual_totals
    }

    pub fn set_visual_totals(&mut self, enabled: bool) {
        self.visual_totals = Some(enabled);
    }

    pub fn visual_totals_pattern(&self) -> Option<&str> {
        self.visual_totals_pattern.as_deref()
    }

    pub fn set_visual_totals_pattern(&mut self, pattern: &str) {
        self.visual_totals_pattern = Some(pattern.to_string());
    }

    pub fn clear_visual_totals(&mut self) {
        self.visual_totals = None;
        self.visual_totals_pattern = None;
    }

    /// Reset every selection on this hierarchy and its levels.
    pub fn clear(&mut self) {
        for level in &mut self.levels {
            level.clear_selections();
            level.clear_parameter();
            *level.modifiers_mut() = SelectionModifiers::default();
        }
        self.active_levels.clear();
        self.active_calculated_members.clear();
        self.modifiers = SelectionModifiers::default();
    }

    /// Literal MDX of this hierarchy, its active levels and its active
    /// calculated members.
    pub(crate) fn literals(&self) -> Vec<&str> {
        let mut literals = self.modifiers.literals();
        for level in self.active_levels() {
            literals.extend(level.literals());
        }
        for cm in self.active_calculated_members() {
            literals.extend(cm.literals());
        }
        literals
    }
}

impl QuerySet for HierarchySelection {
    fn modifiers(&self) -> &SelectionModifiers {
        &self.modifiers
    }

    fn modifiers_mut(&mut self) -> &mut SelectionModifiers {
        &mut self.modifiers
    }
}
