//! Per-level selections.

use crate::metadata::{Level, Member};

use super::modifiers::{QuerySet, SelectionModifiers};

/// How a parameter bound to a level is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ParameterMode {
    /// The value is a comma-separated list of member unique names that
    /// replaces the level's inclusions.
    #[default]
    Inclusion,
    /// The value is literal MDX that replaces the whole level selection.
    Override,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterBinding {
    pub name: String,
    pub mode: ParameterMode,
}

/// A contiguous range of members on one level.
#[derive(Debug, Clone, PartialEq)]
pub enum LevelRange {
    /// Validated members: `start : end`.
    Members { start: Member, end: Member },
    /// Unvalidated MDX boundaries, e.g. `[Time].[1997].[Q1]` and
    /// `[Time].[1997].[Q1].Lead(2)`.
    Expressions { start: String, end: String },
}

/// Selection state of one level of a hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSelection {
    level: Level,
    inclusions: Vec<Member>,
    exclusions: Vec<Member>,
    range: Option<LevelRange>,
    parameter: Option<ParameterBinding>,
    modifiers: SelectionModifiers,
}

impl LevelSelection {
    pub(crate) fn new(level: Level) -> Self {
        Self {
            level,
            inclusions: vec![],
            exclusions: vec![],
            range: None,
            parameter: None,
            modifiers: SelectionModifiers::default(),
        }
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn name(&self) -> &str {
        &self.level.name
    }

    pub fn unique_name(&self) -> &str {
        &self.level.unique_name
    }

    pub fn depth(&self) -> usize {
        self.level.depth
    }

    pub fn inclusions(&self) -> &[Member] {
        &self.inclusions
    }

    pub fn exclusions(&self) -> &[Member] {
        &self.exclusions
    }

    pub fn range(&self) -> Option<&LevelRange> {
        self.range.as_ref()
    }

    pub fn parameter(&self) -> Option<&ParameterBinding> {
        self.parameter.as_ref()
    }

    /// True when the level selects all of its members unmodified.
    pub fn is_simple(&self) -> bool {
        self.modifiers.is_empty()
            && self.inclusions.is_empty()
            && self.exclusions.is_empty()
            && self.range.is_none()
            && self.parameter.is_none()
    }

    // Callers have already checked that `member` sits on this level.
    pub(crate) fn include(&mut self, member: Member) {
        self.exclusions.retain(|m| m.unique_name != member.unique_name);
        if !self.contains(&self.inclusions, &member) {
            self.inclusions.push(member);
        }
    }

    // Inclusions are left alone; the compiler wraps them in Except.
    pub(crate) fn exclude(&mut self, member: Member) {
        if !self.contains(&self.exclusions, &member) {
            self.exclusions.push(member);
        }
    }

    pub(crate) fn set_range(&mut self, range: LevelRange) {
        self.range = Some(range);
    }

    pub fn clear_range(&mut self) {
        self.range = None;
    }

    /// Bind a named query parameter to this level.
    pub fn bind_parameter(&mut self, name: &str, mode: ParameterMode) {
        self.parameter = Some(ParameterBinding {
            name: name.to_string(),
            mode,
        });
    }

    pub fn clear_parameter(&mut self) {
        self.parameter = None;
    }

    /// Drop inclusions, exclusions and the range. Modifiers and the
    /// parameter binding are kept.
    pub fn clear_selections(&mut self) {
        self.inclusions.clear();
        self.exclusions.clear();
        self.range = None;
    }

    pub(crate) fn literals(&self) -> Vec<&str> {
        let mut literals = self.modifiers.literals();
        if let Some(LevelRange::Expressions { start, end }) = &self.range {
            literals.push(start);
            literals.push(end);
        }
        literals
    }

    fn contains(&self, list: &[Member], member: &Member) -> bool {
        list.iter().any(|m| m.unique_name == member.unique_name)
    }
}

impl QuerySet for LevelSelection {
    fn modifiers(&self) -> &SelectionModifiers {
        &self.modifiers
    }

    fn modifiers_mut(&mut self) -> &mut SelectionModifiers {
        &mut self.modifiers
    }
}
