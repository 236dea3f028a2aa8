//! Level sets.

use tracing::{trace, warn};

use crate::error::QueryResult;
use crate::mdx::{except, member, range, set, Expr, ExprExt};
use crate::params::split_member_list;
use crate::selection::{
    HierarchySelection, LevelRange, LevelSelection, ParameterMode, QuerySet,
};

use super::{current_member_name, Compiler};

impl Compiler<'_> {
    /// Compile one active level.
    ///
    /// A bound override parameter or an override literal replaces the
    /// structural set; the level's filters and sort apply either way.
    pub(super) fn compile_level(
        &self,
        hierarchy: &HierarchySelection,
        level: &LevelSelection,
    ) -> QueryResult<Expr> {
        let expr = match self.level_override(level)? {
            Some(expr) => expr,
            None => {
                let inclusions = self.parameter_inclusions(hierarchy, level)?;
                self.structural_level(level, inclusions)?
            }
        };

        self.wrap(
            expr,
            level.modifiers(),
            Some(current_member_name(hierarchy.unique_name())),
        )
    }

    /// A bound override parameter, else the override literal.
    fn level_override(&self, level: &LevelSelection) -> QueryResult<Option<Expr>> {
        if let Some(binding) = level.parameter() {
            if binding.mode == ParameterMode::Override {
                if let Some(value) = self.query.parameter(&binding.name) {
                    trace!(parameter = %binding.name, level = level.unique_name(), "level overridden by parameter");
                    return Ok(Some(super::as_set(self.parse(value)?)));
                }
                trace!(parameter = %binding.name, level = level.unique_name(), "parameter unbound, using structural selection");
            }
        }
        self.override_of(level.modifiers())
    }

    /// Members of a bound inclusion parameter. `None` when the level has
    /// no such parameter, it is unbound, or it names no member of this
    /// hierarchy.
    fn parameter_inclusions(
        &self,
        hierarchy: &HierarchySelection,
        level: &LevelSelection,
    ) -> QueryResult<Option<Vec<Expr>>> {
        let Some(binding) = level.parameter() else {
            return Ok(None);
        };
        if binding.mode != ParameterMode::Inclusion {
            return Ok(None);
        }
        let Some(value) = self.query.parameter(&binding.name) else {
            trace!(parameter = %binding.name, level = level.unique_name(), "parameter unbound, using structural selection");
            return Ok(None);
        };
        let members = self.parameter_members(hierarchy, value)?;
        if members.is_empty() {
            trace!(parameter = %binding.name, level = level.unique_name(), "parameter selects no members, using structural selection");
            return Ok(None);
        }
        Ok(Some(members))
    }

    /// Range, inclusions or all members, then `Except` for exclusions.
    fn structural_level(
        &self,
        level: &LevelSelection,
        inclusions: Option<Vec<Expr>>,
    ) -> QueryResult<Expr> {
        let inclusions = inclusions.unwrap_or_else(|| {
            level
                .inclusions()
                .iter()
                .map(|m| member(&m.unique_name))
                .collect()
        });

        let base = match level.range() {
            Some(LevelRange::Members { start, end }) => set(vec![range(
                member(&start.unique_name),
                member(&end.unique_name),
            )]),
            Some(LevelRange::Expressions { start, end }) => {
                set(vec![range(self.parse(start)?, self.parse(end)?)])
            }
            None if !inclusions.is_empty() => set(inclusions),
            None => set(vec![member(level.unique_name()).property("Members")]),
        };

        if level.exclusions().is_empty() {
            return Ok(base);
        }
        let excluded = level
            .exclusions()
            .iter()
            .map(|m| member(&m.unique_name))
            .collect();
        Ok(except(base, set(excluded)))
    }

    /// Members named by an inclusion parameter. Members of other
    /// hierarchies are skipped.
    fn parameter_members(
        &self,
        hierarchy: &HierarchySelection,
        value: &str,
    ) -> QueryResult<Vec<Expr>> {
        let mut members = Vec::new();
        for name in split_member_list(value) {
            let found = self.query.cube().lookup_member(&name)?;
            if found.hierarchy != hierarchy.unique_name() {
                warn!(
                    member = %found.unique_name,
                    hierarchy = hierarchy.unique_name(),
                    "parameter member is outside the hierarchy, skipping"
                );
                continue;
            }
            members.push(member(&found.unique_name));
        }
        Ok(members)
    }
}
