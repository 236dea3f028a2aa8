//! Hierarchy sets.

use tracing::debug;

use crate::error::QueryResult;
use crate::mdx::{exists, hierarchize, member, set, visual_totals, Expr};
use crate::selection::{ConsistencyPolicy, HierarchizeMode, HierarchySelection, QuerySet};

use super::{current_member_name, Compiler, WithList};

impl Compiler<'_> {
    /// Compile a hierarchy, declaring its calculated members in `with`.
    ///
    /// Returns `None` when the hierarchy selects nothing.
    pub(super) fn compile_hierarchy(
        &self,
        hierarchy: &HierarchySelection,
        with: &mut WithList,
    ) -> QueryResult<Option<Expr>> {
        let modifiers = hierarchy.modifiers();
        let default_sort = current_member_name(hierarchy.unique_name());

        if let Some(expr) = self.override_of(modifiers)? {
            return self.wrap(expr, modifiers, Some(default_sort)).map(Some);
        }

        let mut levels = self.level_sets(hierarchy)?;
        if self.query.lowest_levels_only() && levels.len() > 1 {
            let lowest = levels.len() - 1;
            levels.drain(..lowest);
        }
        let level_count = levels.len();

        let visual = hierarchy
            .visual_totals()
            .unwrap_or_else(|| self.query.visual_totals());
        let explicit_order = modifiers.sort().is_some() || modifiers.hierarchize_mode().is_some();

        let mut level_set = match level_count {
            0 => None,
            1 => levels.pop(),
            _ => Some(set(levels)),
        };
        if (visual || level_count > 1) && !explicit_order {
            let post = self.query.default_hierarchize_mode() == HierarchizeMode::Post;
            level_set = level_set.map(|e| hierarchize(e, post));
        }

        let mut calculated = Vec::new();
        for cm in hierarchy.active_calculated_members() {
            with.push_member(self.with_member(cm)?);
            calculated.push(member(cm.unique_name()));
        }

        let combined = match (calculated.is_empty(), level_set) {
            (true, level_set) => level_set,
            (false, None) => Some(set(calculated)),
            (false, Some(level_set)) => Some(set(vec![set(calculated), level_set])),
        };
        let Some(mut expr) = combined else {
            debug!(hierarchy = hierarchy.unique_name(), "hierarchy selects nothing");
            return Ok(None);
        };

        if visual {
            let pattern = hierarchy
                .visual_totals_pattern()
                .or_else(|| self.query.visual_totals_pattern());
            expr = visual_totals(expr, pattern);
        }

        debug!(hierarchy = hierarchy.unique_name(), levels = level_count, "compiled hierarchy");
        self.wrap(expr, modifiers, Some(default_sort)).map(Some)
    }

    /// Compiled active levels, top-most first. On a consistent hierarchy
    /// each level is restricted to descendants of the level before it.
    fn level_sets(&self, hierarchy: &HierarchySelection) -> QueryResult<Vec<Expr>> {
        let mut sets: Vec<Expr> = Vec::new();
        let mut previous_restricts = false;

        for level in hierarchy.active_levels() {
            let mut expr = self.compile_level(hierarchy, level)?;
            if let Some(previous) = sets.last() {
                let chain = match self.query.consistency_policy() {
                    ConsistencyPolicy::Chained => true,
                    ConsistencyPolicy::RestrictedOnly => previous_restricts,
                };
                if hierarchy.is_consistent() && chain {
                    expr = exists(expr, previous.clone());
                }
            }
            previous_restricts = !level.is_simple();
            sets.push(expr);
        }
        Ok(sets)
    }
}
