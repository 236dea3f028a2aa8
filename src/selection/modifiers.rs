//! Sort, hierarchize, override and filter settings shared by axes,
//! hierarchies and levels.
//!
//! Each selection object embeds one [`SelectionModifiers`] record and
//! exposes it through the [`QuerySet`] trait, which is all the compiler
//! needs to wrap an object's expression.

use serde::{Deserialize, Serialize};

use super::filter::FilterFunction;

/// Order passed to `Order()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortOrder {
    Asc,
    Desc,
    /// Ascending, ignoring the hierarchy.
    Basc,
    /// Descending, ignoring the hierarchy.
    Bdesc,
}

impl SortOrder {
    pub fn keyword(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
            SortOrder::Basc => "BASC",
            SortOrder::Bdesc => "BDESC",
        }
    }
}

/// Whether `Hierarchize()` puts parents before (PRE) or after (POST)
/// their children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HierarchizeMode {
    #[default]
    Pre,
    Post,
}

/// A requested sort.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub order: SortOrder,
    /// Literal MDX the set is ordered by. When absent, levels and
    /// hierarchies order by the current member's name.
    pub evaluation: Option<String>,
}

/// The modifiers record embedded in every selection object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionModifiers {
    sort: Option<SortSpec>,
    hierarchize: Option<HierarchizeMode>,
    override_expression: Option<String>,
    filters: Vec<FilterFunction>,
}

impl SelectionModifiers {
    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn hierarchize_mode(&self) -> Option<HierarchizeMode> {
        self.hierarchize
    }

    pub fn override_expression(&self) -> Option<&str> {
        self.override_expression.as_deref()
    }

    pub fn filters(&self) -> &[FilterFunction] {
        &self.filters
    }

    /// Sort and hierarchize are exclusive; setting one clears the other.
    pub fn set_sort(&mut self, order: SortOrder, evaluation: Option<String>) {
        self.hierarchize = None;
        self.sort = Some(SortSpec { order, evaluation });
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
    }

    pub fn set_hierarchize_mode(&mut self, mode: HierarchizeMode) {
        self.sort = None;
        self.hierarchize = Some(mode);
    }

    pub fn clear_hierarchize_mode(&mut self) {
        self.hierarchize = None;
    }

    pub fn set_override(&mut self, mdx: String) {
        self.override_expression = Some(mdx);
    }

    pub fn clear_override(&mut self) {
        self.override_expression = None;
    }

    pub fn add_filter(&mut self, filter: FilterFunction) {
        self.filters.push(filter);
    }

    pub fn remove_filter(&mut self, index: usize) -> Option<FilterFunction> {
        (index < self.filters.len()).then(|| self.filters.remove(index))
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// True when nothing would wrap the object's expression.
    pub fn is_empty(&self) -> bool {
        self.sort.is_none()
            && self.hierarchize.is_none()
            && self.override_expression.is_none()
            && self.filters.is_empty()
    }

    /// Every literal that may carry `${name}` placeholders.
    pub(crate) fn literals(&self) -> Vec<&str> {
        let mut literals = Vec::new();
        if let Some(text) = self.override_expression.as_deref() {
            literals.push(text);
        }
        if let Some(text) = self.sort.as_ref().and_then(|s| s.evaluation.as_deref()) {
            literals.push(text);
        }
        for filter in &self.filters {
            literals.extend(filter.literals());
        }
        literals
    }
}

/// Capability shared by everything that can be sorted, hierarchized,
/// overridden and filtered.
pub trait QuerySet {
    fn modifiers(&self) -> &SelectionModifiers;

    fn modifiers_mut(&mut self) -> &mut SelectionModifiers;

    /// Order by `evaluation` (literal MDX), or by member name when `None`.
    fn sort(&mut self, order: SortOrder, evaluation: Option<&str>) {
        self.modifiers_mut()
            .set_sort(order, evaluation.map(str::to_string));
    }

    fn clear_sort(&mut self) {
        self.modifiers_mut().clear_sort();
    }

    fn set_hierarchize_mode(&mut self, mode: HierarchizeMode) {
        self.modifiers_mut().set_hierarchize_mode(mode);
    }

    fn clear_hierarchize_mode(&mut self) {
        self.modifiers_mut().clear_hierarchize_mode();
    }

    /// Replace the structural selection with literal MDX.
    fn set_override(&mut self, mdx: &str) {
        self.modifiers_mut().set_override(mdx.to_string());
    }

    fn clear_override(&mut self) {
        self.modifiers_mut().clear_override();
    }

    fn is_overridden(&self) -> bool {
        self.modifiers().override_expression().is_some()
    }

    fn add_filter(&mut self, filter: FilterFunction) {
        self.modifiers_mut().add_filter(filter);
    }

    fn clear_filters(&mut self) {
        self.modifiers_mut().clear_filters();
    }
}
