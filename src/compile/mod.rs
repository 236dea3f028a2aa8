//! Compilation from a [`Query`] selection to an MDX [`SelectStatement`].
//!
//! The compiler is a single read-only walk over the selection model:
//!
//! ```text
//! LevelSelection      → level set       (members / range / inclusions, Except)
//!        ↓
//! HierarchySelection  → hierarchy set   (Exists chain, union, Hierarchize,
//!        ↓                               calculated members, VisualTotals)
//! AxisSelection       → axis set        (CrossJoin, hoisted as WITH SET,
//!        ↓                               crossed with the measures)
//! Query               → SelectStatement (FILTER axis becomes WHERE)
//! ```
//!
//! At every level of the walk the object's [`SelectionModifiers`] are applied
//! in the same order: override, then filters, then sort or hierarchize.
//!
//! # Example
//!
//! ```ignore
//! use olapq::prelude::*;
//!
//! let mut query = Query::new("sales", cube)?;
//! query.move_hierarchy("Product", AxisLocation::Rows, None)?;
//! query.include_member("Product", "[Product].[Drink]")?;
//! query.add_measure("Unit Sales")?;
//!
//! let statement = Compiler::new(&query).compile()?;
//! println!("{}", statement.to_mdx());
//! ```

mod axis;
mod hierarchy;
mod level;

use tracing::{debug, trace};

use crate::error::{QueryError, QueryResult};
use crate::mdx::{
    hierarchize, member, order, set, AxisClause, Expr, ExprExt, ExpressionParser, Identifier,
    MdxParser, SelectStatement, WithDefinition, WithMember, WithSet,
};
use crate::params::{self, Resolution};
use crate::selection::{AxisLocation, CalculatedMember, HierarchizeMode, Query, SelectionModifiers};

/// Compile a query with the built-in MDX parser.
pub fn compile(query: &Query) -> QueryResult<SelectStatement> {
    Compiler::new(query).compile()
}

/// Turns a query into a statement.
///
/// Holds no state between calls; definitions collected during one
/// [`compile`](Compiler::compile) are local to it.
pub struct Compiler<'q> {
    query: &'q Query,
    parser: &'q dyn ExpressionParser,
}

impl<'q> Compiler<'q> {
    pub fn new(query: &'q Query) -> Self {
        Self {
            query,
            parser: &MdxParser,
        }
    }

    /// Use another parser for literal MDX fragments.
    pub fn with_parser(mut self, parser: &'q dyn ExpressionParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn compile(&self) -> QueryResult<SelectStatement> {
        debug!(query = self.query.name(), "compiling query");
        let mut with = WithList::default();

        let slicer = self.compile_axis(AxisLocation::Filter, &mut with)?;

        let mut clauses = Vec::new();
        for location in [AxisLocation::Columns, AxisLocation::Rows, AxisLocation::Pages] {
            let (Some(axis), Some(statement_axis)) =
                (self.query.axis(location), location.statement_axis())
            else {
                continue;
            };
            if let Some(expr) = self.compile_axis(location, &mut with)? {
                clauses.push(AxisClause::new(statement_axis, expr).non_empty(axis.is_non_empty()));
            }
        }

        let mut statement = SelectStatement::new(self.query.cube().cube_name());
        statement.with = with.into_definitions();
        statement.axes = clauses;
        statement.slicer = slicer;
        debug!(
            definitions = statement.with.len(),
            axes = statement.axes.len(),
            "compiled query"
        );
        Ok(statement)
    }

    // =========================================================================
    // Literal MDX
    // =========================================================================

    /// Substitute parameters into `text` and parse it. Any unbound
    /// placeholder is an error.
    fn parse(&self, text: &str) -> QueryResult<Expr> {
        match params::resolve(text, self.query.parameters()) {
            Resolution::Complete(resolved) => Ok(self.parser.parse_expression(&resolved)?),
            Resolution::Unbound(names) => Err(QueryError::UnresolvedParameter(names.join(", "))),
        }
    }

    /// The object's override as a set, or `None` when there is none or it
    /// refers to an unbound parameter.
    fn override_of(&self, modifiers: &SelectionModifiers) -> QueryResult<Option<Expr>> {
        let Some(text) = modifiers.override_expression() else {
            return Ok(None);
        };
        match params::resolve(text, self.query.parameters()) {
            Resolution::Complete(resolved) => {
                let expr = self.parser.parse_expression(&resolved)?;
                Ok(Some(as_set(expr)))
            }
            Resolution::Unbound(names) => {
                trace!(parameters = ?names, "override has unbound parameters, using structural selection");
                Ok(None)
            }
        }
    }

    /// Apply filters, then sort or hierarchize. `default_sort` is what a
    /// sort without an evaluation literal orders by.
    fn wrap(
        &self,
        mut expr: Expr,
        modifiers: &SelectionModifiers,
        default_sort: Option<Expr>,
    ) -> QueryResult<Expr> {
        for filter in modifiers.filters() {
            expr = filter.apply(expr, |text| self.parse(text))?;
        }

        if let Some(sort) = modifiers.sort() {
            let by = match &sort.evaluation {
                Some(literal) => self.parse(literal)?,
                None => default_sort.ok_or_else(|| {
                    QueryError::InvalidState("Sorting an axis needs an evaluation literal".into())
                })?,
            };
            expr = order(expr, by, sort.order.keyword());
        } else if let Some(mode) = modifiers.hierarchize_mode() {
            expr = hierarchize(expr, mode == HierarchizeMode::Post);
        }
        Ok(expr)
    }

    fn with_member(&self, cm: &CalculatedMember) -> QueryResult<WithMember> {
        let properties = cm
            .properties()
            .iter()
            .map(|(name, value)| Ok((name.clone(), self.parse(value)?)))
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(WithMember {
            name: Identifier::from_unique_name(cm.unique_name()),
            formula: self.parse(cm.formula())?,
            properties,
        })
    }
}

/// `<hierarchy>.CurrentMember.Name`
fn current_member_name(hierarchy: &str) -> Expr {
    member(hierarchy).property("CurrentMember").property("Name")
}

fn as_set(expr: Expr) -> Expr {
    match expr {
        Expr::Set(_) => expr,
        other => set(vec![other]),
    }
}

/// WITH definitions collected during one compile, in emission order.
#[derive(Debug, Default)]
struct WithList {
    definitions: Vec<WithDefinition>,
}

impl WithList {
    /// Members already declared under the same name are skipped.
    fn push_member(&mut self, member: WithMember) {
        if self.contains(&member.name.to_string()) {
            return;
        }
        debug!(member = %member.name, "declared calculated member");
        self.definitions.push(WithDefinition::Member(member));
    }

    fn push_set(&mut self, set: WithSet) {
        debug!(set = %set.name, "declared named set");
        self.definitions.push(WithDefinition::Set(set));
    }

    fn contains(&self, name: &str) -> bool {
        self.definitions
            .iter()
            .any(|d| d.name().to_string() == name)
    }

    fn into_definitions(self) -> Vec<WithDefinition> {
        self.definitions
    }
}
