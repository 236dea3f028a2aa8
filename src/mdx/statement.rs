//! SELECT statement - the compiled form of a query.
//!
//! ```text
//! WITH
//! MEMBER [Product].[Consumable] AS
//!     Aggregate({Product.Drink, Product.Food})
//! SET [AxisCOLUMNS] AS
//!     {[Product].[Consumable]}
//! SELECT
//! NON EMPTY [AxisCOLUMNS] ON COLUMNS
//! FROM [Sales]
//! WHERE [AxisFILTER]
//! ```

use std::fmt;

use super::expr::{Expr, Identifier};
use super::token::{Token, TokenStream};

// =============================================================================
// WITH definitions
// =============================================================================

/// A named definition in the WITH block.
#[derive(Debug, Clone, PartialEq)]
pub enum WithDefinition {
    /// `MEMBER name AS formula[, PROP = value ...]`
    Member(WithMember),
    /// `SET name AS expr`
    Set(WithSet),
}

impl WithDefinition {
    pub fn name(&self) -> &Identifier {
        match self {
            WithDefinition::Member(m) => &m.name,
            WithDefinition::Set(s) => &s.name,
        }
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        match self {
            WithDefinition::Member(m) => {
                ts.push(Token::Member).space();
                ts.append(&m.name.to_tokens());
                ts.space().push(Token::As).newline().indent(1);
                ts.append(&m.formula.to_tokens());
                for (name, value) in &m.properties {
                    ts.comma().space();
                    ts.push(Token::Ident(name.clone()));
                    ts.space().push(Token::Eq).space();
                    ts.append(&value.to_tokens());
                }
            }
            WithDefinition::Set(s) => {
                ts.push(Token::Set).space();
                ts.append(&s.name.to_tokens());
                ts.space().push(Token::As).newline().indent(1);
                ts.append(&s.expr.to_tokens());
            }
        }
        ts
    }
}

/// A calculated member defined for the lifetime of one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WithMember {
    pub name: Identifier,
    pub formula: Expr,
    pub properties: Vec<(String, Expr)>,
}

/// A named set defined for the lifetime of one statement.
#[derive(Debug, Clone, PartialEq)]
pub struct WithSet {
    pub name: Identifier,
    pub expr: Expr,
}

// =============================================================================
// Axes
// =============================================================================

/// Positional axis of a SELECT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    Columns,
    Rows,
    Pages,
}

impl Axis {
    pub fn keyword(&self) -> &'static str {
        match self {
            Axis::Columns => "COLUMNS",
            Axis::Rows => "ROWS",
            Axis::Pages => "PAGES",
        }
    }
}

/// One `expr ON AXIS` clause.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisClause {
    pub axis: Axis,
    pub non_empty: bool,
    pub expr: Expr,
}

impl AxisClause {
    pub fn new(axis: Axis, expr: Expr) -> Self {
        Self {
            axis,
            non_empty: false,
            expr,
        }
    }

    #[must_use]
    pub fn non_empty(mut self, non_empty: bool) -> Self {
        self.non_empty = non_empty;
        self
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        if self.non_empty {
            ts.push(Token::NonEmpty).space();
        }
        ts.append(&self.expr.to_tokens());
        ts.space()
            .push(Token::On)
            .space()
            .push(Token::AxisName(self.axis.keyword()));
        ts
    }
}

// =============================================================================
// Statement
// =============================================================================

/// A complete MDX SELECT statement.
#[derive(Debug, Clone, PartialEq)]
#[must_use = "builders have no effect until used"]
pub struct SelectStatement {
    /// Named definitions, in declaration order.
    pub with: Vec<WithDefinition>,
    pub axes: Vec<AxisClause>,
    pub cube: Identifier,
    /// The WHERE clause.
    pub slicer: Option<Expr>,
}

impl SelectStatement {
    pub fn new(cube: &str) -> Self {
        Self {
            with: vec![],
            axes: vec![],
            cube: Identifier::quoted(cube),
            slicer: None,
        }
    }

    pub fn with_definition(mut self, definition: WithDefinition) -> Self {
        self.with.push(definition);
        self
    }

    pub fn axis(mut self, clause: AxisClause) -> Self {
        self.axes.push(clause);
        self
    }

    pub fn slicer(mut self, expr: Expr) -> Self {
        self.slicer = Some(expr);
        self
    }

    /// Look up the clause for a positional axis.
    pub fn axis_clause(&self, axis: Axis) -> Option<&AxisClause> {
        self.axes.iter().find(|c| c.axis == axis)
    }

    /// Look up a named definition by its rendered name, e.g. `[AxisROWS]`.
    pub fn definition(&self, name: &str) -> Option<&WithDefinition> {
        self.with.iter().find(|d| d.name().to_string() == name)
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        if !self.with.is_empty() {
            ts.push(Token::With).newline();
            for definition in &self.with {
                ts.append(&definition.to_tokens());
                ts.newline();
            }
        }

        ts.push(Token::Select).newline();
        for (i, clause) in self.axes.iter().enumerate() {
            if i > 0 {
                ts.comma().newline();
            }
            ts.append(&clause.to_tokens());
        }
        if !self.axes.is_empty() {
            ts.newline();
        }

        ts.push(Token::From).space();
        ts.append(&self.cube.to_tokens());

        if let Some(slicer) = &self.slicer {
            ts.newline().push(Token::Where).space();
            ts.append(&slicer.to_tokens());
        }

        ts
    }

    /// Render the statement as MDX text.
    pub fn to_mdx(&self) -> String {
        self.to_tokens().serialize()
    }
}

impl fmt::Display for SelectStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_mdx())
    }
}
