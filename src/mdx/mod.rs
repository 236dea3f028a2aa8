//! MDX output: expression AST, tokens, statements and the fragment parser.
//!
//! Everything the compiler produces is built from these types:
//!
//! ```text
//!   Expr / SelectStatement  ──to_tokens()──▶  TokenStream  ──serialize()──▶  MDX text
//!            ▲
//!            │ parse_expression()
//!   literal MDX fragments (overrides, filters, formulas)
//! ```

pub mod expr;
pub mod parser;
pub mod statement;
pub mod token;

pub use expr::{
    cross_join, cross_join_all, except, exists, filter, func, hierarchize, lit_float, lit_int,
    lit_str, member, order, range, set, symbol, visual_totals, BinaryOperator, Expr, ExprExt,
    Identifier, Literal, Quoting, Segment, UnaryOperator,
};
pub use parser::{parse_identifier, ExpressionParser, MdxParser, ParseError};
pub use statement::{Axis, AxisClause, SelectStatement, WithDefinition, WithMember, WithSet};
pub use token::{quote_name, Token, TokenStream};
