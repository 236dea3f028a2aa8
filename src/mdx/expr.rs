//! Expression AST - the building blocks of compiled MDX.
//!
//! This module provides a strongly-typed AST for MDX set and value
//! expressions with exhaustive pattern matching enforced by the compiler.

use std::fmt;

use super::token::{Token, TokenStream};

// =============================================================================
// Identifiers
// =============================================================================

/// How a single identifier segment is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quoting {
    /// `[Name]`
    Quoted,
    /// `Name`
    Unquoted,
    /// `&[Key]`
    Key,
}

/// One dot-separated part of a compound identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment {
    pub name: String,
    pub quoting: Quoting,
}

impl Segment {
    pub fn quoted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoting: Quoting::Quoted,
        }
    }

    pub fn unquoted(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoting: Quoting::Unquoted,
        }
    }

    pub fn key(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quoting: Quoting::Key,
        }
    }

    fn to_token(&self) -> Token {
        match self.quoting {
            Quoting::Quoted => Token::QuotedIdent(self.name.clone()),
            Quoting::Unquoted => Token::Ident(self.name.clone()),
            Quoting::Key => Token::KeyIdent(self.name.clone()),
        }
    }
}

/// A compound identifier: `[Product].[Drink].&[12]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub segments: Vec<Segment>,
}

impl Identifier {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }

    /// A single bracket-quoted segment: `[AxisROWS]`.
    pub fn quoted(name: impl Into<String>) -> Self {
        Self::new(vec![Segment::quoted(name)])
    }

    /// Split a metadata unique name into segments.
    ///
    /// Dots inside brackets do not split, `]]` inside brackets is an
    /// escaped bracket, and `&[..]` marks a key segment. Unique names come
    /// from metadata, so an unterminated bracket is taken to run to the end
    /// of the input rather than rejected.
    pub fn from_unique_name(text: &str) -> Self {
        let mut segments = Vec::new();
        let mut chars = text.chars().peekable();

        loop {
            while chars.peek().is_some_and(|c| c.is_whitespace()) {
                chars.next();
            }
            let key = chars.peek() == Some(&'&');
            if key {
                chars.next();
            }

            let segment = if chars.peek() == Some(&'[') {
                chars.next();
                let mut name = String::new();
                while let Some(c) = chars.next() {
                    if c == ']' {
                        if chars.peek() == Some(&']') {
                            chars.next();
                            name.push(']');
                            continue;
                        }
                        break;
                    }
                    name.push(c);
                }
                if key {
                    Segment::key(name)
                } else {
                    Segment::quoted(name)
                }
            } else {
                let mut name = String::new();
                while let Some(&c) = chars.peek() {
                    if c == '.' {
                        break;
                    }
                    name.push(c);
                    chars.next();
                }
                Segment::unquoted(name.trim())
            };
            segments.push(segment);

            // Skip anything up to the next separator.
            let mut more = false;
            for c in chars.by_ref() {
                if c == '.' {
                    more = true;
                    break;
                }
            }
            if !more {
                break;
            }
        }

        Self { segments }
    }

    /// Append a bracket-quoted segment.
    #[must_use]
    pub fn child(mut self, name: impl Into<String>) -> Self {
        self.segments.push(Segment::quoted(name));
        self
    }

    /// Name of the last segment.
    pub fn last_name(&self) -> Option<&str> {
        self.segments.last().map(|s| s.name.as_str())
    }

    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                ts.push(Token::Dot);
            }
            ts.push(segment.to_token());
        }
        ts
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_tokens().serialize())
    }
}

// =============================================================================
// Expression AST
// =============================================================================

/// An MDX expression.
///
/// Every variant must be handled in `to_tokens()` - the compiler enforces this.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Compound identifier: `[Product].[Drink]`
    Identifier(Identifier),

    /// Literal values
    Literal(Literal),

    /// Function call: `Name(args...)`
    Function { name: String, args: Vec<Expr> },

    /// Property access on an expression that is not a plain identifier:
    /// `Ancestor(x, y).Name`
    Property { base: Box<Expr>, name: String },

    /// Method call: `base.Name(args...)`
    Method {
        base: Box<Expr>,
        name: String,
        args: Vec<Expr>,
    },

    /// Set literal: `{a, b}`
    Set(Vec<Expr>),

    /// Tuple: `(a, b)`
    Tuple(Vec<Expr>),

    /// Binary operation: `(left op right)`
    BinaryOp {
        left: Box<Expr>,
        op: BinaryOperator,
        right: Box<Expr>,
    },

    /// Unary operation: `op expr`
    UnaryOp { op: UnaryOperator, expr: Box<Expr> },

    /// Member range: `start : end`
    Range { start: Box<Expr>, end: Box<Expr> },
}

/// Literal values.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i64),
    Float(f64),
    String(String),
    /// Flag-like word passed to a function: `ASC`, `POST`.
    Symbol(String),
    Null,
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Comparison
    Eq,
    Ne,
    Lt,
    Gt,
    Lte,
    Gte,
    // Logical
    And,
    Or,
    Xor,
    // Arithmetic
    Plus,
    Minus,
    Mul,
    Div,
    // String
    Concat,
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Not,
    Minus,
}

impl Expr {
    /// Convert this expression to a token stream.
    pub fn to_tokens(&self) -> TokenStream {
        let mut ts = TokenStream::new();

        match self {
            Expr::Identifier(id) => {
                ts.append(&id.to_tokens());
            }

            Expr::Literal(lit) => {
                ts.push(match lit {
                    Literal::Int(n) => Token::LitInt(*n),
                    Literal::Float(f) => Token::LitFloat(*f),
                    Literal::String(s) => Token::LitString(s.clone()),
                    Literal::Symbol(s) => Token::Symbol(s.clone()),
                    Literal::Null => Token::Null,
                });
            }

            Expr::Function { name, args } => {
                ts.push(Token::FunctionName(name.clone()));
                ts.lparen();
                append_list(&mut ts, args);
                ts.rparen();
            }

            Expr::Property { base, name } => {
                ts.append(&base.to_tokens());
                ts.push(Token::Dot);
                ts.push(Token::Ident(name.clone()));
            }

            Expr::Method { base, name, args } => {
                ts.append(&base.to_tokens());
                ts.push(Token::Dot);
                ts.push(Token::FunctionName(name.clone()));
                ts.lparen();
                append_list(&mut ts, args);
                ts.rparen();
            }

            Expr::Set(items) => {
                ts.lbrace();
                append_list(&mut ts, items);
                ts.rbrace();
            }

            Expr::Tuple(items) => {
                ts.lparen();
                append_list(&mut ts, items);
                ts.rparen();
            }

            Expr::BinaryOp { left, op, right } => {
                ts.lparen();
                ts.append(&left.to_tokens());
                ts.space();
                ts.push(binary_op_to_token(*op));
                ts.space();
                ts.append(&right.to_tokens());
                ts.rparen();
            }

            Expr::UnaryOp { op, expr } => {
                match op {
                    UnaryOperator::Not => {
                        ts.push(Token::Not).space();
                    }
                    UnaryOperator::Minus => {
                        ts.push(Token::Minus);
                    }
                }
                ts.append(&expr.to_tokens());
            }

            Expr::Range { start, end } => {
                ts.append(&start.to_tokens());
                ts.space().push(Token::Colon).space();
                ts.append(&end.to_tokens());
            }
        }

        ts
    }

    /// Render this expression as MDX text.
    pub fn to_mdx(&self) -> String {
        self.to_tokens().serialize()
    }

    /// Wrap a member-shaped expression in a one-element set so it can be
    /// used where a set operand is required. Set-shaped expressions pass
    /// through unchanged.
    #[must_use]
    pub fn into_set(self) -> Expr {
        match self {
            Expr::Identifier(_) | Expr::Tuple(_) | Expr::Range { .. } | Expr::Literal(_) => {
                Expr::Set(vec![self])
            }
            other => other,
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_mdx())
    }
}

fn append_list(ts: &mut TokenStream, items: &[Expr]) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            ts.comma().space();
        }
        ts.append(&item.to_tokens());
    }
}

fn binary_op_to_token(op: BinaryOperator) -> Token {
    match op {
        BinaryOperator::Eq => Token::Eq,
        BinaryOperator::Ne => Token::Ne,
        BinaryOperator::Lt => Token::Lt,
        BinaryOperator::Gt => Token::Gt,
        BinaryOperator::Lte => Token::Lte,
        BinaryOperator::Gte => Token::Gte,
        BinaryOperator::And => Token::And,
        BinaryOperator::Or => Token::Or,
        BinaryOperator::Xor => Token::Xor,
        BinaryOperator::Plus => Token::Plus,
        BinaryOperator::Minus => Token::Minus,
        BinaryOperator::Mul => Token::Mul,
        BinaryOperator::Div => Token::Div,
        BinaryOperator::Concat => Token::Concat,
    }
}

// =============================================================================
// Expression Constructors
// =============================================================================

/// Reference a member, level, hierarchy or named set by unique name.
pub fn member(unique_name: &str) -> Expr {
    Expr::Identifier(Identifier::from_unique_name(unique_name))
}

/// Create an integer literal.
pub fn lit_int(n: i64) -> Expr {
    Expr::Literal(Literal::Int(n))
}

/// Create a float literal.
pub fn lit_float(f: f64) -> Expr {
    Expr::Literal(Literal::Float(f))
}

/// Create a string literal.
pub fn lit_str(s: &str) -> Expr {
    Expr::Literal(Literal::String(s.into()))
}

/// Create a symbol literal, written verbatim.
pub fn symbol(s: &str) -> Expr {
    Expr::Literal(Literal::Symbol(s.into()))
}

/// Generic function call.
pub fn func(name: &str, args: Vec<Expr>) -> Expr {
    Expr::Function {
        name: name.into(),
        args,
    }
}

/// Set literal: `{a, b, ...}`.
pub fn set(items: Vec<Expr>) -> Expr {
    Expr::Set(items)
}

/// Member range: `start : end`.
pub fn range(start: Expr, end: Expr) -> Expr {
    Expr::Range {
        start: Box::new(start),
        end: Box::new(end),
    }
}

/// `CrossJoin(left, right)`, promoting member operands to sets.
pub fn cross_join(left: Expr, right: Expr) -> Expr {
    func("CrossJoin", vec![left.into_set(), right.into_set()])
}

/// Right-nested cross join over a list: `CrossJoin(a, CrossJoin(b, c))`.
///
/// Returns `None` for an empty list and the single element unchanged for a
/// list of one.
pub fn cross_join_all(items: Vec<Expr>) -> Option<Expr> {
    items
        .into_iter()
        .rev()
        .reduce(|right, left| cross_join(left, right))
}

/// `Except(set, excluded)`
pub fn except(set: Expr, excluded: Expr) -> Expr {
    func("Except", vec![set, excluded])
}

/// `Exists(set, filter)`: members of `set` related to members of `filter`.
pub fn exists(set: Expr, filter: Expr) -> Expr {
    func("Exists", vec![set, filter])
}

/// `Hierarchize(set)`, or `Hierarchize(set, POST)` when `post` is set.
pub fn hierarchize(set: Expr, post: bool) -> Expr {
    let mut args = vec![set];
    if post {
        args.push(symbol("POST"));
    }
    func("Hierarchize", args)
}

/// `Order(set, by, ASC|DESC|BASC|BDESC)`
pub fn order(set: Expr, by: Expr, direction: &str) -> Expr {
    func("Order", vec![set, by, symbol(direction)])
}

/// `VisualTotals(set[, "pattern"])`
pub fn visual_totals(set: Expr, pattern: Option<&str>) -> Expr {
    let mut args = vec![set];
    if let Some(pattern) = pattern {
        args.push(lit_str(pattern));
    }
    func("VisualTotals", args)
}

/// `Filter(set, predicate)`
pub fn filter(set: Expr, predicate: Expr) -> Expr {
    func("Filter", vec![set, predicate])
}

// =============================================================================
// Expression Builder Trait
// =============================================================================

/// Extension trait for building expressions fluently.
pub trait ExprExt: Sized {
    fn into_expr(self) -> Expr;

    fn eq(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Eq, other.into())
    }

    fn gt(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Gt, other.into())
    }

    fn and(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::And, other.into())
    }

    fn or(self, other: impl Into<Expr>) -> Expr {
        binary(self.into_expr(), BinaryOperator::Or, other.into())
    }

    /// Property access. On an identifier this extends the identifier, so
    /// `[Time].CurrentMember` stays a single compound name.
    fn property(self, name: &str) -> Expr {
        match self.into_expr() {
            Expr::Identifier(mut id) => {
                id.segments.push(Segment::unquoted(name));
                Expr::Identifier(id)
            }
            base => Expr::Property {
                base: Box::new(base),
                name: name.into(),
            },
        }
    }

    fn method(self, name: &str, args: Vec<Expr>) -> Expr {
        Expr::Method {
            base: Box::new(self.into_expr()),
            name: name.into(),
            args,
        }
    }
}

impl ExprExt for Expr {
    fn into_expr(self) -> Expr {
        self
    }
}

fn binary(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
    Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    }
}

// =============================================================================
// Conversions
// =============================================================================

impl From<i64> for Expr {
    fn from(n: i64) -> Self {
        lit_int(n)
    }
}

impl From<i32> for Expr {
    fn from(n: i32) -> Self {
        lit_int(n as i64)
    }
}

impl From<f64> for Expr {
    fn from(f: f64) -> Self {
        lit_float(f)
    }
}

impl From<&str> for Expr {
    fn from(s: &str) -> Self {
        lit_str(s)
    }
}

impl From<Identifier> for Expr {
    fn from(id: Identifier) -> Self {
        Expr::Identifier(id)
    }
}
