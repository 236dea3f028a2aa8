//! Parser for literal MDX fragments using chumsky.
//!
//! Callers hand the query model raw MDX text in a handful of places:
//! override expressions, filter predicates, sort evaluation literals,
//! range boundaries and calculated-member formulas. This module turns that
//! text into [`Expr`] trees so the compiler can compose them.
//!
//! The grammar is parsed directly from characters (no separate lexer):
//!
//! ```text
//! or        := and (("OR" | "XOR") and)*
//! and       := not ("AND" not)*
//! not       := "NOT"* compare
//! compare   := sum (("=" | "<>" | "<" | ">" | "<=" | ">=") sum)*
//! sum       := product (("+" | "-" | "||") product)*
//! product   := unary (("*" | "/") unary)*
//! unary     := "-"* range
//! range     := postfix (":" postfix)?
//! postfix   := atom ("." segment ("(" args ")")?)*
//! atom      := number | string | NULL | "{" args "}" | "(" args ")"
//!            | name "(" args ")" | segment
//! ```

use std::ops::Range;

use chumsky::prelude::*;

use super::expr::{BinaryOperator, Expr, Identifier, Literal, Segment, UnaryOperator};

type Extra<'src> = extra::Err<Rich<'src, char>>;

const KEYWORDS: &[&str] = &["AND", "OR", "XOR", "NOT", "NULL"];

// =============================================================================
// Public API
// =============================================================================

/// Error raised when a literal fragment is not valid MDX.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to parse MDX expression '{text}' at {}..{}: {message}", span.start, span.end)]
pub struct ParseError {
    /// The text that was being parsed.
    pub text: String,
    pub message: String,
    /// Byte offsets of the offending input.
    pub span: Range<usize>,
}

impl ParseError {
    fn from_rich(text: &str, errors: Vec<Rich<'_, char>>) -> Self {
        use chumsky::span::Span as _;

        match errors.into_iter().next() {
            Some(e) => {
                let span = e.span();
                Self {
                    text: text.to_string(),
                    message: e.to_string(),
                    span: span.start()..span.end(),
                }
            }
            None => Self {
                text: text.to_string(),
                message: "unknown parse failure".to_string(),
                span: 0..text.len(),
            },
        }
    }
}

/// Turns literal MDX text into an expression tree.
///
/// The compiler only ever calls this trait, so a caller with its own MDX
/// front end can plug it in through
/// [`Compiler::with_parser`](crate::compile::Compiler::with_parser).
pub trait ExpressionParser: Send + Sync {
    fn parse_expression(&self, text: &str) -> Result<Expr, ParseError>;
}

/// The built-in MDX fragment parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct MdxParser;

impl ExpressionParser for MdxParser {
    fn parse_expression(&self, text: &str) -> Result<Expr, ParseError> {
        expression()
            .padded()
            .then_ignore(end())
            .parse(text)
            .into_result()
            .map_err(|errs| ParseError::from_rich(text, errs))
    }
}

/// Parse a lone compound identifier such as `[Time].[1997].&[Q1]`.
pub fn parse_identifier(text: &str) -> Result<Identifier, ParseError> {
    segment()
        .separated_by(just('.'))
        .at_least(1)
        .collect::<Vec<_>>()
        .padded()
        .then_ignore(end())
        .parse(text)
        .into_result()
        .map(Identifier::new)
        .map_err(|errs| ParseError::from_rich(text, errs))
}

// =============================================================================
// Grammar
// =============================================================================

/// `[Name]` with `]]` as an escaped bracket.
fn bracketed<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    choice((just("]]").to(']'), none_of(']')))
        .repeated()
        .collect::<String>()
        .delimited_by(just('['), just(']'))
}

/// A bare name that is not a reserved word.
fn name<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    text::ident().try_map(|s: &str, span| {
        if is_keyword(s) {
            Err(Rich::custom(span, format!("unexpected keyword '{s}'")))
        } else {
            Ok(s.to_string())
        }
    })
}

/// A case-insensitive reserved word.
fn keyword<'src>(word: &'static str) -> impl Parser<'src, &'src str, (), Extra<'src>> + Clone {
    text::ident()
        .filter(move |s: &&str| s.eq_ignore_ascii_case(word))
        .ignored()
        .padded()
        .labelled(word)
}

fn segment<'src>() -> impl Parser<'src, &'src str, Segment, Extra<'src>> + Clone {
    choice((
        just('&')
            .ignore_then(bracketed())
            .map(|s: String| Segment::key(s)),
        bracketed().map(|s: String| Segment::quoted(s)),
        name().map(|s: String| Segment::unquoted(s)),
    ))
}

fn string_literal<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    let double = choice((just("\"\"").to('"'), none_of('"')))
        .repeated()
        .collect::<String>()
        .delimited_by(just('"'), just('"'));
    let single = choice((just("''").to('\''), none_of('\'')))
        .repeated()
        .collect::<String>()
        .delimited_by(just('\''), just('\''));
    choice((double, single))
}

fn expression<'src>() -> impl Parser<'src, &'src str, Expr, Extra<'src>> + Clone {
    recursive(|expr| {
        let list = expr
            .clone()
            .separated_by(just(',').padded())
            .collect::<Vec<_>>();
        let call_args = list
            .clone()
            .delimited_by(just('(').padded(), just(')').padded());

        let number = text::digits(10)
            .then(just('.').then(text::digits(10)).or_not())
            .to_slice()
            .try_map(|s: &str, span| {
                parse_number(s).ok_or_else(|| Rich::custom(span, format!("invalid number '{s}'")))
            });

        let string = string_literal().map(|s| Expr::Literal(Literal::String(s)));

        let null = keyword("NULL").to(Expr::Literal(Literal::Null));

        let set = list
            .clone()
            .delimited_by(just('{').padded(), just('}').padded())
            .map(Expr::Set);

        // A single parenthesised expression is just grouping.
        let parens = list
            .clone()
            .delimited_by(just('(').padded(), just(')').padded())
            .try_map(|mut items: Vec<Expr>, span| match items.len() {
                0 => Err(Rich::custom(span, "empty parentheses")),
                1 => Ok(items.remove(0)),
                _ => Ok(Expr::Tuple(items)),
            });

        let call = name()
            .then(call_args.clone())
            .map(|(name, args)| Expr::Function { name, args });

        let ident = segment().map(|s| Expr::Identifier(Identifier::new(vec![s])));

        let atom = choice((number, string, null, set, parens, call, ident))
            .padded()
            .boxed();

        let postfix = atom
            .then(
                just('.')
                    .ignore_then(segment())
                    .then(call_args.or_not())
                    .padded()
                    .repeated()
                    .collect::<Vec<_>>(),
            )
            .map(|(base, parts)| parts.into_iter().fold(base, apply_postfix));

        let range = postfix
            .clone()
            .then(just(':').padded().ignore_then(postfix).or_not())
            .map(|(start, end)| match end {
                Some(end) => Expr::Range {
                    start: Box::new(start),
                    end: Box::new(end),
                },
                None => start,
            });

        let unary = just('-')
            .padded()
            .repeated()
            .collect::<Vec<_>>()
            .then(range)
            .map(|(signs, expr)| {
                signs.iter().fold(expr, |expr, _| Expr::UnaryOp {
                    op: UnaryOperator::Minus,
                    expr: Box::new(expr),
                })
            })
            .boxed();

        let product = unary
            .clone()
            .then(
                choice((
                    just('*').to(BinaryOperator::Mul),
                    just('/').to(BinaryOperator::Div),
                ))
                .padded()
                .then(unary)
                .repeated()
                .collect::<Vec<_>>(),
            )
            .map(|(first, rest)| fold_binary(first, rest));

        let sum = product
            .clone()
            .then(
                choice((
                    just("||").to(BinaryOperator::Concat),
                    just('+').to(BinaryOperator::Plus),
                    just('-').to(BinaryOperator::Minus),
                ))
                .padded()
                .then(product)
                .repeated()
                .collect::<Vec<_>>(),
            )
            .map(|(first, rest)| fold_binary(first, rest))
            .boxed();

        let compare = sum
            .clone()
            .then(
                choice((
                    just("<>").to(BinaryOperator::Ne),
                    just("<=").to(BinaryOperator::Lte),
                    just(">=").to(BinaryOperator::Gte),
                    just('=').to(BinaryOperator::Eq),
                    just('<').to(BinaryOperator::Lt),
                    just('>').to(BinaryOperator::Gt),
                ))
                .padded()
                .then(sum)
                .repeated()
                .collect::<Vec<_>>(),
            )
            .map(|(first, rest)| fold_binary(first, rest));

        let not = keyword("NOT")
            .repeated()
            .collect::<Vec<_>>()
            .then(compare)
            .map(|(nots, expr)| {
                nots.iter().fold(expr, |expr, _| Expr::UnaryOp {
                    op: UnaryOperator::Not,
                    expr: Box::new(expr),
                })
            })
            .boxed();

        let and = not
            .clone()
            .then(
                keyword("AND")
                    .to(BinaryOperator::And)
                    .then(not)
                    .repeated()
                    .collect::<Vec<_>>(),
            )
            .map(|(first, rest)| fold_binary(first, rest));

        and.clone()
            .then(
                choice((
                    keyword("OR").to(BinaryOperator::Or),
                    keyword("XOR").to(BinaryOperator::Xor),
                ))
                .then(and)
                .repeated()
                .collect::<Vec<_>>(),
            )
            .map(|(first, rest)| fold_binary(first, rest))
    })
}

fn is_keyword(s: &str) -> bool {
    KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(s))
}

fn parse_number(s: &str) -> Option<Expr> {
    if s.contains('.') {
        s.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(|f| Expr::Literal(Literal::Float(f)))
    } else {
        s.parse::<i64>().ok().map(|n| Expr::Literal(Literal::Int(n)))
    }
}

fn apply_postfix(base: Expr, (segment, args): (Segment, Option<Vec<Expr>>)) -> Expr {
    match (base, args) {
        (base, Some(args)) => Expr::Method {
            base: Box::new(base),
            name: segment.name,
            args,
        },
        (Expr::Identifier(mut id), None) => {
            id.segments.push(segment);
            Expr::Identifier(id)
        }
        (base, None) => Expr::Property {
            base: Box::new(base),
            name: segment.name,
        },
    }
}

fn fold_binary(first: Expr, rest: Vec<(BinaryOperator, Expr)>) -> Expr {
    rest.into_iter().fold(first, |left, (op, right)| Expr::BinaryOp {
        left: Box::new(left),
        op,
        right: Box::new(right),
    })
}
