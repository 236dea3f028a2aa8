//! Filter functions that wrap a set expression.
//!
//! ```text
//! Generic   ──▶  Filter(inner, predicate)
//! NFilter   ──▶  TopCount(inner, n[, ordering])   (and the other N kinds)
//! Name      ──▶  Filter(inner, (H.CurrentMember.Name = "a") OR ...)
//! NameLike  ──▶  Filter(inner, (InStr(H.CurrentMember.Name, "a") > 0) OR ...)
//! ```

use crate::error::{QueryError, QueryResult};
use crate::mdx::{filter, func, lit_float, lit_int, lit_str, member, Expr, ExprExt};

/// The `<Kind>(set, n[, ordering])` family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NFilterKind {
    /// Plain `Filter()`; only valid for [`FilterFunction::Generic`].
    Filter,
    TopCount,
    TopPercent,
    TopSum,
    BottomCount,
    BottomPercent,
    BottomSum,
}

impl NFilterKind {
    pub fn function_name(&self) -> &'static str {
        match self {
            NFilterKind::Filter => "Filter",
            NFilterKind::TopCount => "TopCount",
            NFilterKind::TopPercent => "TopPercent",
            NFilterKind::TopSum => "TopSum",
            NFilterKind::BottomCount => "BottomCount",
            NFilterKind::BottomPercent => "BottomPercent",
            NFilterKind::BottomSum => "BottomSum",
        }
    }
}

/// A filter applied around an object's expression.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterFunction {
    /// `Filter(inner, predicate)`
    Generic { predicate: String },

    /// `<Kind>(inner, n[, ordering])`
    NFilter {
        kind: NFilterKind,
        n: f64,
        ordering: Option<String>,
    },

    /// Keep members whose name equals one of `names`.
    Name { hierarchy: String, names: Vec<String> },

    /// Keep members whose name contains one of `fragments`.
    NameLike {
        hierarchy: String,
        fragments: Vec<String>,
    },
}

impl FilterFunction {
    pub fn generic(predicate: &str) -> Self {
        FilterFunction::Generic {
            predicate: predicate.to_string(),
        }
    }

    /// Top/bottom filter. Fails for [`NFilterKind::Filter`] and for a
    /// negative or non-finite `n`.
    pub fn n_filter(kind: NFilterKind, n: impl Into<f64>, ordering: Option<&str>) -> QueryResult<Self> {
        if kind == NFilterKind::Filter {
            return Err(QueryError::InvalidArgument(
                "Cannot use Filter() as a top/bottom filter".into(),
            ));
        }
        let n = n.into();
        if !n.is_finite() || n < 0.0 {
            return Err(QueryError::InvalidArgument(format!(
                "{}() needs a non-negative count, got {n}",
                kind.function_name()
            )));
        }
        Ok(FilterFunction::NFilter {
            kind,
            n,
            ordering: ordering.map(str::to_string),
        })
    }

    /// Exact-name filter over `hierarchy` (a unique name such as `[Time]`).
    pub fn name(hierarchy: &str, names: &[&str]) -> QueryResult<Self> {
        if names.is_empty() {
            return Err(QueryError::InvalidArgument(
                "Name filter needs at least one name".into(),
            ));
        }
        Ok(FilterFunction::Name {
            hierarchy: hierarchy.to_string(),
            names: names.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Substring filter over `hierarchy`.
    pub fn name_like(hierarchy: &str, fragments: &[&str]) -> QueryResult<Self> {
        if fragments.is_empty() {
            return Err(QueryError::InvalidArgument(
                "Name-like filter needs at least one fragment".into(),
            ));
        }
        Ok(FilterFunction::NameLike {
            hierarchy: hierarchy.to_string(),
            fragments: fragments.iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Wrap `inner`. `parse` turns literal MDX (predicates, orderings) into
    /// expressions.
    pub fn apply<F>(&self, inner: Expr, parse: F) -> QueryResult<Expr>
    where
        F: Fn(&str) -> QueryResult<Expr>,
    {
        match self {
            FilterFunction::Generic { predicate } => {
                Ok(filter(inner, parse(predicate)?))
            }

            FilterFunction::NFilter { kind, n, ordering } => {
                let mut args = vec![inner, count_literal(*n)];
                if let Some(ordering) = ordering {
                    args.push(parse(ordering)?);
                }
                Ok(func(kind.function_name(), args))
            }

            FilterFunction::Name { hierarchy, names } => {
                let predicate = or_all(
                    names
                        .iter()
                        .map(|name| current_name(hierarchy).eq(lit_str(name))),
                );
                Ok(filter(inner, predicate))
            }

            FilterFunction::NameLike {
                hierarchy,
                fragments,
            } => {
                let predicate = or_all(fragments.iter().map(|fragment| {
                    func("InStr", vec![current_name(hierarchy), lit_str(fragment)]).gt(0)
                }));
                Ok(filter(inner, predicate))
            }
        }
    }

    /// Literal MDX carried by this filter.
    pub(crate) fn literals(&self) -> Vec<&str> {
        match self {
            FilterFunction::Generic { predicate } => vec![predicate.as_str()],
            FilterFunction::NFilter { ordering, .. } => ordering.as_deref().into_iter().collect(),
            FilterFunction::Name { .. } | FilterFunction::NameLike { .. } => vec![],
        }
    }
}

fn current_name(hierarchy: &str) -> Expr {
    member(hierarchy).property("CurrentMember").property("Name")
}

// Constructors reject empty lists, so there is always a first element.
fn or_all(mut predicates: impl Iterator<Item = Expr>) -> Expr {
    let first = predicates.next().unwrap_or_else(|| lit_int(1).eq(lit_int(1)));
    predicates.fold(first, |acc, p| acc.or(p))
}

fn count_literal(n: f64) -> Expr {
    if n.fract() == 0.0 && n <= i64::MAX as f64 {
        lit_int(n as i64)
    } else {
        lit_float(n)
    }
}
