//! Parameter placeholders in literal MDX.
//!
//! Literal fragments may reference named parameters as `${name}`. Values
//! are bound on the query and substituted when the query is compiled, so
//! rebinding a parameter never requires touching the selection itself.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

/// Pattern for `${name}` placeholders.
static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]*)\}").unwrap());

/// Outcome of substituting parameter values into a literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Every placeholder had a value.
    Complete(String),
    /// These placeholders had no value; nothing was substituted.
    Unbound(Vec<String>),
}

/// Names of the placeholders in `text`, in order of first appearance.
pub fn placeholders(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(text) {
        let name = caps[1].trim();
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Substitute bound values into `text`.
pub fn resolve(text: &str, bindings: &BTreeMap<String, String>) -> Resolution {
    let missing: Vec<String> = placeholders(text)
        .into_iter()
        .filter(|name| !bindings.contains_key(name))
        .collect();
    if !missing.is_empty() {
        return Resolution::Unbound(missing);
    }

    let resolved = PLACEHOLDER.replace_all(text, |caps: &regex::Captures<'_>| {
        bindings
            .get(caps[1].trim())
            .cloned()
            .unwrap_or_default()
    });
    Resolution::Complete(resolved.into_owned())
}

/// Split a parameter value holding several member unique names.
///
/// Commas inside brackets belong to the name: `[Store].[Seattle, WA]`.
pub fn split_member_list(value: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut current = String::new();
    let mut in_brackets = false;

    for c in value.chars() {
        match c {
            '[' => {
                in_brackets = true;
                current.push(c);
            }
            ']' => {
                in_brackets = false;
                current.push(c);
            }
            ',' if !in_brackets => {
                if !current.trim().is_empty() {
                    names.push(current.trim().to_string());
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        names.push(current.trim().to_string());
    }
    names
}
