//! Parameter binding and substitution at compile time.

#[path = "../common/mod.rs"]
mod common;

use common::{compiled_axis, query_with};
use insta::assert_snapshot;
use olapq::error::ObjectKind;
use olapq::selection::{AxisLocation, FilterFunction, ParameterMode, QuerySet};
use olapq::QueryError;

#[test]
fn test_override_parameter_round_trip() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query
        .bind_level_parameter("Product", "Product Family", "family", ParameterMode::Override)
        .unwrap();
    let unbound = query.compile().unwrap();
    assert_eq!(
        common::axis_set(&unbound, "ROWS"),
        "{[Product].[Product Family].Members}"
    );

    query.set_parameter("family", Some("[Product].[Drink].Children"));
    assert_snapshot!(compiled_axis(&query, "ROWS"), @"{[Product].[Drink].Children}");

    query.set_parameter("family", None);
    assert_eq!(query.compile().unwrap(), unbound);
}

#[test]
fn test_inclusion_parameter() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query
        .bind_level_parameter("Product", "Product Family", "family", ParameterMode::Inclusion)
        .unwrap();
    query.set_parameter("family", Some("[Product].[Drink], [Product].[Food]"));

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"{[Product].[Drink], [Product].[Food]}"
    );
}

#[test]
fn test_inclusion_parameter_replaces_static_inclusions() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_member("Product", "[Product].[Non-Consumable]").unwrap();
    query
        .bind_level_parameter("Product", "Product Family", "family", ParameterMode::Inclusion)
        .unwrap();
    query.set_parameter("family", Some("[Product].[Drink]"));

    assert_snapshot!(compiled_axis(&query, "ROWS"), @"{[Product].[Drink]}");
}

#[test]
fn test_inclusion_parameter_keeps_exclusions() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.exclude_member("Product", "[Product].[Food]").unwrap();
    query
        .bind_level_parameter("Product", "Product Family", "family", ParameterMode::Inclusion)
        .unwrap();
    query.set_parameter("family", Some("[Product].[Drink],[Product].[Food]"));

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Except({[Product].[Drink], [Product].[Food]}, {[Product].[Food]})"
    );
}

#[test]
fn test_inclusion_parameter_skips_other_hierarchies() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query
        .bind_level_parameter("Product", "Product Family", "family", ParameterMode::Inclusion)
        .unwrap();
    query.set_parameter("family", Some("[Gender].[F], [Product].[Food]"));

    assert_snapshot!(compiled_axis(&query, "ROWS"), @"{[Product].[Food]}");
}

#[test]
fn test_inclusion_parameter_selecting_nothing_falls_back() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_member("Product", "[Product].[Drink]").unwrap();
    query
        .bind_level_parameter("Product", "Product Family", "family", ParameterMode::Inclusion)
        .unwrap();
    assert_snapshot!(compiled_axis(&query, "ROWS"), @"{[Product].[Drink]}");

    query.set_parameter("family", Some(""));
    assert_snapshot!(compiled_axis(&query, "ROWS"), @"{[Product].[Drink]}");

    query.set_parameter("family", Some("[Gender].[F]"));
    assert_snapshot!(compiled_axis(&query, "ROWS"), @"{[Product].[Drink]}");
}

#[test]
fn test_inclusion_parameter_with_unknown_member() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query
        .bind_level_parameter("Product", "Product Family", "family", ParameterMode::Inclusion)
        .unwrap();
    query.set_parameter("family", Some("[Product].[Snacks]"));

    assert!(matches!(
        query.compile().unwrap_err(),
        QueryError::NotFound {
            kind: ObjectKind::Member,
            ..
        }
    ));
}

#[test]
fn test_placeholder_in_override() {
    let mut query = query_with("Time", AxisLocation::Columns);
    query.include_level("Time", "Year").unwrap();
    query
        .hierarchy_mut("Time")
        .unwrap()
        .set_override("{${year}.Children}");

    // Unbound: the structural selection stands.
    assert_snapshot!(compiled_axis(&query, "COLUMNS"), @"{[Time].[Year].Members}");

    query.set_parameter("year", Some("[Time].[1997]"));
    assert_snapshot!(compiled_axis(&query, "COLUMNS"), @"{[Time].[1997].Children}");
}

#[test]
fn test_unbound_placeholder_in_filter_fails() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_level("Product", "Product Family").unwrap();
    query
        .hierarchy_mut("Product")
        .unwrap()
        .add_filter(FilterFunction::generic("[Measures].[Unit Sales] > ${min}"));

    let err = query.compile().unwrap_err();
    assert!(matches!(&err, QueryError::UnresolvedParameter(name) if name == "min"), "{err}");

    query.set_parameter("min", Some("500"));
    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Filter({[Product].[Product Family].Members}, ([Measures].[Unit Sales] > 500))"
    );
}

#[test]
fn test_placeholder_in_calculated_measure() {
    let mut query = query_with("Gender", AxisLocation::Rows);
    query.include_level("Gender", "Gender").unwrap();
    query
        .create_calculated_measure("Target", "[Measures].[Unit Sales] * ${factor}", None)
        .unwrap();
    query.add_measure("Target").unwrap();

    assert!(query.required_parameters().contains("factor"));
    assert!(matches!(
        query.compile().unwrap_err(),
        QueryError::UnresolvedParameter(_)
    ));

    query.set_parameter("factor", Some("1.1"));
    let mdx = query.to_mdx().unwrap();
    assert!(mdx.contains("([Measures].[Unit Sales] * 1.1)"), "{mdx}");
}
