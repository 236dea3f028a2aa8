//! Hierarchy sets: level chaining, hierarchize, calculated members and
//! visual totals.

#[path = "../common/mod.rs"]
mod common;

use common::{compiled_axis, query_with};
use insta::assert_snapshot;
use olapq::mdx::WithDefinition;
use olapq::selection::{AxisLocation, ConsistencyPolicy, HierarchizeMode, QuerySet, SortOrder};

#[test]
fn test_two_consistent_levels() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_level("Product", "Product Family").unwrap();
    query.include_level("Product", "Product Department").unwrap();

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Hierarchize({{[Product].[Product Family].Members}, Exists({[Product].[Product Department].Members}, {[Product].[Product Family].Members})})"
    );
}

#[test]
fn test_three_levels_chain_on_previous_result() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_member("Product", "[Product].[Drink]").unwrap();
    query.include_level("Product", "Product Department").unwrap();
    query.include_level("Product", "Product Category").unwrap();

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Hierarchize({{[Product].[Drink]}, Exists({[Product].[Product Department].Members}, {[Product].[Drink]}), Exists({[Product].[Product Category].Members}, Exists({[Product].[Product Department].Members}, {[Product].[Drink]}))})"
    );
}

#[test]
fn test_inconsistent_hierarchy_does_not_chain() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_level("Product", "Product Family").unwrap();
    query.include_level("Product", "Product Department").unwrap();
    query.hierarchy_mut("Product").unwrap().set_consistent(false);

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Hierarchize({{[Product].[Product Family].Members}, {[Product].[Product Department].Members}})"
    );
}

#[test]
fn test_restricted_only_skips_simple_parent() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.set_consistency_policy(ConsistencyPolicy::RestrictedOnly);
    query.include_level("Product", "Product Family").unwrap();
    query.include_level("Product", "Product Department").unwrap();

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Hierarchize({{[Product].[Product Family].Members}, {[Product].[Product Department].Members}})"
    );

    query.include_member("Product", "[Product].[Drink]").unwrap();
    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Hierarchize({{[Product].[Drink]}, Exists({[Product].[Product Department].Members}, {[Product].[Drink]})})"
    );
}

#[test]
fn test_lowest_levels_only() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.set_lowest_levels_only(true);
    query.include_member("Product", "[Product].[Drink]").unwrap();
    query.include_level("Product", "Product Department").unwrap();

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Exists({[Product].[Product Department].Members}, {[Product].[Drink]})"
    );
}

#[test]
fn test_default_hierarchize_mode_post() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.set_default_hierarchize_mode(HierarchizeMode::Post);
    query.include_level("Product", "Product Family").unwrap();
    query.include_level("Product", "Product Department").unwrap();
    query.hierarchy_mut("Product").unwrap().set_consistent(false);

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Hierarchize({{[Product].[Product Family].Members}, {[Product].[Product Department].Members}}, POST)"
    );
}

#[test]
fn test_hierarchy_sort_replaces_default_hierarchize() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_level("Product", "Product Family").unwrap();
    query.include_level("Product", "Product Department").unwrap();
    let product = query.hierarchy_mut("Product").unwrap();
    product.set_consistent(false);
    product.sort(SortOrder::Asc, None);

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Order({{[Product].[Product Family].Members}, {[Product].[Product Department].Members}}, [Product].CurrentMember.Name, ASC)"
    );
}

#[test]
fn test_hierarchy_override() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_level("Product", "Product Family").unwrap();
    query
        .hierarchy_mut("Product")
        .unwrap()
        .set_override("{[Product].[Drink], [Product].[Food]}");

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"{[Product].[Drink], [Product].[Food]}"
    );
}

#[test]
fn test_calculated_member_with_levels() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_level("Product", "Product Family").unwrap();
    let cm = query
        .create_calculated_member(
            "Product",
            "Consumable",
            "Aggregate({[Product].[Drink], [Product].[Food]})",
            None,
        )
        .unwrap();
    query.include_calculated_member("Product", cm).unwrap();

    let statement = query.compile().unwrap();
    assert_snapshot!(
        common::axis_set(&statement, "ROWS"),
        @"{{[Product].[Consumable]}, {[Product].[Product Family].Members}}"
    );
    match statement.definition("[Product].[Consumable]") {
        Some(WithDefinition::Member(m)) => assert_snapshot!(
            m.formula.to_mdx(),
            @"Aggregate({[Product].[Drink], [Product].[Food]})"
        ),
        other => panic!("expected calculated member, got {other:?}"),
    }
}

#[test]
fn test_calculated_member_alone() {
    let mut query = query_with("Product", AxisLocation::Rows);
    let cm = query
        .create_calculated_member(
            "Product",
            "Soft",
            "[Product].[Drink].[Beverages] + [Product].[Drink].[Dairy]",
            Some("[Product].[Drink]"),
        )
        .unwrap();
    query.include_calculated_member("Product", cm).unwrap();

    assert_snapshot!(compiled_axis(&query, "ROWS"), @"{[Product].[Drink].[Soft]}");
}

#[test]
fn test_registered_calculated_member_is_not_emitted_until_included() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_level("Product", "Product Family").unwrap();
    query
        .create_calculated_member("Product", "Consumable", "1", None)
        .unwrap();

    let statement = query.compile().unwrap();
    assert!(statement.definition("[Product].[Consumable]").is_none());
}

#[test]
fn test_visual_totals_from_query() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.set_visual_totals(true);
    query.set_visual_totals_pattern(Some("* {}"));
    query.include_member("Product", "[Product].[Drink]").unwrap();

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @r#"VisualTotals(Hierarchize({[Product].[Drink]}), "* {}")"#
    );
}

#[test]
fn test_visual_totals_hierarchy_overrides_query() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.set_visual_totals(true);
    query.include_member("Product", "[Product].[Drink]").unwrap();
    query.hierarchy_mut("Product").unwrap().set_visual_totals(false);

    assert_snapshot!(compiled_axis(&query, "ROWS"), @"{[Product].[Drink]}");

    let product = query.hierarchy_mut("Product").unwrap();
    product.set_visual_totals(true);
    product.set_visual_totals_pattern("Total {}");
    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @r#"VisualTotals(Hierarchize({[Product].[Drink]}), "Total {}")"#
    );
}

#[test]
fn test_visual_totals_without_pattern() {
    let mut query = query_with("Gender", AxisLocation::Columns);
    query.include_level("Gender", "Gender").unwrap();
    query.hierarchy_mut("Gender").unwrap().set_visual_totals(true);

    assert_snapshot!(
        compiled_axis(&query, "COLUMNS"),
        @"VisualTotals(Hierarchize({[Gender].[Gender].Members}))"
    );
}
