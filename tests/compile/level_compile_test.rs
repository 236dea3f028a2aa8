//! Level sets: all members, inclusions, exclusions, ranges, level modifiers.

#[path = "../common/mod.rs"]
mod common;

use common::{compiled_axis, query_with};
use insta::assert_snapshot;
use olapq::selection::{AxisLocation, HierarchizeMode, ParameterMode, QuerySet, SortOrder};
use olapq::QueryError;

#[test]
fn test_all_members_of_level() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_level("Product", "Product Family").unwrap();

    assert_snapshot!(compiled_axis(&query, "ROWS"), @"{[Product].[Product Family].Members}");
}

#[test]
fn test_single_member() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_member("Product", "[Product].[Drink]").unwrap();

    assert_snapshot!(compiled_axis(&query, "ROWS"), @"{[Product].[Drink]}");
}

#[test]
fn test_inclusions_keep_insertion_order() {
    let mut query = query_with("Product", AxisLocation::Rows);
    for m in ["[Product].[Non-Consumable]", "[Product].[Drink]", "[Product].[Food]"] {
        query.include_member("Product", m).unwrap();
    }

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"{[Product].[Non-Consumable], [Product].[Drink], [Product].[Food]}"
    );
}

#[test]
fn test_included_then_excluded_member_uses_except() {
    let mut query = query_with("Product", AxisLocation::Rows);
    for m in ["[Product].[Drink]", "[Product].[Food]", "[Product].[Non-Consumable]"] {
        query.include_member("Product", m).unwrap();
    }
    query.exclude_member("Product", "[Product].[Food]").unwrap();

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Except({[Product].[Drink], [Product].[Food], [Product].[Non-Consumable]}, {[Product].[Food]})"
    );
}

#[test]
fn test_exclusion_from_all_members() {
    let mut query = query_with("Gender", AxisLocation::Columns);
    query.exclude_member("Gender", "[Gender].[M]").unwrap();

    assert_snapshot!(
        compiled_axis(&query, "COLUMNS"),
        @"Except({[Gender].[Gender].Members}, {[Gender].[M]})"
    );
}

#[test]
fn test_member_range() {
    let mut query = query_with("Time", AxisLocation::Columns);
    query
        .set_range("Time", "[Time].[1997].[Q1]", "[Time].[1997].[Q3]")
        .unwrap();

    assert_snapshot!(
        compiled_axis(&query, "COLUMNS"),
        @"{[Time].[1997].[Q1] : [Time].[1997].[Q3]}"
    );
}

#[test]
fn test_range_expressions_are_parsed() {
    let mut query = query_with("Time", AxisLocation::Columns);
    query
        .set_range_expressions(
            "Time",
            "Quarter",
            "[Time].[1997].[Q1]",
            "[Time].[1997].[Q1].Lead(2)",
        )
        .unwrap();

    assert_snapshot!(
        compiled_axis(&query, "COLUMNS"),
        @"{[Time].[1997].[Q1] : [Time].[1997].[Q1].Lead(2)}"
    );
}

#[test]
fn test_range_with_exclusion() {
    let mut query = query_with("Time", AxisLocation::Columns);
    query
        .set_range("Time", "[Time].[1997].[Q1]", "[Time].[1997].[Q4]")
        .unwrap();
    query.exclude_member("Time", "[Time].[1997].[Q2]").unwrap();

    assert_snapshot!(
        compiled_axis(&query, "COLUMNS"),
        @"Except({[Time].[1997].[Q1] : [Time].[1997].[Q4]}, {[Time].[1997].[Q2]})"
    );
}

#[test]
fn test_level_sort_defaults_to_member_name() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query
        .hierarchy_mut("Product")
        .unwrap()
        .include_level("Product Family")
        .unwrap()
        .sort(SortOrder::Desc, None);

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Order({[Product].[Product Family].Members}, [Product].CurrentMember.Name, DESC)"
    );
}

#[test]
fn test_level_sort_by_measure() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query
        .hierarchy_mut("Product")
        .unwrap()
        .include_level("Product Family")
        .unwrap()
        .sort(SortOrder::Basc, Some("[Measures].[Unit Sales]"));

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Order({[Product].[Product Family].Members}, [Measures].[Unit Sales], BASC)"
    );
}

#[test]
fn test_level_hierarchize_post() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query
        .hierarchy_mut("Product")
        .unwrap()
        .include_level("Product Family")
        .unwrap()
        .set_hierarchize_mode(HierarchizeMode::Post);

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Hierarchize({[Product].[Product Family].Members}, POST)"
    );
}

#[test]
fn test_level_override_replaces_structure() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_member("Product", "[Product].[Drink]").unwrap();
    query
        .hierarchy_mut("Product")
        .unwrap()
        .level_mut("Product Family")
        .unwrap()
        .set_override("[Product].[Food].Children");

    assert_snapshot!(compiled_axis(&query, "ROWS"), @"{[Product].[Food].Children}");
}

#[test]
fn test_level_override_skips_inclusion_parameter() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query
        .bind_level_parameter("Product", "Product Family", "family", ParameterMode::Inclusion)
        .unwrap();
    query.set_parameter("family", Some("[Product].[Snacks]"));
    query
        .hierarchy_mut("Product")
        .unwrap()
        .level_mut("Product Family")
        .unwrap()
        .set_override("[Product].[Food].Children");

    assert_snapshot!(compiled_axis(&query, "ROWS"), @"{[Product].[Food].Children}");
}

#[test]
fn test_invalid_override_is_a_parse_error() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query
        .hierarchy_mut("Product")
        .unwrap()
        .include_level("Product Family")
        .unwrap()
        .set_override("{[Product].[Drink],");

    let err = query.compile().unwrap_err();
    assert!(matches!(err, QueryError::ExpressionParse(_)), "{err}");
}
