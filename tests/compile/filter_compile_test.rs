//! Filter functions on levels, hierarchies and axes.

#[path = "../common/mod.rs"]
mod common;

use common::{compiled_axis, query_with};
use insta::assert_snapshot;
use olapq::selection::{AxisLocation, FilterFunction, NFilterKind, QuerySet, SortOrder};
use olapq::QueryError;

#[test]
fn test_top_count_on_level() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query
        .hierarchy_mut("Product")
        .unwrap()
        .include_level("Product Family")
        .unwrap()
        .add_filter(
            FilterFunction::n_filter(NFilterKind::TopCount, 2, Some("[Measures].[Unit Sales]"))
                .unwrap(),
        );

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"TopCount({[Product].[Product Family].Members}, 2, [Measures].[Unit Sales])"
    );
}

#[test]
fn test_bottom_percent_with_fraction() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query
        .hierarchy_mut("Product")
        .unwrap()
        .include_level("Product Family")
        .unwrap()
        .add_filter(
            FilterFunction::n_filter(NFilterKind::BottomPercent, 12.5, Some("[Measures].[Store Sales]"))
                .unwrap(),
        );

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"BottomPercent({[Product].[Product Family].Members}, 12.5, [Measures].[Store Sales])"
    );
}

#[test]
fn test_generic_filter_on_hierarchy() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_level("Product", "Product Family").unwrap();
    query
        .hierarchy_mut("Product")
        .unwrap()
        .add_filter(FilterFunction::generic("[Measures].[Unit Sales] > 1000"));

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Filter({[Product].[Product Family].Members}, ([Measures].[Unit Sales] > 1000))"
    );
}

#[test]
fn test_name_filter() {
    let mut query = query_with("Time", AxisLocation::Columns);
    query.include_level("Time", "Quarter").unwrap();
    query
        .hierarchy_mut("Time")
        .unwrap()
        .add_filter(FilterFunction::name("[Time]", &["Q1", "Q2"]).unwrap());

    assert_snapshot!(
        compiled_axis(&query, "COLUMNS"),
        @r#"Filter({[Time].[Quarter].Members}, (([Time].CurrentMember.Name = "Q1") OR ([Time].CurrentMember.Name = "Q2")))"#
    );
}

#[test]
fn test_name_like_filter() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_level("Product", "Product Department").unwrap();
    query
        .hierarchy_mut("Product")
        .unwrap()
        .add_filter(FilterFunction::name_like("[Product]", &["Bev"]).unwrap());

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @r#"Filter({[Product].[Product Department].Members}, (InStr([Product].CurrentMember.Name, "Bev") > 0))"#
    );
}

#[test]
fn test_filters_apply_in_order_before_sort() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_level("Product", "Product Family").unwrap();
    let product = query.hierarchy_mut("Product").unwrap();
    product.add_filter(FilterFunction::generic("[Measures].[Unit Sales] > 0"));
    product.add_filter(
        FilterFunction::n_filter(NFilterKind::TopCount, 10, Some("[Measures].[Unit Sales]"))
            .unwrap(),
    );
    product.sort(SortOrder::Desc, Some("[Measures].[Unit Sales]"));

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"Order(TopCount(Filter({[Product].[Product Family].Members}, ([Measures].[Unit Sales] > 0)), 10, [Measures].[Unit Sales]), [Measures].[Unit Sales], DESC)"
    );
}

#[test]
fn test_axis_filter() {
    let mut query = query_with("Gender", AxisLocation::Rows);
    query.include_level("Gender", "Gender").unwrap();
    query.axis_mut(AxisLocation::Rows).unwrap().add_filter(
        FilterFunction::n_filter(NFilterKind::TopCount, 1, Some("[Measures].[Unit Sales]")).unwrap(),
    );

    assert_snapshot!(
        compiled_axis(&query, "ROWS"),
        @"TopCount({[Gender].[Gender].Members}, 1, [Measures].[Unit Sales])"
    );
}

#[test]
fn test_clear_filters() {
    let mut query = query_with("Gender", AxisLocation::Rows);
    query.include_level("Gender", "Gender").unwrap();
    let gender = query.hierarchy_mut("Gender").unwrap();
    gender.add_filter(FilterFunction::generic("1 = 1"));
    gender.clear_filters();

    assert_snapshot!(compiled_axis(&query, "ROWS"), @"{[Gender].[Gender].Members}");
}

#[test]
fn test_invalid_n_filters_are_rejected() {
    assert!(matches!(
        FilterFunction::n_filter(NFilterKind::Filter, 1, None).unwrap_err(),
        QueryError::InvalidArgument(_)
    ));
    assert!(matches!(
        FilterFunction::n_filter(NFilterKind::TopCount, -1, None).unwrap_err(),
        QueryError::InvalidArgument(_)
    ));
    assert!(FilterFunction::name("[Time]", &[]).is_err());
}

#[test]
fn test_malformed_predicate_is_a_parse_error() {
    let mut query = query_with("Gender", AxisLocation::Rows);
    query.include_level("Gender", "Gender").unwrap();
    query
        .hierarchy_mut("Gender")
        .unwrap()
        .add_filter(FilterFunction::generic("[Measures].[Unit Sales] >"));

    assert!(matches!(
        query.compile().unwrap_err(),
        QueryError::ExpressionParse(_)
    ));
}

#[test]
fn test_out_of_range_literal_is_a_parse_error() {
    let mut query = query_with("Gender", AxisLocation::Rows);
    query.include_level("Gender", "Gender").unwrap();
    let predicate = format!("[Measures].[Unit Sales] > {}.0", "9".repeat(400));
    query
        .hierarchy_mut("Gender")
        .unwrap()
        .add_filter(FilterFunction::generic(&predicate));

    assert!(matches!(
        query.compile().unwrap_err(),
        QueryError::ExpressionParse(_)
    ));
}
