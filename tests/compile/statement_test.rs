//! Whole statements: WITH ordering, slicer, rendering.

#[path = "../common/mod.rs"]
mod common;

use common::{foodmart, query, query_with};
use insta::assert_snapshot;
use olapq::compile::Compiler;
use olapq::config::Settings;
use olapq::mdx::{func, Expr, ExpressionParser, MdxParser, ParseError};
use olapq::selection::{AxisLocation, MeasureLocation, Query, QuerySet};

#[test]
fn test_empty_query() {
    let query = query();
    assert_snapshot!(query.to_mdx().unwrap(), @r"
    SELECT
    FROM [Sales]
    ");
}

#[test]
fn test_single_member_on_rows() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_member("Product", "[Product].[Drink]").unwrap();

    assert_snapshot!(query.to_mdx().unwrap(), @r"
    WITH
    SET [AxisROWS] AS
        {[Product].[Drink]}
    SELECT
    [AxisROWS] ON ROWS
    FROM [Sales]
    ");
}

#[test]
fn test_measures_only() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_member("Product", "[Product].[Drink]").unwrap();
    query.add_measure("Unit Sales").unwrap();

    assert_snapshot!(query.to_mdx().unwrap(), @r"
    WITH
    SET [AxisROWS] AS
        {[Product].[Drink]}
    SELECT
    {[Measures].[Unit Sales]} ON COLUMNS,
    [AxisROWS] ON ROWS
    FROM [Sales]
    ");
}

#[test]
fn test_full_statement() {
    let mut query = query();
    query.move_hierarchy("Product", AxisLocation::Rows, None).unwrap();
    query.include_level("Product", "Product Family").unwrap();
    let consumable = query
        .create_calculated_member(
            "Product",
            "Consumable",
            "Aggregate({[Product].[Drink], [Product].[Food]})",
            None,
        )
        .unwrap();
    query.include_calculated_member("Product", consumable).unwrap();

    query.move_hierarchy("Gender", AxisLocation::Columns, None).unwrap();
    query.include_member("Gender", "[Gender].[F]").unwrap();
    query
        .axis_mut(AxisLocation::Columns)
        .unwrap()
        .set_non_empty(true);

    query.move_hierarchy("Time", AxisLocation::Filter, None).unwrap();
    query.include_member("Time", "[Time].[1997].[Q1]").unwrap();

    let profit = query
        .create_calculated_measure(
            "Profit",
            "[Measures].[Store Sales] - [Measures].[Store Cost]",
            None,
        )
        .unwrap()
        .with_property("FORMAT_STRING", r#""$#,##0.00""#);
    query.add_calculated_measure(profit);
    query.add_measure("Unit Sales").unwrap();
    query.add_measure("Profit").unwrap();

    assert_snapshot!(query.to_mdx().unwrap(), @r#"
    WITH
    SET [AxisFILTER] AS
        {[Time].[1997].[Q1]}
    SET [AxisCOLUMNS] AS
        {[Gender].[F]}
    MEMBER [Measures].[Profit] AS
        ([Measures].[Store Sales] - [Measures].[Store Cost]), FORMAT_STRING = "$#,##0.00"
    MEMBER [Product].[Consumable] AS
        Aggregate({[Product].[Drink], [Product].[Food]})
    SET [AxisROWS] AS
        {{[Product].[Consumable]}, {[Product].[Product Family].Members}}
    SELECT
    NON EMPTY CrossJoin([AxisCOLUMNS], {[Measures].[Unit Sales], [Measures].[Profit]}) ON COLUMNS,
    [AxisROWS] ON ROWS
    FROM [Sales]
    WHERE [AxisFILTER]
    "#);
}

#[test]
fn test_measures_on_filter_axis() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_member("Product", "[Product].[Drink]").unwrap();
    query.add_measure("Store Sales").unwrap();
    query.details_mut().set_axis(AxisLocation::Filter).unwrap();
    query.details_mut().set_location(MeasureLocation::Top);

    let statement = query.compile().unwrap();
    assert_eq!(
        statement.slicer.as_ref().map(Expr::to_mdx).as_deref(),
        Some("{[Measures].[Store Sales]}")
    );
}

#[test]
fn test_compile_is_idempotent() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query.include_level("Product", "Product Family").unwrap();
    query.include_level("Product", "Product Department").unwrap();
    let cm = query
        .create_calculated_member("Product", "Consumable", "[Product].[Drink] + [Product].[Food]", None)
        .unwrap();
    query.include_calculated_member("Product", cm).unwrap();
    query.add_measure("Unit Sales").unwrap();

    let first = query.compile().unwrap();
    let second = query.compile().unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_mdx(), second.to_mdx());
}

#[test]
fn test_calculated_member_declared_once() {
    let mut query = query();
    query.move_hierarchy("Product", AxisLocation::Rows, None).unwrap();
    let cm = query
        .create_calculated_member("Product", "Consumable", "[Product].[Drink] + [Product].[Food]", None)
        .unwrap();
    query.include_calculated_member("Product", cm.clone()).unwrap();
    query.include_calculated_member("Product", cm).unwrap();

    let statement = query.compile().unwrap();
    let declared = statement
        .with
        .iter()
        .filter(|d| d.name().to_string() == "[Product].[Consumable]")
        .count();
    assert_eq!(declared, 1);
}

#[test]
fn test_with_settings() {
    let settings = Settings::from_toml_str(
        r#"
[query]
default_hierarchize_mode = "post"

[details]
location = "top"

[axes]
non_empty = true
"#,
    )
    .unwrap();
    let mut query = Query::with_settings("configured", foodmart(), &settings).unwrap();
    query.move_hierarchy("Gender", AxisLocation::Columns, None).unwrap();
    query.include_level("Gender", "Gender").unwrap();
    query.add_measure("Unit Sales").unwrap();

    assert_snapshot!(query.to_mdx().unwrap(), @r"
    WITH
    SET [AxisCOLUMNS] AS
        {[Gender].[Gender].Members}
    SELECT
    NON EMPTY CrossJoin({[Measures].[Unit Sales]}, [AxisCOLUMNS]) ON COLUMNS
    FROM [Sales]
    ");
}

/// Wraps every fragment in `Distinct(..)`.
struct DistinctParser;

impl ExpressionParser for DistinctParser {
    fn parse_expression(&self, text: &str) -> Result<Expr, ParseError> {
        Ok(func("Distinct", vec![MdxParser.parse_expression(text)?]))
    }
}

#[test]
fn test_custom_parser() {
    let mut query = query_with("Product", AxisLocation::Rows);
    query
        .hierarchy_mut("Product")
        .unwrap()
        .include_level("Product Family")
        .unwrap()
        .set_override("[Product].[Drink].Children");

    let statement = Compiler::new(&query)
        .with_parser(&DistinctParser)
        .compile()
        .unwrap();
    assert_eq!(
        common::axis_set(&statement, "ROWS"),
        "{Distinct([Product].[Drink].Children)}"
    );
}
