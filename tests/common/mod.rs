//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use olapq::mdx::{SelectStatement, WithDefinition};
use olapq::metadata::InMemoryCube;
use olapq::selection::{AxisLocation, Query};

/// A small FoodMart-shaped "Sales" cube.
pub fn foodmart() -> Arc<InMemoryCube> {
    let cube = InMemoryCube::builder("Sales")
        .hierarchy(
            "Product",
            &["Product Family", "Product Department", "Product Category"],
        )
        .members(&[
            "[Product].[Drink]",
            "[Product].[Food]",
            "[Product].[Non-Consumable]",
            "[Product].[Drink].[Alcoholic Beverages]",
            "[Product].[Drink].[Beverages]",
            "[Product].[Drink].[Dairy]",
            "[Product].[Food].[Produce]",
            "[Product].[Drink].[Beverages].[Pure Juice Beverages]",
        ])
        .hierarchy("Gender", &["Gender"])
        .members(&["[Gender].[F]", "[Gender].[M]"])
        .time_hierarchy("Time", &["Year", "Quarter", "Month"])
        .members(&[
            "[Time].[1997]",
            "[Time].[1997].[Q1]",
            "[Time].[1997].[Q2]",
            "[Time].[1997].[Q3]",
            "[Time].[1997].[Q4]",
            "[Time].[1997].[Q1].[1]",
        ])
        .hierarchy("Education Level", &["Education Level"])
        .members(&[
            "[Education Level].[Bachelors Degree]",
            "[Education Level].[Graduate Degree]",
            "[Education Level].[High School Degree]",
        ])
        .hierarchy("Store", &["Store Country", "Store State", "Store City"])
        .members(&[
            "[Store].[USA]",
            "[Store].[USA].[CA]",
            "[Store].[USA].[WA]",
            "[Store].[USA].[WA].[Seattle]",
        ])
        .measure("Unit Sales")
        .measure("Store Cost")
        .measure("Store Sales")
        .measure("Customer Count")
        .build()
        .expect("fixture cube is valid");
    Arc::new(cube)
}

/// An empty query over [`foodmart`].
pub fn query() -> Query {
    Query::new("test", foodmart()).expect("query over fixture cube")
}

/// A query with `hierarchy` already moved to `axis`.
pub fn query_with(hierarchy: &str, axis: AxisLocation) -> Query {
    let mut query = query();
    query
        .move_hierarchy(hierarchy, axis, None)
        .expect("move fixture hierarchy");
    query
}

/// The set hoisted for an axis, e.g. `axis_set(&s, "ROWS")` for `[AxisROWS]`.
pub fn axis_set(statement: &SelectStatement, axis: &str) -> String {
    match statement.definition(&format!("[Axis{axis}]")) {
        Some(WithDefinition::Set(s)) => s.expr.to_mdx(),
        other => panic!("no set for axis {axis}: {other:?}"),
    }
}

/// Compile `query` and return the set hoisted for `axis`.
pub fn compiled_axis(query: &Query, axis: &str) -> String {
    let statement = query.compile().expect("query compiles");
    axis_set(&statement, axis)
}
