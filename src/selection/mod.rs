//! The selection model: what a query selects, independent of MDX.
//!
//! # Architecture
//!
//! ```text
//! Query
//!  ├── axes: COLUMNS, ROWS, [PAGES], FILTER, UNUSED
//!  │     └── AxisSelection ── ordered HierarchyIds ── SelectionModifiers
//!  ├── hierarchies (arena, indexed by HierarchyId)
//!  │     └── HierarchySelection ── axis back-reference ── SelectionModifiers
//!  │           ├── LevelSelection (one per level) ── SelectionModifiers
//!  │           └── CalculatedMember
//!  ├── details: QueryDetails (measures pseudo-axis)
//!  ├── calculated measures
//!  └── parameters: name -> value
//! ```
//!
//! Axes, hierarchies and levels share sort, hierarchize, override and
//! filter settings through [`QuerySet`].

mod axis;
mod calculated;
mod details;
mod filter;
mod hierarchy;
mod level;
mod modifiers;
mod query;

pub use axis::{AxisLocation, AxisSelection};
pub use calculated::{CalculatedMeasure, CalculatedMember};
pub use details::{DetailMeasure, MeasureLocation, QueryDetails};
pub use filter::{FilterFunction, NFilterKind};
pub use hierarchy::{HierarchyId, HierarchySelection};
pub use level::{LevelRange, LevelSelection, ParameterBinding, ParameterMode};
pub use modifiers::{HierarchizeMode, QuerySet, SelectionModifiers, SortOrder, SortSpec};
pub use query::{ConsistencyPolicy, Query};
