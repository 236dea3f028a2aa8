//! # olapq
//!
//! Build OLAP selections incrementally and compile them to MDX.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │            MetadataProvider (cube schema)                │
//! │  (hierarchies, levels, members, measures)                │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [Query::new / mutators]
//! ┌─────────────────────────────────────────────────────────┐
//! │                  Selection Model                         │
//! │  Query → AxisSelection → HierarchySelection →            │
//! │  LevelSelection, calculated members, parameters          │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [compile]
//! ┌─────────────────────────────────────────────────────────┐
//! │                 SelectStatement (MDX AST)                │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [to_tokens / serialize]
//! ┌─────────────────────────────────────────────────────────┐
//! │                     MDX text                             │
//! └─────────────────────────────────────────────────────────┘
//! ```

pub mod compile;
pub mod config;
pub mod error;
pub mod mdx;
pub mod metadata;
pub mod params;
pub mod selection;

/// Re-exports for convenient usage.
pub mod prelude {
    pub use crate::compile::{compile, Compiler};
    pub use crate::config::Settings;
    pub use crate::error::{ObjectKind, QueryError, QueryResult};
    pub use crate::mdx::{
        // Constructors
        cross_join,
        func,
        lit_int,
        lit_str,
        member,
        set,
        // Types
        Expr,
        ExprExt,
        ExpressionParser,
        MdxParser,
        SelectStatement,
    };
    pub use crate::metadata::{InMemoryCube, MetadataProvider};
    pub use crate::selection::{
        AxisLocation, ConsistencyPolicy, FilterFunction, HierarchizeMode, MeasureLocation,
        NFilterKind, ParameterMode, Query, QuerySet, SortOrder,
    };
}

// Also export at crate root for convenience
pub use compile::Compiler;
pub use error::{QueryError, QueryResult};
pub use mdx::{Expr, SelectStatement};
pub use selection::Query;
