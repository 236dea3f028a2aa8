//! Metadata provider module.
//!
//! This module provides read-only access to cube schema: hierarchies,
//! levels, members and measures.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      MetadataProvider                           │
//! │  - cube_name()             - members(level)                     │
//! │  - hierarchies()           - lookup_member(unique_name)         │
//! │  - levels(hierarchy)       - measures()                         │
//! └─────────────────────────────────────────────────────────────────┘
//!                           │
//!            ┌──────────────┴──────────────┐
//!            ▼                             ▼
//! ┌──────────────────────┐      ┌──────────────────────┐
//! │    InMemoryCube      │      │  caller-provided     │
//! │  (builder / JSON)    │      │  (server, catalog)   │
//! └──────────────────────┘      └──────────────────────┘
//! ```

mod memory;
mod provider;
mod types;

pub use memory::{CubeBuilder, InMemoryCube};
pub use provider::{MetadataError, MetadataProvider, MetadataResult};
pub use types::*;
