//! Hierarchical row materialization for tree data grids.
//!
//! Flat rows carrying `id`, `parentId` and `level` are indexed into a forest;
//! an expansion set decides which of them are visible, in pre-order, and a
//! toggle column lets the user expand or collapse nodes.

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use application::{GridRow, GridView, TreeGrid};
pub use config::Settings;
pub use domain::{
    classify, resolve, toggle, EventResult, ExpansionSet, FlatRow, GridColumn, OrphanPolicy,
    Row, RowCategory, RowIndex, TreeIssue, TreeRow,
};
