//! Application layer: the host-facing grid service
//!
//! This layer owns the current expansion state and assembles what the external
//! grid renderer consumes.

pub mod error;
pub mod grid;

pub use error::{ApplicationError, ApplicationResult};
pub use grid::{GridRow, GridView, TreeGrid};
