//! Infrastructure layer: file I/O
//!
//! This layer reads row files from disk and turns parse failures into errors.

pub mod error;
pub mod loader;

pub use error::{InfraError, InfraResult};
pub use loader::{load_rows, parse_rows, RowFormat};
