//! Row file loading: JSON or TOML into [`Row`]s.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::domain::{DomainError, Row};
use crate::infrastructure::{InfraError, InfraResult};

/// Accepted layouts: a bare array of rows or a `rows` table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RowFile {
    List(Vec<Row>),
    Wrapped { rows: Vec<Row> },
}

impl RowFile {
    fn into_rows(self) -> Vec<Row> {
        match self {
            RowFile::List(rows) | RowFile::Wrapped { rows } => rows,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowFormat {
    Json,
    Toml,
}

impl RowFormat {
    /// Format by file extension.
    pub fn from_path(path: &Path) -> InfraResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(RowFormat::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(RowFormat::Toml),
            _ => Err(InfraError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Parse row file content.
pub fn parse_rows(content: &str, format: RowFormat, path: &Path) -> InfraResult<Vec<Row>> {
    let file: RowFile = match format {
        RowFormat::Json => serde_json::from_str(content).map_err(|e| InfraError::parse(path, e))?,
        RowFormat::Toml => toml::from_str(content).map_err(|e| InfraError::parse(path, e))?,
    };
    Ok(file.into_rows())
}

/// Read and parse a row file; an empty file is an error.
#[instrument(level = "debug")]
pub fn load_rows(path: &Path) -> InfraResult<Vec<Row>> {
    let format = RowFormat::from_path(path)?;
    let content = fs::read_to_string(path)
        .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?;
    let rows = parse_rows(&content, format, path)?;
    if rows.is_empty() {
        return Err(ApplicationError::from(DomainError::EmptyInput(
            path.display().to_string(),
        ))
        .into());
    }
    debug!(rows = rows.len(), ?format, "rows loaded");
    Ok(rows)
}
