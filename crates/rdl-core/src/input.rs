//! Input table reading: CSV rows into `InputRecord`s.

use anyhow::{anyhow, Context, Result};
use std::path::Path;

use crate::config::ColumnConfig;

/// One row of the input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputRecord {
    pub identifier: String,
    /// Direct document link.
    pub primary: Option<String>,
    /// Fallback (report web page) link.
    pub secondary: Option<String>,
}

impl InputRecord {
    pub fn new(identifier: &str, primary: Option<&str>, secondary: Option<&str>) -> Self {
        Self {
            identifier: identifier.to_string(),
            primary: primary.and_then(non_blank),
            secondary: secondary.and_then(non_blank),
        }
    }

    /// True if neither location is given.
    pub fn has_no_location(&self) -> bool {
        self.primary.is_none() && self.secondary.is_none()
    }
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Reads up to `limit` records from the CSV file at `path`.
///
/// Columns are located by header name. Blank location cells are absent
/// locations. Rows with a blank identifier are skipped but still count
/// towards `limit`.
pub fn read_records(path: &Path, columns: &ColumnConfig, limit: usize) -> Result<Vec<InputRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .with_context(|| format!("read input table: {}", path.display()))?;

    let headers = reader
        .headers()
        .context("read input table headers")?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim() == name)
            .ok_or_else(|| anyhow!("input table {} has no column {:?}", path.display(), name))
    };
    let id_col = column(columns.identifier.as_str())?;
    let primary_col = column(columns.primary.as_str())?;
    let secondary_col = column(columns.secondary.as_str())?;

    let mut records = Vec::new();
    for (i, rec) in reader.records().take(limit).enumerate() {
        let row = rec.with_context(|| {
            format!("read input row {} in {}", i + 1, path.display())
        })?;
        let identifier = row.get(id_col).unwrap_or("").trim();
        if identifier.is_empty() {
            tracing::warn!("input row {} has no identifier; skipped", i + 1);
            continue;
        }
        records.push(InputRecord::new(
            identifier,
            row.get(primary_col),
            row.get(secondary_col),
        ));
    }
    Ok(records)
}
