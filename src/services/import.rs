//! CSV source reader
//!
//! Reads a usage export into [`Row`]s. The header must name the four required
//! columns; a missing header is fatal and is reported before any row is
//! looked at. Blank cells become `None`; interpreting values is left to the
//! normalizer.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};

use crate::config::ColumnNames;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::Row;

/// Positions of the required columns within a CSV header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub category: usize,
    pub subcategory: usize,
    pub unit: usize,
    pub amount: usize,
}

impl ColumnMapping {
    /// Locate the required columns in a header record
    ///
    /// Header names are compared after trimming. When several columns share
    /// a name the first one wins.
    pub fn from_headers(
        headers: &StringRecord,
        names: &ColumnNames,
        source_name: &str,
    ) -> AnalyzerResult<Self> {
        let position = |name: &str| headers.iter().position(|h| h.trim() == name);

        let found = names.required().map(position);
        let missing: Vec<String> = names
            .required()
            .iter()
            .zip(found.iter())
            .filter(|(_, idx)| idx.is_none())
            .map(|(name, _)| name.to_string())
            .collect();

        match found {
            [Some(category), Some(subcategory), Some(unit), Some(amount)] => Ok(Self {
                category,
                subcategory,
                unit,
                amount,
            }),
            _ => {
                log::warn!(
                    "'{}' is missing required columns: {}",
                    source_name,
                    missing.join(", ")
                );
                Err(AnalyzerError::missing_columns(source_name, missing))
            }
        }
    }

    /// Extract a row from a data record
    pub fn row(&self, record: &StringRecord, line: usize) -> Row {
        let field = |idx: usize| record.get(idx).filter(|s| !s.is_empty());
        Row::new(
            field(self.category),
            field(self.subcategory),
            field(self.unit),
            field(self.amount),
        )
        .at_line(line)
    }
}

/// Read all rows from CSV data
pub fn read_rows<R: Read>(
    source_name: &str,
    reader: R,
    names: &ColumnNames,
) -> AnalyzerResult<Vec<Row>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AnalyzerError::Csv(format!("Failed to read header of '{}': {}", source_name, e)))?
        .clone();
    let mapping = ColumnMapping::from_headers(&headers, names, source_name)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| {
            AnalyzerError::Csv(format!(
                "Error reading record {} of '{}': {}",
                idx + 1,
                source_name,
                e
            ))
        })?;
        rows.push(mapping.row(&record, idx + 1));
    }

    log::debug!("read {} rows from '{}'", rows.len(), source_name);
    Ok(rows)
}

/// Read all rows from a CSV file
pub fn read_rows_from_file(path: &Path, names: &ColumnNames) -> AnalyzerResult<Vec<Row>> {
    if !path.exists() {
        return Err(AnalyzerError::FileNotFound(path.display().to_string()));
    }
    let file = std::fs::File::open(path)
        .map_err(|e| AnalyzerError::Io(format!("Failed to open {}: {}", path.display(), e)))?;
    read_rows(&source_name(path), std::io::BufReader::new(file), names)
}

/// Display name of a source file (its base name)
pub fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
