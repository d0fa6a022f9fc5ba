//! Custom error types for the usage analyzer
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions. Rows that are merely unusable (missing
//! category, unparseable amount) are not errors; see `models::record`.

use thiserror::Error;

/// The main error type for usage analyzer operations
#[derive(Error, Debug)]
pub enum AnalyzerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// CSV decoding errors
    #[error("CSV error: {0}")]
    Csv(String),

    /// Input file does not exist
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// The CSV header lacks one or more required columns
    #[error("Missing required columns in '{source_name}': {}", .columns.join(", "))]
    MissingColumns {
        source_name: String,
        columns: Vec<String>,
    },

    /// No row survived normalization
    #[error("No usable data in '{source_name}': {rows_read} rows read, none had a category and a numeric amount")]
    NoUsableData {
        source_name: String,
        rows_read: usize,
    },

    /// A report document was requested before any analysis ran
    #[error("No analysis has been run yet")]
    NoAnalysis,

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Background worker errors
    #[error("Worker error: {0}")]
    Worker(String),
}

impl AnalyzerError {
    /// Create a "missing columns" error
    pub fn missing_columns(source_name: impl Into<String>, columns: Vec<String>) -> Self {
        Self::MissingColumns {
            source_name: source_name.into(),
            columns,
        }
    }

    /// Check if this is an input-format error detected before aggregation
    pub fn is_input_format(&self) -> bool {
        matches!(self, Self::MissingColumns { .. } | Self::Csv(_))
    }

    /// Check if this is the empty-result signal
    pub fn is_no_usable_data(&self) -> bool {
        matches!(self, Self::NoUsableData { .. })
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for AnalyzerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AnalyzerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<csv::Error> for AnalyzerError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err.to_string())
    }
}

/// Result type alias for usage analyzer operations
pub type AnalyzerResult<T> = Result<T, AnalyzerError>;
