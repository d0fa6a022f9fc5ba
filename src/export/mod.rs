//! Export module for the usage analyzer
//!
//! Writes analysis results in machine-readable formats:
//! - CSV: flat unit totals (spreadsheet-compatible)
//! - JSON: the analysis data plus its report document
//! - YAML: the same payload, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::{export_aggregate_csv, export_comparison_csv};
pub use json::{export_report_json, ReportExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_report_yaml;
