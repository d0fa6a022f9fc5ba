//! YAML Export functionality
//!
//! Same payload as the JSON export, prefixed with a comment header.

use std::io::Write;

use crate::error::{AnalyzerError, AnalyzerResult};
use crate::export::json::ReportExport;

fn export_error(e: impl std::fmt::Display) -> AnalyzerError {
    AnalyzerError::Export(e.to_string())
}

/// Write an export as YAML
pub fn export_report_yaml<W: Write>(export: &ReportExport<'_>, writer: &mut W) -> AnalyzerResult<()> {
    writeln!(writer, "# {}", export.document.title).map_err(export_error)?;
    writeln!(writer, "# Generated: {}", export.exported_at).map_err(export_error)?;
    writeln!(writer, "# App Version: {}", export.app_version).map_err(export_error)?;
    writeln!(writer).map_err(export_error)?;

    serde_yaml::to_writer(writer, export).map_err(export_error)?;
    Ok(())
}
