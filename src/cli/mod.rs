//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod analyze;
pub mod compare;

pub use analyze::{handle_analyze_command, AnalyzeArgs};
pub use compare::{handle_compare_command, CompareArgs};

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::ValueEnum;

use crate::config::{ComparisonLayout, Settings};
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::export::{csv, json, yaml, ReportExport};
use crate::reports::{ComparisonReport, Rendered, SingleReport};
use crate::services::{AnalysisSession, LastAnalysis};

const NO_DATA_MESSAGE: &str = "No usable data to report.";

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text report
    #[default]
    Text,
    /// Paginated document with tables
    Document,
    /// JSON (data and document)
    Json,
    /// YAML (data and document, human-readable)
    Yaml,
    /// CSV (one row per unit)
    Csv,
}

/// How the last analysis of a session is written out
#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub format: OutputFormat,
    /// Write to this file instead of stdout
    pub output: Option<PathBuf>,
    pub layout: ComparisonLayout,
    pub details: bool,
}

/// Render the session's last analysis in the requested format
pub fn render_last_analysis(
    session: &AnalysisSession,
    settings: &Settings,
    options: &OutputOptions,
) -> AnalyzerResult<Vec<u8>> {
    let last = session.last().ok_or(AnalyzerError::NoAnalysis)?;
    let mut buffer = Vec::new();

    match options.format {
        OutputFormat::Text => {
            let rendered = match last {
                LastAnalysis::Single(analysis) => {
                    SingleReport::from_analysis(analysis, settings.top_categories)
                        .format_terminal()
                }
                LastAnalysis::Comparison(comparison) => {
                    ComparisonReport::new(comparison, settings.top_categories)
                        .with_layout(options.layout)
                        .with_column_width(settings.column_width)
                        .with_details(options.details)
                        .format_terminal()
                }
            };
            match rendered {
                Rendered::Report(text) => write!(buffer, "{}", text)?,
                Rendered::NoData => writeln!(buffer, "{}", NO_DATA_MESSAGE)?,
            }
        }
        OutputFormat::Document => match session.document(settings, Utc::now())? {
            Some(document) => write!(buffer, "{}", document.render_text(settings.page_height))?,
            None => writeln!(buffer, "{}", NO_DATA_MESSAGE)?,
        },
        OutputFormat::Json | OutputFormat::Yaml => {
            match ReportExport::from_session(session, settings, Utc::now())? {
                Some(export) if options.format == OutputFormat::Json => {
                    json::export_report_json(&export, &mut buffer, true)?
                }
                Some(export) => yaml::export_report_yaml(&export, &mut buffer)?,
                None => writeln!(buffer, "{}", NO_DATA_MESSAGE)?,
            }
        }
        OutputFormat::Csv => match last {
            LastAnalysis::Single(analysis) => {
                csv::export_aggregate_csv(&analysis.aggregate, &mut buffer)?
            }
            LastAnalysis::Comparison(comparison) => {
                csv::export_comparison_csv(comparison, &mut buffer)?
            }
        },
    }

    Ok(buffer)
}

/// Write rendered output to a file, or to stdout
///
/// The file is only created once the whole report is in hand.
fn write_output(path: Option<&Path>, contents: &[u8]) -> AnalyzerResult<()> {
    match path {
        Some(path) => {
            let file = File::create(path).map_err(|e| {
                AnalyzerError::Export(format!(
                    "Failed to create file {}: {}",
                    path.display(),
                    e
                ))
            })?;
            let mut writer = BufWriter::new(file);
            writer.write_all(contents)?;
            writer.flush()?;
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(contents)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Write the session's last analysis in the requested format
pub fn write_last_analysis(
    session: &AnalysisSession,
    settings: &Settings,
    options: &OutputOptions,
) -> AnalyzerResult<()> {
    let contents = render_last_analysis(session, settings, options)?;
    write_output(options.output.as_deref(), &contents)?;

    if let Some(path) = &options.output {
        println!("Report written to: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnNames;
    use crate::services::analyze_reader;
    use tempfile::TempDir;

    fn options(format: OutputFormat, output: Option<PathBuf>) -> OutputOptions {
        OutputOptions {
            format,
            output,
            layout: ComparisonLayout::Unified,
            details: false,
        }
    }

    fn session() -> AnalysisSession {
        let data = "service_category,service_sub_category,service_unit,total\nCompute,VM,Hours,15\n";
        let mut session = AnalysisSession::new();
        session.record_single(
            analyze_reader("usage.csv", data.as_bytes(), &ColumnNames::default())
                .unwrap()
                .require_data()
                .unwrap(),
        );
        session
    }

    #[test]
    fn test_render_csv() {
        let bytes =
            render_last_analysis(&session(), &Settings::default(), &options(OutputFormat::Csv, None))
                .unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            "category,subcategory,unit,total\nCompute,VM,Hours,15\n"
        );
    }

    #[test]
    fn test_failed_render_leaves_existing_output_untouched() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.txt");
        std::fs::write(&path, "previous report").unwrap();

        let err = write_last_analysis(
            &AnalysisSession::new(),
            &Settings::default(),
            &options(OutputFormat::Json, Some(path.clone())),
        )
        .unwrap_err();

        assert!(matches!(err, AnalyzerError::NoAnalysis));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "previous report");
    }

    #[test]
    fn test_output_file_is_replaced_on_success() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("report.csv");
        std::fs::write(&path, "stale contents that are longer than the report itself").unwrap();

        write_last_analysis(
            &session(),
            &Settings::default(),
            &options(OutputFormat::Csv, Some(path.clone())),
        )
        .unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "category,subcategory,unit,total\nCompute,VM,Hours,15\n"
        );
    }
}
