//! JSON Export functionality
//!
//! Exports the last analysis of a session, with its report document, to JSON
//! with schema versioning.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Settings;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::reports::Document;
use crate::services::diff::ChangeSet;
use crate::services::session::{AnalysisSession, LastAnalysis};

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Export payload
#[derive(Debug, Clone, Serialize)]
pub struct ReportExport<'a> {
    /// Schema version for compatibility checking
    pub schema_version: String,

    /// Export timestamp
    pub exported_at: DateTime<Utc>,

    /// Application version that created the export
    pub app_version: String,

    /// The analyzed data
    pub analysis: &'a LastAnalysis,

    /// Category changes, for comparisons
    #[serde(skip_serializing_if = "Option::is_none")]
    pub changes: Option<ChangeSet>,

    /// The report document
    pub document: Document,
}

impl<'a> ReportExport<'a> {
    /// Build the export for the session's last analysis
    ///
    /// Returns `Ok(None)` when the analysis has no data to report.
    pub fn from_session(
        session: &'a AnalysisSession,
        settings: &Settings,
        exported_at: DateTime<Utc>,
    ) -> AnalyzerResult<Option<Self>> {
        let analysis = session.last().ok_or(AnalyzerError::NoAnalysis)?;
        let Some(document) = session.document(settings, exported_at)? else {
            return Ok(None);
        };

        let changes = match analysis {
            LastAnalysis::Comparison(comparison) => Some(comparison.changes()),
            LastAnalysis::Single(_) => None,
        };

        Ok(Some(Self {
            schema_version: EXPORT_SCHEMA_VERSION.to_string(),
            exported_at,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            analysis,
            changes,
            document,
        }))
    }
}

/// Write an export as JSON
pub fn export_report_json<W: Write>(
    export: &ReportExport<'_>,
    writer: &mut W,
    pretty: bool,
) -> AnalyzerResult<()> {
    let result = if pretty {
        serde_json::to_writer_pretty(&mut *writer, export)
    } else {
        serde_json::to_writer(&mut *writer, export)
    };
    result.map_err(|e| AnalyzerError::Export(e.to_string()))?;

    writeln!(writer).map_err(|e| AnalyzerError::Export(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColumnNames;
    use crate::reports::Comparison;
    use crate::services::analysis::analyze_reader;

    const OLD: &str = "service_category,service_sub_category,service_unit,total\nA,x,Hours,1\nB,y,GB,2\n";
    const NEW: &str = "service_category,service_sub_category,service_unit,total\nB,y,GB,5\nC,,Hours,3\n";

    fn outcome(name: &str, data: &str) -> crate::services::AnalysisOutcome {
        analyze_reader(name, data.as_bytes(), &ColumnNames::default()).unwrap()
    }

    #[test]
    fn test_export_single_json() {
        let mut session = AnalysisSession::new();
        session.record_single(outcome("old.csv", OLD).require_data().unwrap());

        let export = ReportExport::from_session(&session, &Settings::default(), Utc::now())
            .unwrap()
            .unwrap();
        let mut output = Vec::new();
        export_report_json(&export, &mut output, true).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["schema_version"], EXPORT_SCHEMA_VERSION);
        assert_eq!(value["analysis"]["kind"], "single");
        assert_eq!(value["analysis"]["aggregate"]["B"]["y"]["GB"], 2.0);
        assert_eq!(value["analysis"]["stats"]["rows_used"], 2);
        assert!(value.get("changes").is_none());
        assert_eq!(value["document"]["title"], "Service Usage Analysis Report");
    }

    #[test]
    fn test_export_comparison_json() {
        let mut session = AnalysisSession::new();
        session.record_comparison(Comparison::from_outcomes(
            outcome("old.csv", OLD),
            outcome("new.csv", NEW),
        ));

        let export = ReportExport::from_session(&session, &Settings::default(), Utc::now())
            .unwrap()
            .unwrap();
        let mut output = Vec::new();
        export_report_json(&export, &mut output, false).unwrap();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["analysis"]["kind"], "comparison");
        assert_eq!(value["analysis"]["new"]["C"]["N/A"]["Hours"], 3.0);
        assert_eq!(value["changes"]["missing_categories"][0], "A");
        assert_eq!(value["changes"]["added_categories"][0], "C");
    }

    #[test]
    fn test_export_without_analysis() {
        let session = AnalysisSession::new();
        let result = ReportExport::from_session(&session, &Settings::default(), Utc::now());
        assert!(matches!(result, Err(AnalyzerError::NoAnalysis)));
    }
}
