//! Analysis service
//!
//! Runs rows through the normalizer and aggregator and reports what was kept.
//! Zero surviving rows is an explicit outcome, not an error.

use std::io::Read;
use std::path::Path;

use serde::Serialize;

use crate::config::ColumnNames;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::models::{normalize, Aggregate, Normalized, Row, SkipReason};
use crate::services::import;

/// Counters collected while normalizing a source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Data rows read (header excluded)
    pub rows_read: usize,
    /// Rows dropped for a missing category
    pub skipped_missing_category: usize,
    /// Rows dropped for an unparseable amount
    pub skipped_invalid_amount: usize,
    /// Rows folded into the aggregate
    pub rows_used: usize,
}

impl ImportStats {
    /// Total number of rows dropped
    pub fn skipped(&self) -> usize {
        self.skipped_missing_category + self.skipped_invalid_amount
    }

    fn record_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::MissingCategory => self.skipped_missing_category += 1,
            SkipReason::InvalidAmount => self.skipped_invalid_amount += 1,
        }
    }
}

/// An aggregated source
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Analysis {
    /// Display name of the source (file base name)
    pub source_name: String,
    pub aggregate: Aggregate,
    pub stats: ImportStats,
}

/// Result of analyzing one source
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// At least one row survived normalization
    Ready(Analysis),
    /// Every row was skipped, or there were none
    NoUsableData {
        source_name: String,
        stats: ImportStats,
    },
}

impl AnalysisOutcome {
    /// Get the analysis, if there is one
    pub fn analysis(&self) -> Option<&Analysis> {
        match self {
            AnalysisOutcome::Ready(analysis) => Some(analysis),
            AnalysisOutcome::NoUsableData { .. } => None,
        }
    }

    /// Display name of the analyzed source
    pub fn source_name(&self) -> &str {
        match self {
            AnalysisOutcome::Ready(analysis) => &analysis.source_name,
            AnalysisOutcome::NoUsableData { source_name, .. } => source_name,
        }
    }

    /// Check for the empty-result signal
    pub fn is_empty(&self) -> bool {
        matches!(self, AnalysisOutcome::NoUsableData { .. })
    }

    /// Convert the empty-result signal into an error for callers that need data
    pub fn require_data(self) -> AnalyzerResult<Analysis> {
        match self {
            AnalysisOutcome::Ready(analysis) => Ok(analysis),
            AnalysisOutcome::NoUsableData { source_name, stats } => {
                Err(AnalyzerError::NoUsableData {
                    source_name,
                    rows_read: stats.rows_read,
                })
            }
        }
    }

    /// The aggregate, or an empty one when there was no usable data
    pub fn into_aggregate(self) -> Aggregate {
        match self {
            AnalysisOutcome::Ready(analysis) => analysis.aggregate,
            AnalysisOutcome::NoUsableData { .. } => Aggregate::new(),
        }
    }
}

/// Normalize and aggregate already-read rows
pub fn analyze_rows(source_name: &str, rows: &[Row]) -> AnalysisOutcome {
    let mut stats = ImportStats {
        rows_read: rows.len(),
        ..ImportStats::default()
    };
    let mut builder = Aggregate::builder();

    for row in rows {
        match normalize(row) {
            Normalized::Entry(entry) => builder.add(entry),
            Normalized::Skip(reason) => {
                log::debug!("{}: skipping line {} ({})", source_name, row.line, reason);
                stats.record_skip(reason);
            }
        }
    }
    stats.rows_used = builder.len();

    log::info!(
        "{}: {} rows read, {} used, {} skipped",
        source_name,
        stats.rows_read,
        stats.rows_used,
        stats.skipped()
    );

    if builder.is_empty() {
        log::warn!("{}: no usable rows", source_name);
        return AnalysisOutcome::NoUsableData {
            source_name: source_name.to_string(),
            stats,
        };
    }

    AnalysisOutcome::Ready(Analysis {
        source_name: source_name.to_string(),
        aggregate: builder.build(),
        stats,
    })
}

/// Analyze CSV data from a reader
pub fn analyze_reader<R: Read>(
    source_name: &str,
    reader: R,
    names: &ColumnNames,
) -> AnalyzerResult<AnalysisOutcome> {
    let rows = import::read_rows(source_name, reader, names)?;
    Ok(analyze_rows(source_name, &rows))
}

/// Analyze a CSV file
pub fn analyze_file(path: &Path, names: &ColumnNames) -> AnalyzerResult<AnalysisOutcome> {
    let rows = import::read_rows_from_file(path, names)?;
    Ok(analyze_rows(&import::source_name(path), &rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CSV: &str = "service_category,service_sub_category,service_unit,total\n\
                       Compute,VM,Hours,10\n\
                       Compute,VM,Hours,5\n\
                       Storage,,GB,3\n\
                       ,VM,Hours,99\n\
                       Network,Egress,GB,n/a\n";

    #[test]
    fn test_analyze_reader() {
        let outcome = analyze_reader("usage.csv", CSV.as_bytes(), &ColumnNames::default()).unwrap();
        let analysis = outcome.analysis().unwrap();

        assert_eq!(analysis.source_name, "usage.csv");
        assert_eq!(analysis.aggregate.unit_total("Compute", "VM", "Hours"), Some(15.0));
        assert_eq!(analysis.aggregate.unit_total("Storage", "N/A", "GB"), Some(3.0));
        assert!(!analysis.aggregate.contains_category("Network"));
        assert_eq!(
            analysis.stats,
            ImportStats {
                rows_read: 5,
                skipped_missing_category: 1,
                skipped_invalid_amount: 1,
                rows_used: 3,
            }
        );
    }

    #[test]
    fn test_padded_category_is_a_separate_key() {
        let data = "service_category,service_sub_category,service_unit,total\n\
                    Compute,VM,Hours,1\n \
                    Compute,VM,Hours,2\n";
        let outcome = analyze_reader("usage.csv", data.as_bytes(), &ColumnNames::default()).unwrap();
        let aggregate = &outcome.analysis().unwrap().aggregate;

        let categories: Vec<&str> = aggregate.categories().collect();
        assert_eq!(categories, vec![" Compute", "Compute"]);
        assert_eq!(aggregate.category_total("Compute"), 1.0);
        assert_eq!(aggregate.category_total(" Compute"), 2.0);
    }

    #[test]
    fn test_no_usable_data() {
        let data = "service_category,service_sub_category,service_unit,total\n,a,b,1\nX,a,b,zzz\n";
        let outcome = analyze_reader("bad.csv", data.as_bytes(), &ColumnNames::default()).unwrap();

        assert!(outcome.is_empty());
        assert!(outcome.analysis().is_none());
        let err = outcome.require_data().unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::NoUsableData { rows_read: 2, .. }
        ));
    }

    #[test]
    fn test_zero_rows_is_no_usable_data() {
        let outcome = analyze_rows("empty.csv", &[]);
        assert!(outcome.is_empty());
        assert!(outcome.into_aggregate().is_empty());
    }

    #[test]
    fn test_missing_columns_is_an_error() {
        let err = analyze_reader("x.csv", "a,b\n1,2\n".as_bytes(), &ColumnNames::default())
            .unwrap_err();
        assert!(err.is_input_format());
    }

    #[test]
    fn test_analyze_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("march.csv");
        std::fs::write(&path, CSV).unwrap();

        let analysis = analyze_file(&path, &ColumnNames::default())
            .unwrap()
            .require_data()
            .unwrap();
        assert_eq!(analysis.source_name, "march.csv");
        assert_eq!(analysis.aggregate.category_count(), 2);
    }
}
