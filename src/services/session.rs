//! Analysis session
//!
//! Remembers the most recent analysis so a report document can be produced
//! after the fact. A session is owned by its caller and passed explicitly.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Settings;
use crate::error::{AnalyzerError, AnalyzerResult};
use crate::reports::{Comparison, Document};
use crate::services::analysis::Analysis;

/// The most recent analysis of a session
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LastAnalysis {
    Single(Analysis),
    Comparison(Comparison),
}

/// Holds at most one last analysis
#[derive(Debug, Clone, Default)]
pub struct AnalysisSession {
    last: Option<LastAnalysis>,
}

impl AnalysisSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a single-file analysis, replacing any previous one
    pub fn record_single(&mut self, analysis: Analysis) {
        log::debug!("session: recorded analysis of {}", analysis.source_name);
        self.last = Some(LastAnalysis::Single(analysis));
    }

    /// Remember a comparison, replacing any previous analysis
    pub fn record_comparison(&mut self, comparison: Comparison) {
        log::debug!(
            "session: recorded comparison of {} and {}",
            comparison.old_name,
            comparison.new_name
        );
        self.last = Some(LastAnalysis::Comparison(comparison));
    }

    pub fn clear(&mut self) {
        self.last = None;
    }

    pub fn last(&self) -> Option<&LastAnalysis> {
        self.last.as_ref()
    }

    /// Build the report document for the last analysis
    ///
    /// Fails with [`AnalyzerError::NoAnalysis`] when nothing was recorded.
    /// `Ok(None)` means the recorded analysis had no data to report.
    pub fn document(
        &self,
        settings: &Settings,
        generated_at: DateTime<Utc>,
    ) -> AnalyzerResult<Option<Document>> {
        let top_n = settings.top_categories;
        match self.last.as_ref().ok_or(AnalyzerError::NoAnalysis)? {
            LastAnalysis::Single(analysis) => Ok(Document::single(
                &analysis.source_name,
                &analysis.aggregate,
                top_n,
                generated_at,
            )),
            LastAnalysis::Comparison(comparison) => {
                Ok(Document::comparison(comparison, top_n, generated_at))
            }
        }
    }
}
