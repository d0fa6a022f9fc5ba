//! Reports module for the usage analyzer
//!
//! Provides the single-file analysis report, the two-file comparison report,
//! and the structured paginated document built from either. Every report
//! sorts categories, subcategories and units ascending before emission.

pub mod comparison;
pub mod document;
pub mod single;
pub mod summary;

pub use comparison::{Comparison, ComparisonReport};
pub use document::{Document, Page, Section, TableBlock};
pub use single::SingleReport;
pub use summary::{top_categories, Summary};

/// Text produced by a report, or the signal that there was nothing to report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// The rendered report
    Report(String),
    /// The input aggregate(s) were empty
    NoData,
}

impl Rendered {
    /// Get the rendered text, if any
    pub fn text(&self) -> Option<&str> {
        match self {
            Rendered::Report(text) => Some(text),
            Rendered::NoData => None,
        }
    }

    /// Check for the "no data" signal
    pub fn is_no_data(&self) -> bool {
        matches!(self, Rendered::NoData)
    }
}
