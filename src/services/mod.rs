//! Service layer for the usage analyzer
//!
//! Reads CSV sources, runs them through the normalizer and aggregator,
//! compares aggregates, and keeps the last analysis of a session.

pub mod analysis;
pub mod diff;
pub mod import;
pub mod session;
pub mod worker;

pub use analysis::{analyze_file, analyze_reader, analyze_rows, Analysis, AnalysisOutcome, ImportStats};
pub use diff::{compare, diff, unit_deltas, CategoryComparison, ChangeSet, Presence, UnitDelta};
pub use import::{read_rows, read_rows_from_file, ColumnMapping};
pub use session::{AnalysisSession, LastAnalysis};
pub use worker::AnalysisWorker;
