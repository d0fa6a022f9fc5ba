//! CLI command for comparing two files

use std::path::PathBuf;

use clap::Args;

use crate::config::{ComparisonLayout, Settings};
use crate::error::AnalyzerResult;
use crate::reports::Comparison;
use crate::services::{analyze_file, AnalysisSession, AnalysisWorker};

use super::{write_last_analysis, OutputFormat, OutputOptions};

/// Arguments of `compare`
#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Old CSV file
    pub old: PathBuf,

    /// New CSV file
    pub new: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Text layout (defaults to the configured layout)
    #[arg(short, long, value_enum)]
    pub layout: Option<ComparisonLayout>,

    /// Width of one column in the side-by-side layout
    #[arg(long)]
    pub width: Option<usize>,

    /// Append per-unit changes to the text report
    #[arg(short, long)]
    pub details: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of top categories to list
    #[arg(long)]
    pub top: Option<usize>,
}

/// Handle `compare`
pub fn handle_compare_command(
    settings: &Settings,
    session: &mut AnalysisSession,
    args: CompareArgs,
) -> AnalyzerResult<()> {
    let mut settings = settings.clone();
    if let Some(top) = args.top {
        settings.top_categories = top;
    }
    if let Some(width) = args.width {
        settings.column_width = width;
    }

    log::info!(
        "comparing {} with {}",
        args.old.display(),
        args.new.display()
    );

    // Both files are read concurrently
    let (old_path, old_columns) = (args.old.clone(), settings.columns.clone());
    let old_worker = AnalysisWorker::spawn(move || analyze_file(&old_path, &old_columns))?;
    let (new_path, new_columns) = (args.new.clone(), settings.columns.clone());
    let new_worker = AnalysisWorker::spawn(move || analyze_file(&new_path, &new_columns))?;

    let old = old_worker.wait()??;
    let new = new_worker.wait()??;

    // One empty side still compares; both empty has nothing to report
    match (old.is_empty(), new.is_empty()) {
        (true, true) => return old.require_data().map(|_| ()),
        (true, false) => log::warn!("{} has no usable data", old.source_name()),
        (false, true) => log::warn!("{} has no usable data", new.source_name()),
        (false, false) => {}
    }

    session.record_comparison(Comparison::from_outcomes(old, new));
    write_last_analysis(
        session,
        &settings,
        &OutputOptions {
            format: args.format,
            output: args.output,
            layout: args.layout.unwrap_or(settings.comparison_layout),
            details: args.details,
        },
    )
}
