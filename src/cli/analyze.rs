//! CLI command for single-file analysis

use std::path::PathBuf;

use clap::Args;

use crate::config::Settings;
use crate::error::AnalyzerResult;
use crate::services::{analyze_file, AnalysisSession, AnalysisWorker};

use super::{write_last_analysis, OutputFormat, OutputOptions};

/// Arguments of `analyze`
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// CSV file to analyze
    pub file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of top categories to list
    #[arg(long)]
    pub top: Option<usize>,
}

/// Handle `analyze`
pub fn handle_analyze_command(
    settings: &Settings,
    session: &mut AnalysisSession,
    args: AnalyzeArgs,
) -> AnalyzerResult<()> {
    let mut settings = settings.clone();
    if let Some(top) = args.top {
        settings.top_categories = top;
    }

    log::info!("analyzing {}", args.file.display());
    let path = args.file.clone();
    let columns = settings.columns.clone();
    let worker = AnalysisWorker::spawn(move || analyze_file(&path, &columns))?;
    let analysis = worker.wait()??.require_data()?;

    session.record_single(analysis);
    write_last_analysis(
        session,
        &settings,
        &OutputOptions {
            format: args.format,
            output: args.output,
            layout: settings.comparison_layout,
            details: false,
        },
    )
}
