use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use usage_analyzer::cli::{handle_analyze_command, handle_compare_command};
use usage_analyzer::config::{AnalyzerPaths, Settings};
use usage_analyzer::services::AnalysisSession;

#[derive(Parser)]
#[command(
    name = "usage-analyzer",
    version,
    about = "Aggregate and compare cloud service usage exports",
    long_about = "usage-analyzer reads service usage CSV exports, totals them by \
                  service category, subcategory and unit, and compares two exports \
                  to show which services disappeared or appeared."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one usage file
    Analyze(usage_analyzer::cli::AnalyzeArgs),

    /// Compare an old and a new usage file
    #[command(alias = "diff")]
    Compare(usage_analyzer::cli::CompareArgs),

    /// Show current configuration and paths
    Config,

    /// Write the default settings file
    Init,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Initialize paths and settings
    let paths = AnalyzerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    let mut session = AnalysisSession::new();

    match cli.command {
        Some(Commands::Analyze(args)) => {
            handle_analyze_command(&settings, &mut session, args)?;
        }
        Some(Commands::Compare(args)) => {
            handle_compare_command(&settings, &mut session, args)?;
        }
        Some(Commands::Config) => {
            println!("usage-analyzer Configuration");
            println!("============================");
            println!("Config directory: {}", paths.base_dir().display());
            println!("Settings file:    {}", paths.settings_file().display());
            println!(
                "Initialized:      {}",
                if paths.is_initialized() { "yes" } else { "no" }
            );
            println!();
            println!("Settings:");
            println!("  Top categories:    {}", settings.top_categories);
            println!("  Comparison layout: {:?}", settings.comparison_layout);
            println!("  Column width:      {}", settings.column_width);
            println!("  Page height:       {}", settings.page_height);
            println!(
                "  Required columns:  {}",
                settings.columns.required().join(", ")
            );
        }
        Some(Commands::Init) => {
            settings.save(&paths)?;
            println!("Settings written to: {}", paths.settings_file().display());
        }
        None => {
            println!("usage-analyzer - service usage aggregation and comparison");
            println!();
            println!("Run 'usage-analyzer --help' for usage information.");
        }
    }

    Ok(())
}
