//! Hisab CLI
//!
//! Exports query results saved as JSON or CSV to spreadsheet, PDF and CSV
//! files, and shows how each column would be classified.
//!
//! ## Usage
//!
//! ```bash
//! hisab export --input invoices.json --kind invoices --company Acme --project Tower
//! hisab export --input ledger.csv --format pdf --from 2024-01-01 --to 2024-03-31
//! hisab classify --input invoices.json
//! ```

mod commands;
mod input;
mod logging;

use std::path::PathBuf;
use std::process;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use hisab_core::ReportKind;
use hisab_export::{ExportFormat, LabelLocale};

#[derive(Parser)]
#[command(name = "hisab")]
#[command(about = "Export tabular reports to spreadsheet, PDF and CSV", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Also write JSON logs to the data directory
    #[arg(long, global = true, env = "HISAB_LOG_JSON")]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a table to one or more export formats
    Export(ExportArgs),

    /// Print the kind assigned to every column
    Classify(ClassifyArgs),
}

#[derive(Args)]
pub struct ExportArgs {
    /// Table to export (.json or .csv)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Output formats: xlsx, pdf, csv (defaults to every available format)
    #[arg(short, long, value_name = "FORMAT", value_delimiter = ',')]
    pub format: Vec<ExportFormat>,

    /// Directory the exports are written to
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Company shown in the title and file name
    #[arg(long, default_value = "")]
    pub company: String,

    /// Project shown in the title and file name
    #[arg(long, default_value = "")]
    pub project: String,

    /// Report kind: financial-report or invoices
    #[arg(long, value_name = "KIND")]
    pub kind: Option<ReportKind>,

    /// Keep rows dated on or after this day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<NaiveDate>,

    /// Keep rows dated on or before this day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<NaiveDate>,

    /// Keep only this raw-material category
    #[arg(long, value_name = "NAME")]
    pub material: Option<String>,

    /// Keep only these suppliers (can be repeated)
    #[arg(long = "supplier", value_name = "NAME")]
    pub suppliers: Vec<String>,

    /// Column to search in, used with --search
    #[arg(long, value_name = "COLUMN", requires = "search")]
    pub search_column: Option<String>,

    /// Case-insensitive text to look for in --search-column
    #[arg(long, value_name = "TEXT", requires = "search_column")]
    pub search: Option<String>,

    /// Export the table as loaded, without hiding or reordering columns
    #[arg(long)]
    pub raw: bool,

    /// Caption language: en or ar
    #[arg(long, value_name = "LOCALE", env = "HISAB_LOCALE")]
    pub locale: Option<LabelLocale>,

    /// Leave the logo banner out of spreadsheets
    #[arg(long)]
    pub no_logo: bool,

    /// Settings file (defaults to <config dir>/hisab/export.toml)
    #[arg(long, value_name = "PATH", env = "HISAB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Extra directory searched first for logo and font files
    #[arg(long, value_name = "DIR", env = "HISAB_ASSETS")]
    pub assets: Option<PathBuf>,
}

#[derive(Args)]
pub struct ClassifyArgs {
    /// Table to inspect (.json or .csv)
    #[arg(short, long, value_name = "FILE")]
    pub input: PathBuf,

    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,

    /// Also show the first rows as they would be displayed
    #[arg(long, value_name = "ROWS")]
    pub preview: Option<usize>,
}

fn main() {
    let cli = Cli::parse();

    let config = logging::LoggingConfig::default()
        .with_verbosity(cli.verbose)
        .with_json_logs(cli.log_json);
    let log_guard = logging::init(config).unwrap_or_else(|e| {
        eprintln!("warning: logging unavailable: {:#}", e);
        None
    });

    let outcome = match cli.command {
        Commands::Export(args) => commands::export(args),
        Commands::Classify(args) => commands::classify(args),
    };

    if let Err(e) = outcome {
        tracing::error!(error = %e, "Command failed");
        eprintln!("error: {:#}", e);
        drop(log_guard);
        process::exit(1);
    }
}
