//! `harvester`: harvest paginated list endpoints and extract PDF links from HTML.

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use harvest_logging::LogDestination;
use log::LevelFilter;

mod commands;
mod config;
mod effects;
mod session;

use commands::{run_export_csv, run_extract, run_harvest, ExportCsvArgs, ExtractArgs, HarvestArgs};

const LOG_FILENAME: &str = "./harvester.log";

#[derive(Parser)]
#[command(name = "harvester")]
#[command(version)]
#[command(about = "Harvest paginated list endpoints and extract PDF links from HTML")]
struct Cli {
    /// Also write logs to ./harvester.log
    #[arg(long, global = true)]
    log_file: bool,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch every page of the list endpoint and write the records as JSON
    Harvest(HarvestArgs),
    /// Print the PDF links found in an HTML document as a JSON array
    Extract(ExtractArgs),
    /// Turn a JSON array of links into a dated CSV file
    ExportCsv(ExportCsvArgs),
    /// Paste HTML and extract or export links in a session
    Interactive {
        /// Directory for exported CSV files
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let destination = if cli.log_file {
        LogDestination::TerminalAndFile(Path::new(LOG_FILENAME))
    } else {
        LogDestination::Terminal
    };
    harvest_logging::initialize(level, destination);

    match cli.command {
        Commands::Harvest(args) => run_harvest(args),
        Commands::Extract(args) => run_extract(args),
        Commands::ExportCsv(args) => run_export_csv(args),
        Commands::Interactive { out_dir } => session::run_interactive(out_dir),
    }
}
