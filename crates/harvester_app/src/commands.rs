use std::fs;
use std::io::{self, Read};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use harvest_logging::harvest_info;
use harvester_engine::{
    csv_filename, csv_from_json, extract_links, links_to_json, run_harvest_blocking, write_csv,
    CsvDocument, JsonFileSink, DEFAULT_RECORDS_FILENAME,
};

use crate::config::HarvestConfig;
use crate::effects::today_utc;

#[derive(Args, Debug)]
pub struct HarvestArgs {
    /// RON file with endpoint, page length, headers and timeouts
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// List endpoint URL
    #[arg(long)]
    endpoint: Option<String>,

    /// Records requested per page
    #[arg(long, value_name = "N")]
    page_length: Option<NonZeroUsize>,

    /// Directory for the records file
    #[arg(long, value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Records file name
    #[arg(long, value_name = "NAME")]
    output: Option<String>,

    /// Accept invalid TLS certificates from the endpoint
    #[arg(long)]
    insecure: bool,
}

#[derive(Args, Debug)]
pub struct ExtractArgs {
    /// HTML file to scan; reads stdin when omitted
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ExportCsvArgs {
    /// JSON array of links produced by `extract`; reads stdin when omitted
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Directory for the CSV file
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,
}

pub fn run_harvest(args: HarvestArgs) -> Result<()> {
    let config = match &args.config {
        Some(path) => HarvestConfig::load(path)?,
        None => HarvestConfig::default(),
    };

    let mut settings = config.fetch_settings();
    if let Some(endpoint) = args.endpoint {
        settings.endpoint = endpoint;
    }
    if let Some(page_length) = args.page_length {
        settings.page_length = page_length;
    }
    if args.insecure {
        settings.accept_invalid_certs = true;
    }

    let out_dir = args
        .out_dir
        .or(config.output_dir)
        .unwrap_or_else(|| PathBuf::from("."));
    let filename = args
        .output
        .or(config.output_filename)
        .unwrap_or_else(|| DEFAULT_RECORDS_FILENAME.to_string());
    let sink = JsonFileSink::new(out_dir, filename);

    harvest_info!(
        "Harvesting {} with page length {}",
        settings.endpoint,
        settings.page_length
    );
    let summary = run_harvest_blocking(settings, &sink)
        .with_context(|| format!("harvest aborted, nothing written to {}", sink.target().display()))?;

    harvest_info!(
        "Fetched total {} records in {} pages",
        summary.record_count,
        summary.pages
    );
    if let Some(path) = summary.output {
        println!("{}", path.display());
    }
    Ok(())
}

pub fn run_extract(args: ExtractArgs) -> Result<()> {
    let html = read_input(args.input.as_deref())?;
    let links = extract_links(&html)?;
    harvest_info!("Found {} PDF links", links.len());
    println!("{}", links_to_json(&links)?);
    Ok(())
}

pub fn run_export_csv(args: ExportCsvArgs) -> Result<()> {
    let json = read_input(args.input.as_deref())?;
    let document = csv_from_json(&json)?;
    let path = write_csv(&args.out_dir, &csv_filename(&today_utc()), &document)?;
    println!("{}", describe_csv(&path, &document));
    Ok(())
}

fn describe_csv(path: &Path, document: &CsvDocument) -> String {
    format!(
        "{} ({}, {} rows)",
        path.display(),
        document.mime_type(),
        document.row_count()
    )
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
        }
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading stdin")?;
            Ok(text)
        }
    }
}
