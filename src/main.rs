use std::path::PathBuf;
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{ArgAction, Parser};
use log::LevelFilter;

use manifest_pdf::{Error, ManifestConfig, generate_manifest};

/// Turn a spreadsheet of delivery orders into a delivery manifest PDF.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input workbook (.xlsx)
    input: PathBuf,

    /// Output PDF (defaults to Manifiesto_DD_MM_YYYY.pdf next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Manifest date, YYYY-MM-DD (defaults to today)
    #[arg(long, value_parser = parse_date)]
    date: Option<NaiveDate>,

    /// Order rows per data page
    #[arg(long)]
    rows_per_page: Option<usize>,

    /// JSON layout configuration; flags given on the command line take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}

fn build_config(args: &Args) -> Result<ManifestConfig, Error> {
    let mut config = match &args.config {
        Some(path) => ManifestConfig::from_json_file(path)?,
        None => ManifestConfig::default(),
    };
    if let Some(date) = args.date {
        config.manifest_date = date;
    }
    if let Some(rows) = args.rows_per_page {
        config.rows_per_page = rows;
    }
    Ok(config)
}

fn run(args: &Args) -> Result<(), Error> {
    let config = build_config(args)?;
    let output = match &args.output {
        Some(path) => path.clone(),
        None => args
            .input
            .parent()
            .map(|dir| dir.join(config.file_name()))
            .unwrap_or_else(|| PathBuf::from(config.file_name())),
    };

    let manifest = generate_manifest(&args.input, &output, &config)?;
    println!(
        "{} ({} páginas)",
        output.display(),
        manifest.page_count
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Error::MissingColumns(cols)) => {
            eprintln!("Error: Columnas faltantes: {}", cols.join(", "));
            ExitCode::FAILURE
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
