//! Flight Parser CLI
//!
//! Parses flight-schedule CSVs into a JSON database, or loads an existing
//! one, and optionally runs a file of queries against it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use flight_schedule::{
    run_batch, store, FlightConfig, FlightRecord, Ingestion, ResponseNaming,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "flight-parser")]
#[command(about = "Flight schedule parser and query tool")]
#[command(group(ArgGroup::new("source").required(true).args(["input", "dir", "json_db"])))]
struct Cli {
    /// Parse a single CSV file
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Parse all CSV files in a folder
    #[arg(short, long, value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Load an existing JSON database instead of parsing CSVs
    #[arg(short, long, value_name = "FILE")]
    json_db: Option<PathBuf>,

    /// Output JSON file for valid flights (default: db.json)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output file for rejected lines (default: errors.txt)
    #[arg(short, long, value_name = "FILE")]
    errors: Option<PathBuf>,

    /// Execute queries from a JSON file
    #[arg(short, long, value_name = "FILE")]
    query: Option<PathBuf>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = FlightConfig::load_from(cli.config.as_deref()).context("loading configuration")?;
    let format = config.output.format;

    let records: Vec<FlightRecord> = if let Some(db) = &cli.json_db {
        let records = store::load_records(db)
            .with_context(|| format!("loading JSON DB {}", db.display()))?;
        println!("Loaded {} flights from {}", records.len(), db.display());
        records
    } else {
        let mut ingestion = Ingestion::new();
        if let Some(input) = &cli.input {
            ingestion
                .ingest_file(input)
                .with_context(|| format!("reading {}", input.display()))?;
        }
        if let Some(dir) = &cli.dir {
            ingestion
                .ingest_dir(dir, &config.ingest.extension)
                .with_context(|| format!("reading directory {}", dir.display()))?;
        }

        let (records, diagnostics) = ingestion.into_parts();

        let db_path = cli.output.clone().unwrap_or_else(|| config.output.db_path.clone());
        store::save_records(&db_path, &records, format)
            .with_context(|| format!("writing {}", db_path.display()))?;
        println!("Saved {} valid flights to {}", records.len(), db_path.display());

        let errors_path = cli.errors.clone().unwrap_or_else(|| config.output.errors_path.clone());
        store::save_diagnostics(&errors_path, &diagnostics)
            .with_context(|| format!("writing {}", errors_path.display()))?;
        println!("Saved {} error lines to {}", diagnostics.len(), errors_path.display());

        records
    };

    if let Some(query_path) = &cli.query {
        let queries = store::load_queries(query_path)
            .with_context(|| format!("loading queries from {}", query_path.display()))?;
        let responses = run_batch(&records, &queries);

        let naming = ResponseNaming::new(config.identity.clone());
        let now = chrono::Local::now().naive_local();
        let path = naming.path_in(&config.output.response_dir, now);
        store::save_responses(&path, &responses, format)
            .with_context(|| format!("writing {}", path.display()))?;
        println!("Saved query responses to {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("flight-parser").chain(args.iter().copied()))
    }

    #[test]
    fn test_exactly_one_source_is_required() {
        let rejected: [&[&str]; 5] = [
            &["-i", "flights.csv", "-d", "schedules"],
            &["-j", "db.json", "-i", "flights.csv"],
            &["-j", "db.json", "-d", "schedules"],
            &["-q", "queries.json"],
            &[],
        ];
        for args in rejected {
            let err = parse(args).err().unwrap_or_else(|| panic!("{:?} should be rejected", args));
            assert!(
                matches!(
                    err.kind(),
                    clap::error::ErrorKind::ArgumentConflict | clap::error::ErrorKind::MissingRequiredArgument
                ),
                "{:?} rejected with {:?}",
                args,
                err.kind()
            );
        }
    }

    #[test]
    fn test_single_source_with_options() {
        let cli = parse(&["-i", "flights.csv", "-q", "queries.json"]).unwrap();
        assert_eq!(cli.input, Some(PathBuf::from("flights.csv")));
        assert_eq!(cli.query, Some(PathBuf::from("queries.json")));
        assert!(cli.dir.is_none() && cli.json_db.is_none());

        let cli = parse(&["-j", "db.json", "-c", "flights.toml"]).unwrap();
        assert_eq!(cli.json_db, Some(PathBuf::from("db.json")));
        assert_eq!(cli.config, Some(PathBuf::from("flights.toml")));

        let cli = parse(&["--dir", "schedules", "-o", "out.json", "-e", "bad.txt"]).unwrap();
        assert_eq!(cli.dir, Some(PathBuf::from("schedules")));
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
        assert_eq!(cli.errors, Some(PathBuf::from("bad.txt")));
    }
}
