//! Round-trip command line for timewire connectors.
//!
//! # Responsibility
//! - Push each literal through parse -> encode -> store -> load -> decode ->
//!   format on one connector.
//! - Print one line per literal: the canonical output or the error.

use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use std::sync::Arc;
use timewire_core::{
    build_connector, init_logging, open_db, open_db_in_memory, Connector, EngineConfig,
    FieldService, FractionOverflow, ParseOptions, Provider, SqliteColumnRepository,
};

const ROUND_TRIP_TABLE: &str = "events";
const ROUND_TRIP_COLUMN: &str = "occurred_at";

#[derive(Parser, Debug)]
#[command(name = "timewire")]
#[command(version)]
#[command(about = "Round-trip ISO-8601 UTC literals through a storage connector")]
struct Args {
    /// Provider to encode with (postgresql, mysql, sqlite, mongodb, sqlserver)
    #[arg(long, value_name = "PROVIDER", default_value = "postgresql")]
    connector: String,

    /// Fractional-second digits of the target column
    #[arg(long, value_name = "DIGITS", default_value_t = 3)]
    precision: u8,

    /// Truncate fractions finer than milliseconds instead of rejecting them
    #[arg(long)]
    truncate: bool,

    /// JSON engine config; its active connector overrides --connector
    #[arg(short, long, value_name = "FILE")]
    config: Option<String>,

    /// Record store file (if not specified, uses an in-memory database)
    #[arg(short, long, value_name = "FILE")]
    database: Option<String>,

    /// Literals such as 1969-01-01T10:33:59.828Z
    #[arg(required = true, value_name = "LITERAL")]
    literals: Vec<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

/// Returns `Ok(false)` when at least one literal failed to round-trip.
fn run(args: &Args) -> Result<bool, Box<dyn Error>> {
    let (connector, mut options) = resolve_connector(args)?;
    if args.truncate {
        options.fraction_overflow = FractionOverflow::Truncate;
    }

    let conn = match &args.database {
        Some(path) => open_db(path)?,
        None => open_db_in_memory()?,
    };
    let service = FieldService::new(SqliteColumnRepository::new(&conn), connector)
        .with_parse_options(options);
    println!(
        "connector={} provider={} negative_epoch={}",
        service.connector().name(),
        service.connector().provider().as_str(),
        service.supports_negative_epoch()
    );

    let mut all_ok = true;
    for literal in &args.literals {
        let outcome = service
            .create_record(ROUND_TRIP_TABLE, ROUND_TRIP_COLUMN, literal)
            .and_then(|(column, _)| service.read_field_literal(&column));
        match outcome {
            Ok(Some(output)) => println!("{literal} -> {output}"),
            Ok(None) => {
                all_ok = false;
                println!("{literal} -> error: stored value disappeared");
            }
            Err(err) => {
                all_ok = false;
                println!("{literal} -> error: {err}");
            }
        }
    }
    Ok(all_ok)
}

fn resolve_connector(args: &Args) -> Result<(Arc<dyn Connector>, ParseOptions), Box<dyn Error>> {
    let mut options = ParseOptions::default();
    if let Some(path) = &args.config {
        let config = EngineConfig::load(path)?;
        if config.logging.dir.is_some() {
            init_logging(&config.logging)?;
        }
        options = config.parse_options();
        if let Some(connector) = config.build_registry()?.active() {
            return Ok((connector, options));
        }
    }

    let provider = Provider::parse(&args.connector)?;
    let connector = build_connector(provider.as_str(), provider, args.precision)?;
    Ok((connector, options))
}
