//! taxlot-report - Compute realized gains from a transaction log.
//!
//! Reads the log, applies every buy, trade and sale to a ledger in file
//! order, and prints one report line per disposal date, currency and term,
//! followed by the final balances.
//!
//! # Usage
//!
//! ```bash
//! taxlot-report trades.csv
//! taxlot-report trades.csv --currency BTC --currency ETH
//! taxlot-report trades.csv --format json -v
//! ```

use crate::render;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use taxlot_booking::{Ledger, LedgerConfig, LedgerError};
use taxlot_core::CurrencySet;
use taxlot_importer::{extract_from_file, ImportedOperation, ImporterConfig};
use tracing::{debug, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Compute realized gains from a transaction log.
#[derive(Parser, Debug)]
#[command(name = "taxlot-report")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The transaction log to process
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Recognized currency, replacing the default set (repeatable or comma-separated)
    #[arg(short, long = "currency", value_name = "SYM", value_delimiter = ',')]
    currencies: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// CSV delimiter
    #[arg(long, default_value = ",")]
    delimiter: char,

    /// Accept any two header rows without checking the column layout
    #[arg(long)]
    no_header_check: bool,

    /// Do not warn about transfer rows
    #[arg(long)]
    quiet_transfers: bool,

    /// Show verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Main entry point for the report command.
pub fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            if is_fatal(&e) {
                eprintln!(
                    "error: internal consistency failure: ledger balances and lots disagree"
                );
            }
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::from_default_env().add_directive(LevelFilter::DEBUG.into()),
        _ => EnvFilter::from_default_env().add_directive(LevelFilter::TRACE.into()),
    };
    // Logs go to stderr; stdout carries the report.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn is_fatal(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|e| e.downcast_ref::<LedgerError>())
        .any(LedgerError::is_fatal)
}

fn ledger_config(currencies: &[String]) -> LedgerConfig {
    let symbols: Vec<&str> = currencies
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();
    if symbols.is_empty() {
        LedgerConfig::default()
    } else {
        LedgerConfig {
            currencies: symbols.into_iter().collect::<CurrencySet>(),
        }
    }
}

fn importer_config(args: &Args) -> ImporterConfig {
    let mut config = ImporterConfig::default().delimiter(args.delimiter);
    if args.no_header_check {
        config = config.skip_header_check();
    }
    if args.quiet_transfers {
        config = config.quiet_transfers();
    }
    config
}

fn run(args: &Args) -> Result<()> {
    if !args.file.exists() {
        anyhow::bail!("file not found: {}", args.file.display());
    }

    let config = ledger_config(&args.currencies);
    info!(
        file = %args.file.display(),
        currencies = config.currencies.len(),
        format = %args.format,
        "loading transaction log"
    );

    let import = extract_from_file(&args.file, &importer_config(args))?;
    let ledger = book(config, &import.operations)?;

    let mut stdout = io::stdout().lock();
    match args.format {
        OutputFormat::Text => render::write_text(&ledger, &mut stdout)?,
        OutputFormat::Json => render::write_json(&ledger, &mut stdout)?,
    }
    stdout.flush()?;
    Ok(())
}

/// Apply imported operations in file order.
fn book(config: LedgerConfig, operations: &[ImportedOperation]) -> Result<Ledger> {
    let mut ledger = Ledger::new(config);
    for imported in operations {
        ledger
            .apply(&imported.operation)
            .with_context(|| format!("line {}: {}", imported.line, imported.operation))?;
    }
    debug!(
        operations = operations.len(),
        disposal_dates = ledger.tax_events().len(),
        "booked all operations"
    );
    Ok(ledger)
}
