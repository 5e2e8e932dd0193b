//! Command-line interface for relgen
//!
//! # Usage Examples
//!
//! ## Generate flat files
//! ```bash
//! # One `<table>.csv` per table, `|`-delimited
//! relgen generate --schema tpch.yaml --output-dir ./data
//!
//! # Same document, different seed and engine
//! relgen generate -s tpch.yaml -o ./data --seed 7 --algorithm RANLUX48_BASE
//!
//! # Resolve every table without writing anything
//! relgen generate -s tpch.yaml -o ./data --dry-run
//! ```
//!
//! ## Validate a schema document
//! ```bash
//! relgen validate --schema tpch.yaml
//! ```
//!
//! ## Emit load DDL
//! ```bash
//! relgen ddl --schema tpch.yaml --directory DATA_DIR > load.sql
//! ```
//!
//! Set `RUST_LOG=info` (or `debug`) for progress logs.

use anyhow::Context;
use clap::{Parser, Subcommand};
use relgen::{run_ddl, run_generate, run_validate, DdlArgs, ValidateArgs};
use relgen_populate_csv::CsvPopulateArgs;

#[derive(Parser)]
#[command(name = "relgen")]
#[command(about = "A seeded, constraint-aware generator of relational test datasets")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate one delimited flat file per table
    Generate {
        #[command(flatten)]
        args: CsvPopulateArgs,
    },

    /// Validate a schema document without generating data
    Validate {
        #[command(flatten)]
        args: ValidateArgs,
    },

    /// Print DDL that loads the generated flat files
    Ddl {
        #[command(flatten)]
        args: DdlArgs,
    },
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate { args } => {
            let summary = run_generate(&args)?;
            // Single-line JSON summary for scripts
            println!("{}", serde_json::to_string(&summary)?);
        }
        Commands::Validate { args } => {
            let tables = run_validate(&args)?;
            println!("Schema {:?} is valid ({tables} tables)", args.schema);
        }
        Commands::Ddl { args } => {
            let ddl = run_ddl(&args)?;
            match &args.output {
                Some(path) => {
                    std::fs::write(path, ddl)
                        .with_context(|| format!("Failed to write DDL to {path:?}"))?;
                }
                None => print!("{ddl}"),
            }
        }
    }

    Ok(())
}
