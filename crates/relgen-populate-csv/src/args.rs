//! CLI argument definitions for the flat file populator.

use clap::Args;
use relgen_core::Algorithm;
use std::path::PathBuf;

/// Arguments shared by every command that reads a schema document.
#[derive(Args, Clone, Debug)]
pub struct CommonGenerateArgs {
    /// Path to the schema document (YAML or JSON)
    #[arg(long, short = 's')]
    pub schema: PathBuf,

    /// Override the document's seed (same seed = same data)
    #[arg(long, env = "RELGEN_SEED")]
    pub seed: Option<u64>,

    /// Override the document's pseudo-random algorithm (e.g. MT19937_64, RANLUX48_BASE)
    #[arg(long, env = "RELGEN_ALGORITHM")]
    pub algorithm: Option<Algorithm>,
}

/// Flat file populate arguments.
#[derive(Args, Clone, Debug)]
pub struct CsvPopulateArgs {
    /// Output directory for the flat files (one `<table>.csv` per table)
    #[arg(long, short = 'o')]
    pub output_dir: PathBuf,

    /// Field delimiter: a printable ASCII character that cannot occur in values (e.g. `|`, `;`, `~`)
    #[arg(long, default_value = "|")]
    pub delimiter: char,

    /// Write a header line with the column names
    #[arg(long)]
    pub header: bool,

    /// Specific tables to write (comma-separated, empty = all tables)
    #[arg(long, value_delimiter = ',')]
    pub tables: Vec<String>,

    /// Dry-run mode: validate and resolve every table without writing files
    #[arg(long)]
    pub dry_run: bool,

    #[command(flatten)]
    pub common: CommonGenerateArgs,
}
