//! DDL command handler.

use anyhow::Context;
use clap::Args;
use relgen_core::{is_valid_delimiter, validate, OracleExternalDdl, SchemaDocument};
use std::path::PathBuf;

/// DDL arguments.
#[derive(Args, Clone, Debug)]
pub struct DdlArgs {
    /// Path to the schema document (YAML or JSON)
    #[arg(long, short = 's')]
    pub schema: PathBuf,

    /// Oracle directory object holding the flat files
    #[arg(long, default_value = "<ora_dir>")]
    pub directory: String,

    /// Field delimiter the flat files were written with
    #[arg(long, default_value = "|")]
    pub delimiter: char,

    /// Write the DDL to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Run the ddl command, returning the DDL text.
pub fn run_ddl(args: &DdlArgs) -> anyhow::Result<String> {
    let schema = SchemaDocument::from_file(&args.schema)
        .with_context(|| format!("Failed to load schema from {:?}", args.schema))?;
    validate(&schema).context("Refusing to emit DDL for an invalid schema")?;
    if !is_valid_delimiter(args.delimiter) {
        anyhow::bail!(
            "Invalid delimiter {:?}: it can appear inside generated values",
            args.delimiter
        );
    }

    OracleExternalDdl::new(args.directory.clone())
        .with_delimiter(args.delimiter)
        .render(&schema)
        .context("Failed to render DDL")
}
