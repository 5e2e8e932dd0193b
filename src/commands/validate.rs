//! Validate command handler.

use anyhow::Context;
use clap::Args;
use relgen_core::{validate, SchemaDocument};
use std::path::PathBuf;

/// Validate arguments.
#[derive(Args, Clone, Debug)]
pub struct ValidateArgs {
    /// Path to the schema document (YAML or JSON)
    #[arg(long, short = 's')]
    pub schema: PathBuf,
}

/// Run the validate command. Returns the number of tables on success.
pub fn run_validate(args: &ValidateArgs) -> anyhow::Result<usize> {
    let schema = SchemaDocument::from_file(&args.schema)
        .with_context(|| format!("Failed to load schema from {:?}", args.schema))?;

    if let Err(e) = validate(&schema) {
        for issue in &e.issues {
            tracing::error!("{}", issue);
        }
        return Err(e).with_context(|| format!("Schema {:?} failed validation", args.schema));
    }

    tracing::info!("Schema {:?} is valid", args.schema);
    Ok(schema.tables.len())
}
