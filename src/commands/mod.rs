//! Command handlers.
//!
//! This module contains handlers for the generate, validate and ddl commands.

pub mod ddl;
pub mod generate;
pub mod validate;

use anyhow::Context;
use relgen_core::SchemaDocument;
use relgen_populate_csv::CommonGenerateArgs;

/// Load the schema document and apply the CLI overrides on top of it.
pub fn load_schema(args: &CommonGenerateArgs) -> anyhow::Result<SchemaDocument> {
    let mut schema = SchemaDocument::from_file(&args.schema)
        .with_context(|| format!("Failed to load schema from {:?}", args.schema))?;

    if let Some(seed) = args.seed {
        tracing::debug!("Seed overridden: {} -> {}", schema.seed, seed);
        schema = schema.with_seed(seed);
    }
    if let Some(algorithm) = args.algorithm {
        tracing::debug!("Algorithm overridden: {} -> {}", schema.algorithm, algorithm);
        schema = schema.with_algorithm(algorithm);
    }

    Ok(schema)
}
