//! Generate command handler.

use super::load_schema;
use anyhow::Context;
use relgen_populate_csv::{CsvPopulateArgs, FlatFilePopulator, TableReport};
use serde::Serialize;
use std::path::PathBuf;

/// Summary of a generate run, printed as JSON.
#[derive(Debug, Clone, Serialize)]
pub struct GenerateSummary {
    pub seed: u64,
    pub algorithm: String,
    pub dry_run: bool,
    pub tables: Vec<TableSummary>,
    pub total_rows: u64,
    pub total_bytes: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableSummary {
    pub table: String,
    pub row_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows_written: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size_bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl From<TableReport> for TableSummary {
    fn from(report: TableReport) -> Self {
        Self {
            table: report.table,
            row_count: report.row_count,
            path: report.path,
            rows_written: report.metrics.as_ref().map(|m| m.rows_written),
            file_size_bytes: report.metrics.as_ref().map(|m| m.file_size_bytes),
            duration_ms: report
                .metrics
                .as_ref()
                .map(|m| m.total_duration.as_millis() as u64),
        }
    }
}

/// Run the generate command.
pub fn run_generate(args: &CsvPopulateArgs) -> anyhow::Result<GenerateSummary> {
    let schema = load_schema(&args.common)?;
    let seed = schema.seed;
    let algorithm = schema.algorithm.to_string();

    let populator = FlatFilePopulator::new(schema)
        .with_context(|| format!("Schema {:?} cannot be generated", args.common.schema))?
        .with_delimiter(args.delimiter)?
        .with_header(args.header)
        .with_tables(args.tables.clone())?;

    let reports = if args.dry_run {
        tracing::info!("[DRY-RUN] Output directory: {:?}", args.output_dir);
        populator.dry_run()?
    } else {
        populator
            .populate(&args.output_dir)
            .with_context(|| format!("Failed to generate data into {:?}", args.output_dir))?
    };

    let tables: Vec<TableSummary> = reports.into_iter().map(TableSummary::from).collect();
    let total_rows = tables.iter().filter_map(|t| t.rows_written).sum();
    let total_bytes = tables.iter().filter_map(|t| t.file_size_bytes).sum();

    tracing::info!(
        "Generated {} rows ({} bytes) across {} tables",
        total_rows,
        total_bytes,
        tables.len()
    );

    Ok(GenerateSummary {
        seed,
        algorithm,
        dry_run: args.dry_run,
        tables,
        total_rows,
        total_bytes,
    })
}
