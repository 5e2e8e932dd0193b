//! Flat file populator implementation.

use crate::error::PopulateError;
use csv::{QuoteStyle, Terminator, WriterBuilder};
use relgen_core::{is_valid_delimiter, SchemaDocument};
use relgen_generator::{DataGenerator, TableGenerator};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Default buffer size for file writes.
const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Field delimiter of the generated flat files.
pub const DEFAULT_DELIMITER: char = '|';

/// Metrics from a table write.
#[derive(Debug, Clone, Default)]
pub struct PopulateMetrics {
    /// Number of rows written.
    pub rows_written: u64,
    /// Total time taken.
    pub total_duration: Duration,
    /// Time spent generating data.
    pub generation_duration: Duration,
    /// Time spent writing to file.
    pub write_duration: Duration,
    /// File size in bytes.
    pub file_size_bytes: u64,
}

impl PopulateMetrics {
    /// Calculate rows per second.
    pub fn rows_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.rows_written as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }

    /// Calculate bytes per second.
    pub fn bytes_per_second(&self) -> f64 {
        if self.total_duration.as_secs_f64() > 0.0 {
            self.file_size_bytes as f64 / self.total_duration.as_secs_f64()
        } else {
            0.0
        }
    }
}

/// Outcome for one table of the schema.
#[derive(Debug, Clone)]
pub struct TableReport {
    pub table: String,
    /// Effective row count after FK_UNIQUE capping
    pub row_count: u64,
    pub columns: Vec<String>,
    /// `None` for tables skipped by the table filter or in dry-run mode
    pub path: Option<PathBuf>,
    pub metrics: Option<PopulateMetrics>,
}

/// Writes every table of a schema document as a delimited flat file.
pub struct FlatFilePopulator {
    generator: DataGenerator,
    delimiter: u8,
    include_header: bool,
    tables: Vec<String>,
}

impl FlatFilePopulator {
    /// Create a populator for a schema document. The document is validated
    /// here, before any file is touched.
    pub fn new(schema: SchemaDocument) -> Result<Self, PopulateError> {
        Ok(Self {
            generator: DataGenerator::new(schema)?,
            delimiter: DEFAULT_DELIMITER as u8,
            include_header: false,
            tables: Vec::new(),
        })
    }

    /// Set the field delimiter. Values are never quoted, so the delimiter
    /// must be a printable ASCII character that no value can contain.
    pub fn with_delimiter(mut self, delimiter: char) -> Result<Self, PopulateError> {
        if !is_valid_delimiter(delimiter) {
            return Err(PopulateError::InvalidDelimiter(delimiter));
        }
        self.delimiter = delimiter as u8;
        Ok(self)
    }

    /// Set whether to include a header row.
    pub fn with_header(mut self, include_header: bool) -> Self {
        self.include_header = include_header;
        self
    }

    /// Restrict the written tables. Every table is still resolved so that
    /// references into skipped tables keep working; skipping a table does
    /// not change the rows of the others.
    pub fn with_tables(mut self, tables: Vec<String>) -> Result<Self, PopulateError> {
        for table in &tables {
            if self.generator.document().get_table(table).is_none() {
                return Err(PopulateError::TableNotFound(table.clone()));
            }
        }
        self.tables = tables;
        Ok(self)
    }

    fn selected(&self, table: &str) -> bool {
        self.tables.is_empty() || self.tables.iter().any(|t| t == table)
    }

    /// Generate every table in declaration order and write `<table>.csv`
    /// files into `output_dir`.
    pub fn populate<P: AsRef<Path>>(
        mut self,
        output_dir: P,
    ) -> Result<Vec<TableReport>, PopulateError> {
        let output_dir = output_dir.as_ref();
        fs::create_dir_all(output_dir)?;

        info!(
            "Populating {} tables into {} (seed {}, algorithm {})",
            self.generator.document().tables.len(),
            output_dir.display(),
            self.generator.seed(),
            self.generator.algorithm()
        );

        let mut reports = Vec::new();
        while let Some(table) = self.generator.next_table() {
            let mut table = table?;
            let name = table.name().to_string();

            if !self.selected(&name) {
                debug!("Skipping table '{}'", name);
                reports.push(report(&table, None, None));
                continue;
            }

            let path = output_dir.join(format!("{name}.csv"));
            let metrics = self.populate_table(&mut table, &path)?;
            reports.push(report(&table, Some(path), Some(metrics)));
        }

        Ok(reports)
    }

    /// Resolve every table without drawing a row.
    pub fn dry_run(mut self) -> Result<Vec<TableReport>, PopulateError> {
        let mut reports = Vec::new();
        while let Some(table) = self.generator.next_table() {
            let table = table?;
            info!(
                "[DRY-RUN] Would write {} rows to {}.csv",
                table.row_count(),
                table.name()
            );
            reports.push(report(&table, None, None));
        }
        Ok(reports)
    }

    fn populate_table(
        &self,
        table: &mut TableGenerator,
        path: &Path,
    ) -> Result<PopulateMetrics, PopulateError> {
        let start_time = Instant::now();
        let mut generation_duration = Duration::ZERO;
        let mut write_duration = Duration::ZERO;

        info!(
            "Writing {} rows to '{}' at {}",
            table.row_count(),
            table.name(),
            path.display()
        );

        let file = File::create(path)?;
        let buf_writer = BufWriter::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .has_headers(false)
            .from_writer(buf_writer);

        if self.include_header {
            writer.write_record(table.column_names())?;
        }

        let mut rows_written = 0u64;
        loop {
            let gen_start = Instant::now();
            let Some(row) = table.next_row() else {
                break;
            };
            let fields = row?.render();
            generation_duration += gen_start.elapsed();

            let write_start = Instant::now();
            writer.write_record(&fields)?;
            write_duration += write_start.elapsed();

            rows_written += 1;
            if rows_written % 10000 == 0 {
                debug!("Progress: {}/{} rows", rows_written, table.row_count());
            }
        }

        let flush_start = Instant::now();
        writer.flush()?;
        write_duration += flush_start.elapsed();
        drop(writer);

        let file_size_bytes = fs::metadata(path)?.len();
        let total_duration = start_time.elapsed();

        let metrics = PopulateMetrics {
            rows_written,
            total_duration,
            generation_duration,
            write_duration,
            file_size_bytes,
        };

        info!(
            "Wrote {} rows to '{}' in {:?} ({:.2} rows/sec, {} bytes)",
            metrics.rows_written,
            table.name(),
            metrics.total_duration,
            metrics.rows_per_second(),
            metrics.file_size_bytes
        );

        Ok(metrics)
    }
}

fn report(
    table: &TableGenerator,
    path: Option<PathBuf>,
    metrics: Option<PopulateMetrics>,
) -> TableReport {
    TableReport {
        table: table.name().to_string(),
        row_count: table.row_count(),
        columns: table.column_names().to_vec(),
        path,
        metrics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SCHEMA: &str = r#"
seed: 42
algorithm: MT19937_64
tables:
  - table_name: region
    row_count: 5
    columns:
      - column_name: r_id
        type: INT
        constraint: PK
      - column_name: r_name
        type: STRING
        length: 12
        cardinality: 1
  - table_name: orders
    row_count: 40
    columns:
      - column_name: o_id
        type: INT
        constraint: PK
      - column_name: o_region
        constraint: FK
        ref_tab: region
        ref_col: r_id
      - column_name: o_total
        type: REAL
        real_min: 1.0
        real_max: 10.0
      - column_name: o_note
        type: STRING
        length: 30
        cardinality: 0.5
      - column_name: o_placed
        type: TIMESTAMP
"#;

    fn populator() -> FlatFilePopulator {
        FlatFilePopulator::new(SchemaDocument::from_yaml(SCHEMA).unwrap()).unwrap()
    }

    #[test]
    fn test_populate_metrics() {
        let metrics = PopulateMetrics {
            rows_written: 1000,
            total_duration: Duration::from_secs(2),
            generation_duration: Duration::from_millis(500),
            write_duration: Duration::from_millis(1500),
            file_size_bytes: 50000,
        };

        assert_eq!(metrics.rows_per_second(), 500.0);
        assert_eq!(metrics.bytes_per_second(), 25000.0);
        assert_eq!(PopulateMetrics::default().rows_per_second(), 0.0);
    }

    #[test]
    fn test_populate_writes_every_table() {
        let temp_dir = TempDir::new().unwrap();
        let reports = populator().populate(temp_dir.path()).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[1].metrics.as_ref().unwrap().rows_written, 40);

        let region = fs::read_to_string(temp_dir.path().join("region.csv")).unwrap();
        let lines: Vec<&str> = region.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("1|"));

        let orders = fs::read_to_string(temp_dir.path().join("orders.csv")).unwrap();
        for line in orders.lines() {
            let fields: Vec<&str> = line.split('|').collect();
            assert_eq!(fields.len(), 5);
            let region: u64 = fields[1].parse().unwrap();
            assert!((1..=5).contains(&region));
        }
    }

    #[test]
    fn test_populate_with_header_and_delimiter() {
        let temp_dir = TempDir::new().unwrap();
        populator()
            .with_header(true)
            .with_delimiter(';')
            .unwrap()
            .populate(temp_dir.path())
            .unwrap();

        let content = fs::read_to_string(temp_dir.path().join("orders.csv")).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "o_id;o_region;o_total;o_note;o_placed");
        assert_eq!(lines.len(), 41);
        // Strings and timestamps never split a row.
        for line in &lines[1..] {
            assert_eq!(line.split(';').count(), 5, "{line}");
        }
    }

    #[test]
    fn test_invalid_delimiter() {
        for delimiter in ['§', ',', '.', '-', '#', '\'', '?', '!', 'x', ':', ' ', '\t', '"'] {
            assert!(
                matches!(
                    populator().with_delimiter(delimiter),
                    Err(PopulateError::InvalidDelimiter(c)) if c == delimiter
                ),
                "{delimiter:?} accepted"
            );
        }
    }

    #[test]
    fn test_table_filter() {
        let temp_dir = TempDir::new().unwrap();
        let reports = populator()
            .with_tables(vec!["orders".to_string()])
            .unwrap()
            .populate(temp_dir.path())
            .unwrap();

        assert!(reports[0].path.is_none());
        assert!(!temp_dir.path().join("region.csv").exists());
        assert!(temp_dir.path().join("orders.csv").exists());

        // Skipping a table leaves the others unchanged.
        let full_dir = TempDir::new().unwrap();
        populator().populate(full_dir.path()).unwrap();
        assert_eq!(
            fs::read(temp_dir.path().join("orders.csv")).unwrap(),
            fs::read(full_dir.path().join("orders.csv")).unwrap()
        );

        assert!(matches!(
            populator().with_tables(vec!["missing".to_string()]),
            Err(PopulateError::TableNotFound(_))
        ));
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let reports = populator().dry_run().unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].row_count, 5);
        assert_eq!(
            reports[1].columns,
            vec!["o_id", "o_region", "o_total", "o_note", "o_placed"]
        );
        assert!(reports.iter().all(|r| r.metrics.is_none()));
    }

    #[test]
    fn test_deterministic_output() {
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        populator().populate(first.path()).unwrap();
        populator().populate(second.path()).unwrap();

        for table in ["region", "orders"] {
            let file = format!("{table}.csv");
            assert_eq!(
                fs::read(first.path().join(&file)).unwrap(),
                fs::read(second.path().join(&file)).unwrap()
            );
        }
    }
}
