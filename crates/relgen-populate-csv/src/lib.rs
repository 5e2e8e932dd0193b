//! Delimited flat file populator for relgen.
//!
//! Writes one `<table>.csv` file per table of a schema document, using the
//! relgen-generator crate for the rows.
//!
//! # Example
//!
//! ```ignore
//! use relgen_core::SchemaDocument;
//! use relgen_populate_csv::FlatFilePopulator;
//!
//! let schema = SchemaDocument::from_file("path/to/schema.yaml")?;
//! let populator = FlatFilePopulator::new(schema)?.with_header(true);
//!
//! for report in populator.populate("/path/to/output")? {
//!     println!("{}: {} rows", report.table, report.row_count);
//! }
//! ```

pub mod args;
mod error;
mod populator;

pub use args::{CommonGenerateArgs, CsvPopulateArgs};
pub use error::PopulateError;
pub use populator::{FlatFilePopulator, PopulateMetrics, TableReport, DEFAULT_DELIMITER};
