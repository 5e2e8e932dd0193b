//! Seeded, constraint-aware generation of relational test data.
//!
//! This crate turns a validated [`relgen_core::SchemaDocument`] into rows.
//! Output is fully determined by the document: its seed, its algorithm and
//! the declaration order of its tables and columns.
//!
//! - [`random`] - Seedable engines behind one [`RandomSource`]
//! - [`distributions`] - Sequential, uniform, Zipfian and distinct sampling
//! - [`strings`] - Deterministic strings from integer keys
//! - [`generators`] - One strategy per column kind, including composite keys
//! - [`DataGenerator`] - Resolves tables in declaration order and yields rows
//!
//! # Example
//!
//! ```rust
//! use relgen_core::SchemaDocument;
//! use relgen_generator::DataGenerator;
//!
//! let schema = SchemaDocument::from_yaml(r#"
//! seed: 7
//! tables:
//!   - table_name: customers
//!     row_count: 3
//!     columns:
//!       - column_name: id
//!         type: INT
//!         constraint: PK
//! "#).unwrap();
//!
//! let mut generator = DataGenerator::new(schema).unwrap();
//! let mut customers = generator.next_table().unwrap().unwrap();
//! let ids: Vec<String> = customers
//!     .rows()
//!     .map(|row| row.unwrap().render().join("|"))
//!     .collect();
//! assert_eq!(ids, vec!["1", "2", "3"]);
//! ```

pub mod distributions;
pub mod generator;
pub mod generators;
pub mod model;
pub mod random;
pub mod strings;

// Re-exports for convenience
pub use distributions::{Distribution, DistributionError, KeyDistribution};
pub use generator::{DataGenerator, GeneratorError, TableGenerator, TableRows};
pub use generators::{ColumnGenerator, RowContext};
pub use model::{ColumnMeta, CompositeDigit, CompositeDomain, SchemaModel, TableMeta};
pub use random::RandomSource;
pub use strings::{KeyFormat, StringSynthesizer};
