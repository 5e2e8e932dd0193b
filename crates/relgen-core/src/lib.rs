//! Core types for the relgen data generator.
//!
//! This crate provides the foundational types shared by the generation
//! engine and the populators:
//!
//! - [`SchemaDocument`] - Tables and columns loaded from YAML or JSON
//! - [`LogicalType`], [`Constraint`], [`Skewness`], [`Algorithm`] - Schema keywords
//! - [`GeneratedValue`], [`GeneratedRow`] - Generated data and its canonical rendering
//! - [`validate`] - Structural validation run before any generation
//! - [`keys`] - String alphabet, key capacity and delimiter rules
//! - [`OracleExternalDdl`] - DDL to load generated flat files
//!
//! # Architecture
//!
//! ```text
//! relgen-core (this crate)
//!    │
//!    ├─── relgen-generator     (engine; depends on relgen-core for the schema)
//!    │
//!    └─── relgen-populate-csv  (writes GeneratedRow values to flat files)
//! ```
//!
//! # Example
//!
//! ```rust
//! use relgen_core::{validate, SchemaDocument};
//!
//! let schema = SchemaDocument::from_yaml(r#"
//! seed: 42
//! tables:
//!   - table_name: users
//!     row_count: 10
//!     columns:
//!       - column_name: id
//!         type: INT
//!         constraint: PK
//! "#).unwrap();
//!
//! assert!(validate(&schema).is_ok());
//! ```

pub mod ddl;
pub mod keys;
pub mod schema;
pub mod types;
pub mod validate;
pub mod values;

// Re-exports for convenience
pub use ddl::{DdlColumnType, OracleExternalDdl, ToDdl};
pub use keys::{is_valid_delimiter, STRING_ALPHABET};
pub use schema::{ColumnDocument, SchemaDocument, SchemaError, TableDocument};
pub use types::{Algorithm, Constraint, KeywordError, LogicalType, Skewness};
pub use validate::{collect_issues, validate, ValidationError, ValidationIssue};
pub use values::{GeneratedRow, GeneratedValue};
