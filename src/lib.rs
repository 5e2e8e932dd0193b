//! relgen library
//!
//! Command runners behind the `relgen` binary. The engine itself lives in
//! the workspace crates:
//!
//! - `relgen_core` - Schema document, validation, rendering and DDL
//! - `relgen_generator` - Seeded generation engine
//! - `relgen_populate_csv` - Delimited flat file writer
//!
//! # CLI Usage
//!
//! ```bash
//! relgen validate --schema schema.yaml
//! relgen generate --schema schema.yaml --output-dir ./data
//! relgen ddl --schema schema.yaml --directory DATA_DIR
//! ```

pub mod commands;

pub use commands::ddl::{run_ddl, DdlArgs};
pub use commands::generate::{run_generate, GenerateSummary, TableSummary};
pub use commands::validate::{run_validate, ValidateArgs};
pub use commands::load_schema;
