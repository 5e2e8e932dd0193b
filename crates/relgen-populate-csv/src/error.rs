//! Error types for the flat file populator.

use relgen_core::SchemaError;
use relgen_generator::GeneratorError;
use thiserror::Error;

/// Errors that can occur while writing flat files.
#[derive(Error, Debug)]
pub enum PopulateError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Schema document could not be loaded.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Generation failed.
    #[error("Generator error: {0}")]
    Generator(#[from] GeneratorError),

    /// Table not found in schema.
    #[error("Table '{0}' not found in schema")]
    TableNotFound(String),

    /// Delimiter could appear inside a value, or is not printable ASCII.
    #[error("Invalid delimiter {0:?}: use a printable ASCII character that cannot appear in values, such as '|' or ';'")]
    InvalidDelimiter(char),
}
