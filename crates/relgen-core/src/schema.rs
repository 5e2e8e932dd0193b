//! Schema document definitions.
//!
//! The schema document declares the global seed, the pseudo-random
//! algorithm and an ordered list of tables. Table order is significant:
//! a table referenced by a foreign key must be declared before the table
//! that references it.
//!
//! Documents are read from YAML; since YAML is a superset of JSON, JSON
//! documents load through the same path. Files ending in `.json` are read
//! with the JSON parser directly for sharper error messages.

use crate::types::{Algorithm, Constraint, LogicalType, Skewness};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Seed used when the document does not declare one.
pub const DEFAULT_SEED: u64 = 42;

/// String length used when a STRING column does not declare one.
pub const DEFAULT_STRING_LENGTH: u16 = 10;

/// Longest STRING column accepted.
pub const MAX_STRING_LENGTH: u16 = 4000;

/// Default REAL bounds.
pub const DEFAULT_REAL_MIN: f64 = 0.0;
pub const DEFAULT_REAL_MAX: f64 = 1.0;

/// Default DATE/TIMESTAMP range.
pub const DEFAULT_RANGE_IN_YEARS: u32 = 10;

// ============================================================================
// Error Types
// ============================================================================

/// Error type for schema operations.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// Error reading schema file
    #[error("Failed to read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error parsing YAML
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Error parsing JSON
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Table not found in schema
    #[error("Table not found: {0}")]
    TableNotFound(String),

    /// Column not found in table schema
    #[error("Column '{column}' not found in table '{table}'")]
    ColumnNotFound { table: String, column: String },

    /// Error rendering generated text
    #[error("Failed to render: {0}")]
    Render(#[from] std::fmt::Error),

    /// Reference chain does not end at a typed column
    #[error("Cannot resolve type of column '{column}' in table '{table}'")]
    UnresolvedType { table: String, column: String },
}

// ============================================================================
// Document Types
// ============================================================================

fn default_seed() -> u64 {
    DEFAULT_SEED
}

/// A column declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ColumnDocument {
    /// Column name
    #[serde(rename = "column_name", alias = "name")]
    pub name: String,

    /// Declared logical type; key columns may inherit it from their reference
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub column_type: Option<LogicalType>,

    /// Distinct-value target: fraction of rows (< 1), unique (1) or absolute count (> 1)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cardinality: Option<f64>,

    /// Access-pattern skew
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skewness: Option<Skewness>,

    /// Key constraint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraint: Option<Constraint>,

    /// Referenced table (FK family)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_tab: Option<String>,

    /// Referenced column (FK family)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ref_col: Option<String>,

    /// STRING length
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub length: Option<u16>,

    /// STRING length varies in `[6, length]`
    #[serde(default)]
    pub var_length: bool,

    /// REAL lower bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_min: Option<f64>,

    /// REAL upper bound
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub real_max: Option<f64>,

    /// DATE/TIMESTAMP reference instant
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// DATE/TIMESTAMP span after `start_date`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_in_years: Option<u32>,
}

impl ColumnDocument {
    /// Create a column with only a name and a type.
    pub fn new(name: impl Into<String>, column_type: LogicalType) -> Self {
        Self {
            name: name.into(),
            column_type: Some(column_type),
            cardinality: None,
            skewness: None,
            constraint: None,
            ref_tab: None,
            ref_col: None,
            length: None,
            var_length: false,
            real_min: None,
            real_max: None,
            start_date: None,
            range_in_years: None,
        }
    }

    /// The `(ref_tab, ref_col)` pair, when both are present.
    pub fn reference(&self) -> Option<(&str, &str)> {
        match (&self.ref_tab, &self.ref_col) {
            (Some(table), Some(column)) => Some((table.as_str(), column.as_str())),
            _ => None,
        }
    }

    pub fn string_length(&self) -> u16 {
        self.length.unwrap_or(DEFAULT_STRING_LENGTH)
    }

    pub fn skew(&self) -> Skewness {
        self.skewness.unwrap_or_default()
    }

    pub fn real_bounds(&self) -> (f64, f64) {
        (
            self.real_min.unwrap_or(DEFAULT_REAL_MIN),
            self.real_max.unwrap_or(DEFAULT_REAL_MAX),
        )
    }

    pub fn years(&self) -> u32 {
        self.range_in_years.unwrap_or(DEFAULT_RANGE_IN_YEARS)
    }
}

/// A table declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableDocument {
    /// Table name
    #[serde(rename = "table_name", alias = "name")]
    pub name: String,

    /// Requested number of rows
    pub row_count: u64,

    /// Columns in output order
    pub columns: Vec<ColumnDocument>,
}

impl TableDocument {
    /// Get a column by name.
    pub fn get_column(&self, name: &str) -> Option<&ColumnDocument> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Get all column names in declaration order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Full schema document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaDocument {
    /// Global seed
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Pseudo-random algorithm
    #[serde(default, alias = "prng")]
    pub algorithm: Algorithm,

    /// Tables in declaration order
    pub tables: Vec<TableDocument>,

    /// Cached table lookup (not serialized)
    #[serde(skip)]
    table_map: HashMap<String, usize>,
}

impl SchemaDocument {
    /// Create a document from tables, with the default seed and algorithm.
    pub fn new(tables: Vec<TableDocument>) -> Self {
        let mut schema = Self {
            seed: DEFAULT_SEED,
            algorithm: Algorithm::default(),
            tables,
            table_map: HashMap::new(),
        };
        schema.build_table_map();
        schema
    }

    /// Load a schema document from a file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json(&content),
            _ => Self::from_yaml(&content),
        }
    }

    /// Parse a schema document from a YAML (or JSON) string.
    pub fn from_yaml(yaml: &str) -> Result<Self, SchemaError> {
        let mut schema: SchemaDocument = serde_yaml::from_str(yaml)?;
        schema.build_table_map();
        Ok(schema)
    }

    /// Parse a schema document from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        let mut schema: SchemaDocument = serde_json::from_str(json)?;
        schema.build_table_map();
        Ok(schema)
    }

    /// Replace the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Replace the algorithm.
    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Build the internal table lookup map.
    fn build_table_map(&mut self) {
        self.table_map = self
            .tables
            .iter()
            .enumerate()
            .map(|(idx, table)| (table.name.clone(), idx))
            .collect();
    }

    /// Get a table by name.
    pub fn get_table(&self, name: &str) -> Option<&TableDocument> {
        self.table_map
            .get(name)
            .and_then(|&idx| self.tables.get(idx))
    }

    /// Position of a table in declaration order.
    pub fn table_position(&self, name: &str) -> Option<usize> {
        self.table_map.get(name).copied()
    }

    /// Get a column of a table.
    pub fn get_column(&self, table: &str, column: &str) -> Result<&ColumnDocument, SchemaError> {
        let table_doc = self
            .get_table(table)
            .ok_or_else(|| SchemaError::TableNotFound(table.to_string()))?;

        table_doc
            .get_column(column)
            .ok_or_else(|| SchemaError::ColumnNotFound {
                table: table.to_string(),
                column: column.to_string(),
            })
    }

    /// Resolve the column a key column ultimately takes its type from.
    ///
    /// Follows `ref_tab`/`ref_col` until a column with a declared type is
    /// found. Key columns without a type and without a reference are INT.
    pub fn resolve_type_source(
        &self,
        table: &str,
        column: &str,
    ) -> Result<&ColumnDocument, SchemaError> {
        let mut current = self.get_column(table, column)?;
        // A chain longer than the table count must contain a cycle.
        for _ in 0..=self.tables.len() {
            if current.column_type.is_some() {
                return Ok(current);
            }
            match current.reference() {
                Some((ref_tab, ref_col)) => current = self.get_column(ref_tab, ref_col)?,
                None => return Ok(current),
            }
        }
        Err(SchemaError::UnresolvedType {
            table: table.to_string(),
            column: column.to_string(),
        })
    }

    /// Resolved logical type of a column (INT when nothing is declared).
    pub fn resolve_type(&self, table: &str, column: &str) -> Result<LogicalType, SchemaError> {
        Ok(self
            .resolve_type_source(table, column)?
            .column_type
            .unwrap_or(LogicalType::Int))
    }

    /// Get all table names in declaration order.
    pub fn table_names(&self) -> Vec<&str> {
        self.tables.iter().map(|t| t.name.as_str()).collect()
    }
}
