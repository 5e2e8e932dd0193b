//! Resolved metadata of the tables generated so far.
//!
//! The orchestrator resolves every table once, in declaration order, and
//! records the result here: the final row count, each column's effective
//! type and string format, and the composite key layout. Later tables read
//! this metadata to wire their foreign keys; nothing mutates an entry once
//! it is inserted.

use crate::strings::KeyFormat;
use relgen_core::{Constraint, LogicalType};
use std::collections::HashMap;

/// Mixed-radix decode parameters of one composite key column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeDigit {
    /// Repeat window (`modulus` of the digit)
    pub window: u64,
    /// Group size (place value of the digit)
    pub group: u64,
}

impl CompositeDigit {
    /// Number of distinct values of this digit.
    pub fn range(&self) -> u64 {
        self.window / self.group
    }

    /// Extract this column's digit, in `[1, window / group]`, from a scalar.
    pub fn decode(&self, scalar: u64) -> u64 {
        let t = match scalar % self.window {
            0 => self.window,
            t => t,
        };
        t / self.group + u64::from(t % self.group != 0)
    }
}

/// How a composite primary key's scalar stream is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarStream {
    /// Distinct sorted sample of `rows` values from `[1, size]`
    Distinct,
    /// `1, 2, ..., rows`
    Sequential,
}

/// Domain of a table's composite primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeDomain {
    /// Number of distinct tuples (`max`)
    pub size: u64,
    /// Number of tuples emitted, one per row
    pub rows: u64,
    pub stream: ScalarStream,
}

impl CompositeDomain {
    /// Pick the stream for `requested` rows over a domain of `size` tuples.
    ///
    /// Distinct sampling is used unless the request covers at least three
    /// times the domain; either way at most `size` rows are emitted.
    pub fn choose(requested: u64, size: u64) -> Self {
        let stream = if u128::from(requested) < 3 * u128::from(size) {
            ScalarStream::Distinct
        } else {
            ScalarStream::Sequential
        };
        Self {
            size,
            rows: requested.min(size),
            stream,
        }
    }
}

/// A resolved column.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnMeta {
    pub name: String,
    /// Effective type (inherited from the referenced column for keys)
    pub logical_type: LogicalType,
    pub constraint: Option<Constraint>,
    /// String rendering of keys; referencing columns copy their target's
    pub key_format: KeyFormat,
    /// Set for COMP_PK columns
    pub digit: Option<CompositeDigit>,
}

/// A resolved table.
#[derive(Debug, Clone, PartialEq)]
pub struct TableMeta {
    pub name: String,
    /// Row count declared in the document
    pub requested_rows: u64,
    /// Row count after FK_UNIQUE and composite caps
    pub row_count: u64,
    pub columns: Vec<ColumnMeta>,
    pub composite: Option<CompositeDomain>,
}

impl TableMeta {
    pub fn column(&self, name: &str) -> Option<&ColumnMeta> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }
}

/// Arena of resolved tables, in resolution order.
#[derive(Debug, Default)]
pub struct SchemaModel {
    tables: Vec<TableMeta>,
    positions: HashMap<String, usize>,
}

impl SchemaModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolved table. A table resolved twice keeps its first entry.
    pub fn insert(&mut self, table: TableMeta) -> &TableMeta {
        let position = match self.positions.get(&table.name) {
            Some(&position) => position,
            None => {
                let position = self.tables.len();
                self.positions.insert(table.name.clone(), position);
                self.tables.push(table);
                position
            }
        };
        &self.tables[position]
    }

    pub fn get(&self, name: &str) -> Option<&TableMeta> {
        self.positions.get(name).map(|&position| &self.tables[position])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.positions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableMeta> {
        self.tables.iter()
    }
}
