//! Column generator strategies.
//!
//! Each column of a table is driven by one [`ColumnGenerator`], which yields
//! the column's value for the next row. Columns are evaluated in declaration
//! order against the table's shared [`RandomSource`]; that order is part of
//! the output contract.

pub mod composite;
pub mod numeric;
pub mod text;
pub mod timestamp;

use crate::distributions::DistributionError;
use crate::random::RandomSource;
use composite::{CompositeColumn, CompositeFkGroup, CompositePkStream};
use numeric::{KeyColumn, RealColumn};
use relgen_core::GeneratedValue;
use text::TextColumn;
use timestamp::TemporalColumn;

/// Per-table state shared by the columns of a row.
#[derive(Debug, Clone, Default)]
pub struct RowContext {
    /// Zero-based index of the row being generated
    pub row: u64,
    /// Scalar stream of the table's composite primary key
    pub primary: Option<CompositePkStream>,
    /// Composite foreign keys, one group per referenced table
    pub foreign: Vec<CompositeFkGroup>,
}

/// Strategy producing one column's values.
#[derive(Debug, Clone)]
pub enum ColumnGenerator {
    /// INT: normal, PK, FK and FK_UNIQUE
    Int(KeyColumn),
    /// STRING: normal, PK, FK and FK_UNIQUE
    Text(TextColumn),
    Real(RealColumn),
    /// DATE and TIMESTAMP
    Temporal(TemporalColumn),
    /// COMP_PK and COMP_FK, INT or STRING
    Composite(CompositeColumn),
}

impl ColumnGenerator {
    /// Yield the value of the current row.
    pub fn next_value(
        &mut self,
        source: &mut RandomSource,
        context: &mut RowContext,
    ) -> Result<GeneratedValue, DistributionError> {
        match self {
            ColumnGenerator::Int(column) => column.next_key(source).map(GeneratedValue::Int),
            ColumnGenerator::Text(column) => column.next_text(source).map(GeneratedValue::Text),
            ColumnGenerator::Real(column) => column.next_real(source).map(GeneratedValue::Real),
            ColumnGenerator::Temporal(column) => column.next_value(source),
            ColumnGenerator::Composite(column) => column.next_value(source, context),
        }
    }

    /// Short strategy name, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ColumnGenerator::Int(_) => "int",
            ColumnGenerator::Text(_) => "text",
            ColumnGenerator::Real(_) => "real",
            ColumnGenerator::Temporal(_) => "temporal",
            ColumnGenerator::Composite(_) => "composite",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relgen_core::Algorithm;

    #[test]
    fn test_values_follow_column_kind() {
        let mut source = RandomSource::new(Algorithm::Mt19937_64, 42);
        let mut context = RowContext::default();
        let mut columns = vec![
            ColumnGenerator::Int(KeyColumn::unique()),
            ColumnGenerator::Real(RealColumn::new(0.0, 1.0).unwrap()),
        ];

        let values: Vec<GeneratedValue> = columns
            .iter_mut()
            .map(|c| c.next_value(&mut source, &mut context).unwrap())
            .collect();
        assert_eq!(values[0], GeneratedValue::Int(1));
        assert!(matches!(values[1], GeneratedValue::Real(_)));
        assert_eq!(columns[1].kind(), "real");
    }
}
