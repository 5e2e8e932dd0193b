//! Generation orchestrator.
//!
//! [`DataGenerator`] walks the schema's tables in declaration order. For
//! each table it resolves the final row count, lays out composite keys,
//! builds one strategy per column and records the resolved metadata so
//! later tables can reference it. The resulting [`TableGenerator`] then
//! yields the table's rows.

use crate::distributions::DistributionError;
use crate::generators::composite::{
    independent_layout, referenced_layout, replay_scalars, CompositeColumn, CompositeFkGroup,
    CompositePkStream, ScalarSlot,
};
use crate::generators::numeric::{KeyColumn, RealColumn};
use crate::generators::text::{memo_warranted, TextColumn};
use crate::generators::timestamp::{TemporalColumn, TemporalKind};
use crate::generators::{ColumnGenerator, RowContext};
use crate::model::{ColumnMeta, CompositeDigit, CompositeDomain, SchemaModel, TableMeta};
use crate::random::RandomSource;
use crate::strings::{KeyFormat, StringSynthesizer};
use relgen_core::values::{parse_instant, unix_epoch};
use relgen_core::{
    validate, Algorithm, ColumnDocument, Constraint, GeneratedRow, LogicalType, SchemaDocument,
    TableDocument, ValidationError,
};
use tracing::{debug, info, warn};

/// Error type for generator operations.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    /// The schema failed validation; nothing was generated
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A referenced table has not been generated yet
    #[error("Table '{table}' references table '{referenced}', which must be declared before it")]
    Resolution { table: String, referenced: String },

    /// A referenced column does not exist
    #[error("Column '{column}' not found in table '{table}'")]
    UnknownColumn { table: String, column: String },

    /// A column cannot be turned into a strategy
    #[error("Invalid column '{table}.{column}': {reason}")]
    InvalidColumn {
        table: String,
        column: String,
        reason: String,
    },

    /// The composite key domain does not fit in 64 bits
    #[error("Composite key domain of table '{table}' overflows 64 bits")]
    DomainOverflow { table: String },

    /// A distribution failed while preparing or generating a table
    #[error("Table '{table}': {source}")]
    Distribution {
        table: String,
        source: DistributionError,
    },
}

/// Produces the tables of a schema document, in declaration order.
///
/// Every table is generated from the document's seed, so the same document
/// always yields the same rows.
pub struct DataGenerator {
    document: SchemaDocument,
    model: SchemaModel,
    position: usize,
}

impl DataGenerator {
    /// Validate the document and prepare to generate it.
    pub fn new(document: SchemaDocument) -> Result<Self, GeneratorError> {
        validate(&document)?;
        info!(
            "Generating {} table(s) with {} seed {}",
            document.tables.len(),
            document.algorithm,
            document.seed
        );
        Ok(Self {
            document,
            model: SchemaModel::new(),
            position: 0,
        })
    }

    pub fn seed(&self) -> u64 {
        self.document.seed
    }

    pub fn algorithm(&self) -> Algorithm {
        self.document.algorithm
    }

    pub fn document(&self) -> &SchemaDocument {
        &self.document
    }

    /// Metadata of the tables prepared so far.
    pub fn model(&self) -> &SchemaModel {
        &self.model
    }

    /// Prepare the next table. Any error ends the run.
    pub fn next_table(&mut self) -> Option<Result<TableGenerator, GeneratorError>> {
        let table = self.document.tables.get(self.position)?;
        let planner = TablePlanner {
            document: &self.document,
            model: &self.model,
            table,
        };

        match planner.plan() {
            Ok((meta, generator)) => {
                self.position += 1;
                self.model.insert(meta);
                Some(Ok(generator))
            }
            Err(e) => {
                self.position = self.document.tables.len();
                Some(Err(e))
            }
        }
    }
}

impl Iterator for DataGenerator {
    type Item = Result<TableGenerator, GeneratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_table()
    }
}

/// Rows of one prepared table.
pub struct TableGenerator {
    name: String,
    column_names: Vec<String>,
    row_count: u64,
    next_index: u64,
    source: RandomSource,
    columns: Vec<ColumnGenerator>,
    context: RowContext,
}

impl TableGenerator {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    /// Number of rows, after caps.
    pub fn row_count(&self) -> u64 {
        self.row_count
    }

    pub fn remaining(&self) -> u64 {
        self.row_count - self.next_index
    }

    /// Generate the next row, columns in declaration order.
    pub fn next_row(&mut self) -> Option<Result<GeneratedRow, GeneratorError>> {
        if self.next_index >= self.row_count {
            return None;
        }

        let index = self.next_index;
        self.context.row = index;

        let mut values = Vec::with_capacity(self.columns.len());
        for column in &mut self.columns {
            match column.next_value(&mut self.source, &mut self.context) {
                Ok(value) => values.push(value),
                Err(source) => {
                    // No partial tables.
                    self.next_index = self.row_count;
                    return Some(Err(GeneratorError::Distribution {
                        table: self.name.clone(),
                        source,
                    }));
                }
            }
        }

        self.next_index += 1;
        Some(Ok(GeneratedRow::new(self.name.clone(), index, values)))
    }

    /// Iterate over the remaining rows.
    pub fn rows(&mut self) -> TableRows<'_> {
        TableRows { generator: self }
    }
}

/// Iterator that lazily generates the rows of a table.
pub struct TableRows<'a> {
    generator: &'a mut TableGenerator,
}

impl Iterator for TableRows<'_> {
    type Item = Result<GeneratedRow, GeneratorError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.generator.next_row()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::try_from(self.generator.remaining()).unwrap_or(usize::MAX);
        (0, Some(remaining))
    }
}

// ============================================================================
// Table planning
// ============================================================================

struct TablePlanner<'a> {
    document: &'a SchemaDocument,
    model: &'a SchemaModel,
    table: &'a TableDocument,
}

/// Composite primary key layout of the table being planned.
struct CompositePlan {
    domain: CompositeDomain,
    digits: Vec<CompositeDigit>,
}

impl<'a> TablePlanner<'a> {
    fn plan(&self) -> Result<(TableMeta, TableGenerator), GeneratorError> {
        let requested = self.table.row_count;
        let capped = self.cap_unique_references(requested)?;
        let composite = self.plan_composite(capped)?;
        let row_count = composite.as_ref().map_or(capped, |c| c.domain.rows);
        if row_count < capped {
            warn!(
                "Table '{}': composite key domain holds {} tuples, row count lowered from {}",
                self.table.name, row_count, capped
            );
        }

        let mut columns = Vec::with_capacity(self.table.columns.len());
        let mut metas = Vec::with_capacity(self.table.columns.len());
        let mut foreign: Vec<CompositeFkGroup> = Vec::new();
        let mut composite_position = 0;

        for column in &self.table.columns {
            let (logical_type, mut key_format) = self.resolve_type(column)?;
            let mut digit = None;

            let generator = match column.constraint {
                None => self.normal_generator(column, logical_type, key_format, row_count)?,
                Some(Constraint::Pk | Constraint::FkUnique) => {
                    if column.constraint == Some(Constraint::Pk) {
                        key_format =
                            self.key_capacity(column, logical_type, key_format, row_count)?;
                    }
                    self.key_generator(
                        column,
                        logical_type,
                        KeyColumn::unique(),
                        key_format,
                        false,
                    )?
                }
                Some(Constraint::Fk) => {
                    let (parent, _) = self.referenced(column)?;
                    let keys = KeyColumn::referencing(parent.row_count, column.skew())
                        .map_err(|e| self.distribution_error(e))?;
                    self.key_generator(column, logical_type, keys, key_format, true)?
                }
                Some(Constraint::CompPk) => {
                    let plan = composite.as_ref().ok_or_else(|| {
                        self.invalid(column, "composite key layout missing".to_string())
                    })?;
                    let pk_digit = plan
                        .digits
                        .get(composite_position)
                        .copied()
                        .ok_or_else(|| {
                            self.invalid(column, "composite key layout missing".to_string())
                        })?;
                    composite_position += 1;
                    digit = Some(pk_digit);
                    if column.reference().is_none() {
                        key_format = self.key_capacity(
                            column,
                            logical_type,
                            key_format,
                            pk_digit.range(),
                        )?;
                    }
                    self.composite_generator(
                        column,
                        logical_type,
                        key_format,
                        pk_digit,
                        ScalarSlot::Primary,
                    )?
                }
                Some(Constraint::CompFk) => {
                    let (parent, parent_column) = self.referenced(column)?;
                    let parent_digit = parent_column.digit.ok_or_else(|| {
                        self.invalid(
                            column,
                            format!(
                                "'{}.{}' is not a composite primary key",
                                parent.name, parent_column.name
                            ),
                        )
                    })?;
                    let group = self.foreign_group(column, parent, &mut foreign)?;
                    self.composite_generator(
                        column,
                        logical_type,
                        key_format,
                        parent_digit,
                        ScalarSlot::Foreign(group),
                    )?
                }
            };

            debug!(
                "Table '{}': column '{}' {} via {} strategy",
                self.table.name,
                column.name,
                logical_type,
                generator.kind()
            );
            columns.push(generator);
            metas.push(ColumnMeta {
                name: column.name.clone(),
                logical_type,
                constraint: column.constraint,
                key_format,
                digit,
            });
        }

        let domain = composite.map(|c| c.domain);
        let primary = domain
            .as_ref()
            .map(|domain| {
                CompositePkStream::new(self.document.algorithm, self.document.seed, domain)
            })
            .transpose()
            .map_err(|e| self.distribution_error(e))?;

        info!(
            "Prepared table '{}': {} rows, {} columns",
            self.table.name,
            row_count,
            columns.len()
        );

        let meta = TableMeta {
            name: self.table.name.clone(),
            requested_rows: requested,
            row_count,
            columns: metas,
            composite: domain,
        };
        let generator = TableGenerator {
            name: self.table.name.clone(),
            column_names: self.table.columns.iter().map(|c| c.name.clone()).collect(),
            row_count,
            next_index: 0,
            source: RandomSource::new(self.document.algorithm, self.document.seed),
            columns,
            context: RowContext {
                row: 0,
                primary,
                foreign,
            },
        };
        Ok((meta, generator))
    }

    /// Lower the row count to the row count of every FK_UNIQUE target.
    fn cap_unique_references(&self, requested: u64) -> Result<u64, GeneratorError> {
        let mut rows = requested;
        for column in &self.table.columns {
            if column.constraint != Some(Constraint::FkUnique) {
                continue;
            }
            let (parent, _) = self.referenced(column)?;
            if parent.row_count < rows {
                warn!(
                    "Table '{}': FK_UNIQUE column '{}' caps row count from {} to {} (rows of '{}')",
                    self.table.name, column.name, rows, parent.row_count, parent.name
                );
                rows = parent.row_count;
            }
        }
        Ok(rows)
    }

    fn plan_composite(&self, rows: u64) -> Result<Option<CompositePlan>, GeneratorError> {
        let keys: Vec<&ColumnDocument> = self
            .table
            .columns
            .iter()
            .filter(|c| c.constraint == Some(Constraint::CompPk))
            .collect();
        if keys.is_empty() {
            return Ok(None);
        }

        let layout = if keys.iter().all(|c| c.reference().is_some()) {
            let radices = keys
                .iter()
                .map(|c| self.referenced(c).map(|(parent, _)| parent.row_count))
                .collect::<Result<Vec<_>, _>>()?;
            referenced_layout(&radices)
        } else {
            independent_layout(keys.len(), rows)
        };
        let (digits, size) = layout.ok_or_else(|| GeneratorError::DomainOverflow {
            table: self.table.name.clone(),
        })?;

        let domain = CompositeDomain::choose(rows, size);
        debug!(
            "Table '{}': composite key over {} column(s), domain {}, {:?} stream, digits {:?}",
            self.table.name,
            keys.len(),
            size,
            domain.stream,
            digits
        );
        Ok(Some(CompositePlan { domain, digits }))
    }

    /// Effective type and string format. Referencing columns take both from
    /// their target so the keys render identically.
    fn resolve_type(
        &self,
        column: &ColumnDocument,
    ) -> Result<(LogicalType, KeyFormat), GeneratorError> {
        if column.reference().is_some() {
            let (_, target) = self.referenced(column)?;
            return Ok((target.logical_type, target.key_format));
        }
        Ok((
            column.column_type.unwrap_or(LogicalType::Int),
            KeyFormat::new(column.string_length(), column.var_length),
        ))
    }

    /// Reserve key digits in a STRING key column's format so that `keys`
    /// distinct keys render to distinct strings.
    fn key_capacity(
        &self,
        column: &ColumnDocument,
        logical_type: LogicalType,
        key_format: KeyFormat,
        keys: u64,
    ) -> Result<KeyFormat, GeneratorError> {
        if logical_type != LogicalType::String {
            return Ok(key_format);
        }
        key_format.with_key_capacity(keys).ok_or_else(|| {
            self.invalid(
                column,
                format!(
                    "length {} cannot hold {keys} distinct keys",
                    key_format.length()
                ),
            )
        })
    }

    fn referenced(
        &self,
        column: &ColumnDocument,
    ) -> Result<(&'a TableMeta, &'a ColumnMeta), GeneratorError> {
        let (ref_tab, ref_col) = column
            .reference()
            .ok_or_else(|| self.invalid(column, "missing ref_tab/ref_col".to_string()))?;
        let model: &'a SchemaModel = self.model;
        let parent = model.get(ref_tab).ok_or_else(|| GeneratorError::Resolution {
            table: self.table.name.clone(),
            referenced: ref_tab.to_string(),
        })?;
        let target = parent.column(ref_col).ok_or_else(|| GeneratorError::UnknownColumn {
            table: ref_tab.to_string(),
            column: ref_col.to_string(),
        })?;
        Ok((parent, target))
    }

    fn normal_generator(
        &self,
        column: &ColumnDocument,
        logical_type: LogicalType,
        key_format: KeyFormat,
        rows: u64,
    ) -> Result<ColumnGenerator, GeneratorError> {
        match logical_type {
            LogicalType::Int | LogicalType::String => {
                let cardinality = column.cardinality.unwrap_or(1.0);
                let keys = KeyColumn::for_cardinality(cardinality, rows, column.skew())
                    .map_err(|e| self.distribution_error(e))?;
                let memoize = memo_warranted(cardinality);
                self.key_generator(column, logical_type, keys, key_format, memoize)
            }
            LogicalType::Real => {
                let (min, max) = column.real_bounds();
                RealColumn::new(min, max)
                    .map(ColumnGenerator::Real)
                    .map_err(|e| self.distribution_error(e))
            }
            LogicalType::Date | LogicalType::Timestamp => {
                let kind = if logical_type == LogicalType::Date {
                    TemporalKind::Date
                } else {
                    TemporalKind::Timestamp
                };
                let start = match column.start_date.as_deref() {
                    Some(s) => parse_instant(s).ok_or_else(|| {
                        self.invalid(column, format!("cannot parse start_date '{s}'"))
                    })?,
                    None => unix_epoch(),
                };
                TemporalColumn::new(kind, start, column.years())
                    .map(ColumnGenerator::Temporal)
                    .map_err(|e| self.distribution_error(e))
            }
        }
    }

    fn key_generator(
        &self,
        column: &ColumnDocument,
        logical_type: LogicalType,
        keys: KeyColumn,
        key_format: KeyFormat,
        memoize: bool,
    ) -> Result<ColumnGenerator, GeneratorError> {
        match logical_type {
            LogicalType::Int => Ok(ColumnGenerator::Int(keys)),
            LogicalType::String => Ok(ColumnGenerator::Text(TextColumn::new(
                keys, key_format, memoize,
            ))),
            other => Err(self.invalid(column, format!("{other} cannot hold keys"))),
        }
    }

    fn composite_generator(
        &self,
        column: &ColumnDocument,
        logical_type: LogicalType,
        key_format: KeyFormat,
        digit: CompositeDigit,
        slot: ScalarSlot,
    ) -> Result<ColumnGenerator, GeneratorError> {
        let synthesizer = match logical_type {
            LogicalType::Int => None,
            LogicalType::String => Some(StringSynthesizer::new(key_format, true)),
            other => return Err(self.invalid(column, format!("{other} cannot hold keys"))),
        };
        Ok(ColumnGenerator::Composite(CompositeColumn::new(digit, slot, synthesizer)))
    }

    /// Position of the COMP_FK group for `parent`, creating it (and
    /// replaying the parent's scalars) on first use.
    fn foreign_group(
        &self,
        column: &ColumnDocument,
        parent: &TableMeta,
        groups: &mut Vec<CompositeFkGroup>,
    ) -> Result<usize, GeneratorError> {
        if let Some(position) = groups.iter().position(|g| g.parent() == parent.name) {
            return Ok(position);
        }

        let domain = parent.composite.ok_or_else(|| {
            self.invalid(
                column,
                format!("table '{}' has no composite primary key", parent.name),
            )
        })?;
        let scalars = replay_scalars(self.document.algorithm, self.document.seed, &domain)
            .map_err(|e| self.distribution_error(e))?;
        debug!(
            "Table '{}': replayed {} composite keys of '{}'",
            self.table.name,
            scalars.len(),
            parent.name
        );

        let group = CompositeFkGroup::new(parent.name.clone(), scalars, column.skew())
            .map_err(|e| self.distribution_error(e))?;
        groups.push(group);
        Ok(groups.len() - 1)
    }

    fn invalid(&self, column: &ColumnDocument, reason: String) -> GeneratorError {
        GeneratorError::InvalidColumn {
            table: self.table.name.clone(),
            column: column.name.clone(),
            reason,
        }
    }

    fn distribution_error(&self, source: DistributionError) -> GeneratorError {
        GeneratorError::Distribution {
            table: self.table.name.clone(),
            source,
        }
    }
}
