//! Structural validation of a schema document.
//!
//! Generation never starts on a document that fails validation. Every
//! issue found is collected so the user sees them all at once; callers only
//! need the pass/fail signal of [`validate`].

use crate::keys::{composite_radix, string_key_capacity};
use crate::schema::{ColumnDocument, SchemaDocument, TableDocument, MAX_STRING_LENGTH};
use crate::types::{Constraint, LogicalType};
use crate::values::parse_instant;
use std::collections::HashSet;
use std::fmt;

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    /// `table` or `table.column`
    pub location: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Returned when a document has at least one issue.
#[derive(Debug, Clone, thiserror::Error)]
#[error("schema is invalid ({} issue(s)): {}", .issues.len(), render_issues(.issues))]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

fn render_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(|i| i.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validate a document, returning every issue on failure.
pub fn validate(schema: &SchemaDocument) -> Result<(), ValidationError> {
    let issues = collect_issues(schema);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { issues })
    }
}

/// Collect every issue of a document.
pub fn collect_issues(schema: &SchemaDocument) -> Vec<ValidationIssue> {
    let mut validator = Validator {
        schema,
        issues: Vec::new(),
    };
    validator.run();
    validator.issues
}

struct Validator<'a> {
    schema: &'a SchemaDocument,
    issues: Vec<ValidationIssue>,
}

impl<'a> Validator<'a> {
    fn report(&mut self, location: String, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            location,
            message: message.into(),
        });
    }

    fn run(&mut self) {
        if self.schema.tables.is_empty() {
            self.report("schema".to_string(), "no tables declared");
        }

        let mut table_names = HashSet::new();
        for table in &self.schema.tables {
            if !table_names.insert(table.name.to_ascii_lowercase()) {
                self.report(table.name.clone(), "duplicate table name");
            }
            self.check_table(table);
        }
    }

    fn check_table(&mut self, table: &'a TableDocument) {
        if table.row_count == 0 {
            self.report(table.name.clone(), "row_count must be at least 1");
        }
        if table.columns.is_empty() {
            self.report(table.name.clone(), "no columns declared");
        }

        let mut column_names = HashSet::new();
        for column in &table.columns {
            if !column_names.insert(column.name.to_ascii_lowercase()) {
                self.report(
                    format!("{}.{}", table.name, column.name),
                    "duplicate column name",
                );
            }
            self.check_column(table, column);
        }

        self.check_key_shape(table);
        self.check_key_capacity(table);
    }

    fn check_column(&mut self, table: &TableDocument, column: &ColumnDocument) {
        let location = format!("{}.{}", table.name, column.name);

        if let Some(cardinality) = column.cardinality {
            if !(cardinality > 0.0) || !cardinality.is_finite() {
                self.report(location.clone(), "cardinality must be greater than 0");
            }
        }

        match column.column_type {
            Some(LogicalType::String) => {
                if let Some(length) = column.length {
                    if length == 0 || length > MAX_STRING_LENGTH {
                        self.report(
                            location.clone(),
                            format!("length must be within 1..={MAX_STRING_LENGTH}"),
                        );
                    }
                }
            }
            Some(LogicalType::Real) => {
                if column.constraint.is_some() || column.cardinality.is_some() {
                    self.report(
                        location.clone(),
                        "REAL columns take neither constraint nor cardinality",
                    );
                }
                let (min, max) = column.real_bounds();
                if !(min < max) {
                    self.report(location.clone(), "real_min must be less than real_max");
                }
            }
            Some(LogicalType::Date) | Some(LogicalType::Timestamp) => {
                if column.constraint.is_some() {
                    self.report(location.clone(), "DATE/TIMESTAMP columns take no constraint");
                }
                if let Some(start) = &column.start_date {
                    if parse_instant(start).is_none() {
                        self.report(location.clone(), format!("unparseable start_date '{start}'"));
                    }
                }
                if column.years() == 0 {
                    self.report(location.clone(), "range_in_years must be at least 1");
                }
            }
            Some(LogicalType::Int) | None => {}
        }

        let needs_cardinality = match column.column_type {
            Some(LogicalType::Int) | Some(LogicalType::String) | None => {
                column.constraint.is_none()
            }
            _ => false,
        };
        if needs_cardinality && column.cardinality.is_none() {
            self.report(location.clone(), "either constraint or cardinality is required");
        }

        if let Some(constraint) = column.constraint {
            if let Some(column_type) = column.column_type {
                if !column_type.is_key_type() {
                    self.report(
                        location.clone(),
                        format!("{constraint} columns must be INT or STRING"),
                    );
                }
            }
            self.check_reference(table, column, constraint, &location);
        } else if column.ref_tab.is_some() || column.ref_col.is_some() {
            self.report(location, "ref_tab/ref_col given without a constraint");
        }
    }

    fn check_reference(
        &mut self,
        table: &TableDocument,
        column: &ColumnDocument,
        constraint: Constraint,
        location: &str,
    ) {
        let reference = match (&column.ref_tab, &column.ref_col) {
            (Some(t), Some(c)) => Some((t.as_str(), c.as_str())),
            (None, None) => None,
            _ => {
                self.report(location.to_string(), "ref_tab and ref_col must be given together");
                return;
            }
        };

        let Some((ref_tab, ref_col)) = reference else {
            if constraint.requires_reference() {
                self.report(
                    location.to_string(),
                    format!("{constraint} requires ref_tab and ref_col"),
                );
            }
            return;
        };

        if constraint == Constraint::Pk {
            self.report(location.to_string(), "PK columns do not reference other tables");
            return;
        }

        if ref_tab.eq_ignore_ascii_case(&table.name) {
            self.report(location.to_string(), "a column may not reference its own table");
            return;
        }

        let target = match self.schema.get_column(ref_tab, ref_col) {
            Ok(target) => target,
            Err(e) => {
                self.report(location.to_string(), format!("unresolved reference: {e}"));
                return;
            }
        };

        let expected = match constraint {
            Constraint::CompFk => Constraint::CompPk,
            _ => Constraint::Pk,
        };
        if target.constraint != Some(expected) {
            self.report(
                location.to_string(),
                format!("{constraint} must reference a {expected} column, {ref_tab}.{ref_col} is not one"),
            );
        }
    }

    fn check_key_shape(&mut self, table: &TableDocument) {
        let count = |c: Constraint| {
            table
                .columns
                .iter()
                .filter(|col| col.constraint == Some(c))
                .count()
        };

        let pk_count = count(Constraint::Pk);
        let comp_pk_count = count(Constraint::CompPk);

        if pk_count > 1 {
            self.report(table.name.clone(), "more than one PK column; use COMP_PK");
        }
        if pk_count > 0 && comp_pk_count > 0 {
            self.report(table.name.clone(), "PK and COMP_PK columns cannot be mixed");
        }

        let referencing = table
            .columns
            .iter()
            .filter(|c| c.constraint == Some(Constraint::CompPk))
            .filter(|c| c.ref_tab.is_some())
            .count();
        if referencing > 0 && referencing != comp_pk_count {
            self.report(
                table.name.clone(),
                "COMP_PK columns must either all reference other tables or none may",
            );
        }
    }

    /// STRING key columns must be long enough to render every key distinctly.
    /// Referencing columns inherit their target's shape and are checked there.
    fn check_key_capacity(&mut self, table: &TableDocument) {
        let composite: Vec<&ColumnDocument> = table
            .columns
            .iter()
            .filter(|c| c.constraint == Some(Constraint::CompPk))
            .collect();
        let independent =
            !composite.is_empty() && composite.iter().all(|c| c.reference().is_none());
        let digit_range = if independent {
            u32::try_from(composite.len())
                .ok()
                .and_then(|k| composite_radix(k, table.row_count))
        } else {
            None
        };

        for column in &table.columns {
            if column.column_type != Some(LogicalType::String) || column.reference().is_some() {
                continue;
            }
            let keys = match (column.constraint, digit_range) {
                (Some(Constraint::Pk), _) => table.row_count,
                (Some(Constraint::CompPk), Some(range)) => range,
                _ => continue,
            };
            let capacity = string_key_capacity(column.string_length(), column.var_length);
            if capacity < keys {
                self.report(
                    format!("{}.{}", table.name, column.name),
                    format!(
                        "length {} renders at most {capacity} distinct keys, {keys} needed",
                        column.string_length()
                    ),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issues_for(yaml: &str) -> Vec<ValidationIssue> {
        collect_issues(&SchemaDocument::from_yaml(yaml).unwrap())
    }

    const VALID: &str = r#"
tables:
  - name: parent
    row_count: 10
    columns:
      - name: a
        type: INT
        constraint: COMP_PK
      - name: b
        type: STRING
        constraint: COMP_PK
      - name: note
        type: STRING
        cardinality: 0.3
  - name: child
    row_count: 20
    columns:
      - name: pa
        constraint: COMP_FK
        ref_tab: parent
        ref_col: a
      - name: pb
        constraint: COMP_FK
        ref_tab: parent
        ref_col: b
      - name: price
        type: REAL
        real_min: 1
        real_max: 2
      - name: created
        type: DATE
        start_date: "2000-01-01"
"#;

    #[test]
    fn test_valid_schema_passes() {
        let schema = SchemaDocument::from_yaml(VALID).unwrap();
        assert!(validate(&schema).is_ok());
    }

    #[test]
    fn test_duplicate_names() {
        let issues = issues_for(
            r#"
tables:
  - name: t
    row_count: 1
    columns:
      - name: c
        type: INT
        cardinality: 1
      - name: C
        type: INT
        cardinality: 1
  - name: T
    row_count: 1
    columns:
      - name: c
        type: INT
        cardinality: 1
"#,
        );

        assert_eq!(issues.len(), 2);
        assert!(issues.iter().any(|i| i.message == "duplicate column name"));
        assert!(issues.iter().any(|i| i.message == "duplicate table name"));
    }

    #[test]
    fn test_real_rules() {
        let issues = issues_for(
            r#"
tables:
  - name: t
    row_count: 1
    columns:
      - name: r
        type: REAL
        cardinality: 0.5
        real_min: 5
        real_max: 1
"#,
        );

        assert_eq!(issues.len(), 2);
    }

    #[test]
    fn test_missing_cardinality_and_bad_length() {
        let issues = issues_for(
            r#"
tables:
  - name: t
    row_count: 1
    columns:
      - name: s
        type: STRING
        length: 5000
"#,
        );

        assert_eq!(issues.len(), 2);
        assert!(issues.iter().all(|i| i.location == "t.s"));
    }

    #[test]
    fn test_fk_must_target_pk() {
        let issues = issues_for(
            r#"
tables:
  - name: parent
    row_count: 5
    columns:
      - name: id
        type: INT
        cardinality: 1
  - name: child
    row_count: 5
    columns:
      - name: pid
        constraint: FK
        ref_tab: parent
        ref_col: id
      - name: other
        constraint: FK_UNIQUE
        ref_tab: nowhere
        ref_col: id
"#,
        );

        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.contains("must reference a PK column"));
        assert!(issues[1].message.contains("unresolved reference"));
    }

    #[test]
    fn test_fk_requires_reference() {
        let issues = issues_for(
            r#"
tables:
  - name: t
    row_count: 5
    columns:
      - name: id
        constraint: FK
"#,
        );

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].message, "FK requires ref_tab and ref_col");
    }

    #[test]
    fn test_mixed_composite_pk() {
        let issues = issues_for(
            r#"
tables:
  - name: p
    row_count: 5
    columns:
      - name: id
        constraint: PK
  - name: t
    row_count: 5
    columns:
      - name: a
        constraint: COMP_PK
        ref_tab: p
        ref_col: id
      - name: b
        constraint: COMP_PK
"#,
        );

        assert_eq!(issues.len(), 1);
        assert!(issues[0].message.contains("all reference"));
    }

    #[test]
    fn test_date_rules() {
        let issues = issues_for(
            r#"
tables:
  - name: t
    row_count: 5
    columns:
      - name: d
        type: TIMESTAMP
        constraint: PK
        start_date: yesterday
        range_in_years: 0
"#,
        );

        // constraint on a date, non-key type with constraint, bad start, zero range
        assert_eq!(issues.len(), 4);
    }

    #[test]
    fn test_error_message_lists_issues() {
        let schema = SchemaDocument::from_yaml(
            r#"
tables:
  - name: t
    row_count: 0
    columns:
      - name: c
        type: INT
        cardinality: 1
"#,
        )
        .unwrap();

        let err = validate(&schema).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(
            err.to_string(),
            "schema is invalid (1 issue(s)): t: row_count must be at least 1"
        );
    }

    #[test]
    fn test_short_string_keys_are_rejected() {
        let issues = issues_for(
            r#"
tables:
  - name: tiny
    row_count: 100
    columns:
      - name: code
        type: STRING
        constraint: PK
        length: 1
  - name: exact
    row_count: 69
    columns:
      - name: code
        type: STRING
        constraint: PK
        length: 1
  - name: grid
    row_count: 10000
    columns:
      - name: x
        type: STRING
        constraint: COMP_PK
        length: 1
      - name: y
        type: INT
        constraint: COMP_PK
"#,
        );

        // grid needs 200 values per digit.
        assert_eq!(issues.len(), 2, "{issues:?}");
        assert_eq!(issues[0].location, "tiny.code");
        assert!(issues[0].message.contains("100 needed"));
        assert_eq!(issues[1].location, "grid.x");
        assert!(issues[1].message.contains("200 needed"));
    }

    #[test]
    fn test_variable_length_keys_use_shortest_length() {
        let schema = |var_length: bool| {
            format!(
                r#"
tables:
  - name: big
    row_count: 200000000000
    columns:
      - name: code
        type: STRING
        constraint: PK
        length: 10
        var_length: {var_length}
"#
            )
        };

        // 69^6 is about 1.08e11.
        assert_eq!(issues_for(&schema(true)).len(), 1);
        assert!(issues_for(&schema(false)).is_empty());
    }
}
