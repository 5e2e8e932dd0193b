//! DDL for loading generated flat files into a database.
//!
//! [`OracleExternalDdl`] produces, per table, an external table over the
//! `<table>.csv` file written by the populator, a `CREATE TABLE ... AS
//! SELECT` copying it into a heap table, and then the key constraints.

use crate::schema::{ColumnDocument, SchemaDocument, SchemaError, TableDocument};
use crate::types::{Constraint, LogicalType};
use std::collections::BTreeMap;
use std::fmt::{self, Write};

/// Column type as seen by DDL generation: reference chains already followed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DdlColumnType {
    pub logical_type: LogicalType,
    pub length: u16,
}

/// Trait for deriving DDL fragments from resolved column types.
pub trait ToDdl {
    /// Column type in the `CREATE TABLE` statement.
    fn column_type(&self, column: &DdlColumnType) -> String;

    /// Field specification in the loader's field list; `None` means the
    /// loader's default for the column.
    fn field_spec(&self, column: &DdlColumnType) -> Option<String>;
}

/// Oracle external-table DDL over delimited flat files.
#[derive(Debug, Clone)]
pub struct OracleExternalDdl {
    /// Oracle directory object holding the flat files
    pub directory: String,
    /// Field delimiter of the flat files
    pub delimiter: char,
}

impl Default for OracleExternalDdl {
    fn default() -> Self {
        Self::new("<ora_dir>")
    }
}

impl ToDdl for OracleExternalDdl {
    fn column_type(&self, column: &DdlColumnType) -> String {
        match column.logical_type {
            LogicalType::Int | LogicalType::Real => "number".to_string(),
            LogicalType::String => format!("varchar2({})", column.length),
            LogicalType::Date => "date".to_string(),
            LogicalType::Timestamp => "timestamp".to_string(),
        }
    }

    fn field_spec(&self, column: &DdlColumnType) -> Option<String> {
        match column.logical_type {
            LogicalType::Date => Some(r#"CHAR(11) DATE_FORMAT DATE MASK "DD-MON-YYYY""#.to_string()),
            LogicalType::Timestamp => Some(
                r#"CHAR(20) DATE_FORMAT TIMESTAMP MASK "DD-MON-YYYY HH24:MI:SS""#.to_string(),
            ),
            // The loader's default field length is 255.
            LogicalType::String if column.length > 255 => Some(format!("char({})", column.length)),
            _ => None,
        }
    }
}

impl OracleExternalDdl {
    pub fn new(directory: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            delimiter: '|',
        }
    }

    /// Match the delimiter the flat files were written with.
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Render DDL for every table, table definitions first, then constraints.
    pub fn render(&self, schema: &SchemaDocument) -> Result<String, SchemaError> {
        let resolved = schema
            .tables
            .iter()
            .map(|table| {
                table
                    .columns
                    .iter()
                    .map(|column| resolve_ddl_type(schema, table, column))
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut out = String::new();
        for (table, types) in schema.tables.iter().zip(&resolved) {
            self.render_table(table, types, &mut out)?;
        }
        for table in &schema.tables {
            render_constraints(table, &mut out)?;
        }
        Ok(out)
    }

    fn render_table(
        &self,
        table: &TableDocument,
        types: &[DdlColumnType],
        out: &mut String,
    ) -> fmt::Result {
        let mut columns = Vec::with_capacity(table.columns.len());
        let mut fields = Vec::with_capacity(table.columns.len());

        for (column, resolved) in table.columns.iter().zip(types) {
            columns.push(format!("{} {}", column.name, self.column_type(resolved)));
            fields.push(match self.field_spec(resolved) {
                Some(spec) => format!("{} {}", column.name, spec),
                None => column.name.clone(),
            });
        }

        let name = &table.name;
        write!(
            out,
            "create table {name}_et(\n\t{columns})\n\
             organization external(\n\
             \tTYPE ORACLE_LOADER\n\
             \tdefault directory {directory}\n\
             \taccess parameters(\n\
             \t\trecords delimited by newline\n\
             \t\tnobadfile nologfile\n\
             \t\tfields terminated by '{delimiter}'\n\
             \t\tmissing field values are null\n\
             \t\t({fields}))\n\
             \tlocation('{name}.csv'))\n\
             reject limit unlimited;\n\
             create table {name} as select * from {name}_et;\n\n",
            columns = columns.join(",\n\t"),
            directory = self.directory,
            delimiter = self.delimiter,
            fields = fields.join(",\n\t\t"),
        )
    }
}

fn resolve_ddl_type(
    schema: &SchemaDocument,
    table: &TableDocument,
    column: &ColumnDocument,
) -> Result<DdlColumnType, SchemaError> {
    let source = if column.column_type.is_some() {
        column
    } else {
        schema.resolve_type_source(&table.name, &column.name)?
    };
    Ok(DdlColumnType {
        logical_type: source.column_type.unwrap_or(LogicalType::Int),
        length: source.string_length(),
    })
}

fn render_constraints(table: &TableDocument, out: &mut String) -> fmt::Result {
    let name = &table.name;
    let with = |c: Constraint| {
        table
            .columns
            .iter()
            .filter(move |col| col.constraint == Some(c))
    };

    for column in &table.columns {
        match (column.constraint, column.reference()) {
            (Some(Constraint::Pk), _) => {
                writeln!(
                    out,
                    "alter table {name} add constraint pk_{name} primary key({});",
                    column.name
                )?;
            }
            (Some(Constraint::Fk | Constraint::FkUnique), Some((ref_tab, ref_col))) => {
                writeln!(
                    out,
                    "alter table {name} add constraint fk_{name}_{ref_tab} foreign key({}) references {ref_tab}({ref_col});",
                    column.name
                )?;
            }
            _ => {}
        }
    }

    let independent: Vec<&str> = with(Constraint::CompPk)
        .filter(|c| c.reference().is_none())
        .map(|c| c.name.as_str())
        .collect();
    if !independent.is_empty() {
        writeln!(
            out,
            "alter table {name} add constraint comp_pk_{name} primary key({});",
            independent.join(",")
        )?;
    }

    let referencing: Vec<&ColumnDocument> = with(Constraint::CompPk)
        .filter(|c| c.reference().is_some())
        .collect();
    if !referencing.is_empty() {
        for column in &referencing {
            if let Some((ref_tab, ref_col)) = column.reference() {
                writeln!(
                    out,
                    "alter table {name} add constraint fk_{name}_{ref_tab} foreign key({}) references {ref_tab}({ref_col});",
                    column.name
                )?;
            }
        }
        let names: Vec<&str> = referencing.iter().map(|c| c.name.as_str()).collect();
        writeln!(
            out,
            "alter table {name} add constraint cpk_{name} primary key({});",
            names.join(",")
        )?;
    }

    // Composite foreign keys, one constraint per referenced table.
    let mut groups: BTreeMap<&str, Vec<(&str, &str)>> = BTreeMap::new();
    for column in with(Constraint::CompFk) {
        if let Some((ref_tab, ref_col)) = column.reference() {
            groups
                .entry(ref_tab)
                .or_default()
                .push((column.name.as_str(), ref_col));
        }
    }
    for (ref_tab, pairs) in groups {
        let local: Vec<&str> = pairs.iter().map(|(l, _)| *l).collect();
        let remote: Vec<&str> = pairs.iter().map(|(_, r)| *r).collect();
        writeln!(
            out,
            "alter table {name} add constraint cfk_{name}_{ref_tab} foreign key({}) references {ref_tab}({});",
            local.join(","),
            remote.join(",")
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCHEMA: &str = r#"
tables:
  - name: region
    row_count: 4
    columns:
      - name: r_id
        constraint: PK
      - name: r_name
        type: STRING
        length: 300
        cardinality: 1
  - name: nation
    row_count: 25
    columns:
      - name: n_id
        type: STRING
        constraint: PK
        length: 8
      - name: n_region
        constraint: FK
        ref_tab: region
        ref_col: r_id
      - name: founded
        type: DATE
        cardinality: 1
  - name: pair
    row_count: 50
    columns:
      - name: p_region
        constraint: COMP_PK
        ref_tab: region
        ref_col: r_id
      - name: p_nation
        constraint: COMP_PK
        ref_tab: nation
        ref_col: n_id
  - name: usage
    row_count: 80
    columns:
      - name: u_region
        constraint: COMP_FK
        ref_tab: pair
        ref_col: p_region
      - name: u_nation
        constraint: COMP_FK
        ref_tab: pair
        ref_col: p_nation
      - name: seen
        type: TIMESTAMP
"#;

    fn render() -> String {
        let schema = SchemaDocument::from_yaml(SCHEMA).unwrap();
        OracleExternalDdl::new("DATA_DIR").render(&schema).unwrap()
    }

    #[test]
    fn test_external_table_definition() {
        let ddl = render();

        assert!(ddl.contains("create table region_et(\n\tr_id number,\n\tr_name varchar2(300))"));
        assert!(ddl.contains("\tdefault directory DATA_DIR\n"));
        assert!(ddl.contains("(r_id,\n\t\tr_name char(300)))"));
        assert!(ddl.contains("\tlocation('region.csv'))\nreject limit unlimited;\n"));
        assert!(ddl.contains("create table region as select * from region_et;"));
    }

    #[test]
    fn test_delimiter_matches_flat_files() {
        let schema = SchemaDocument::from_yaml(SCHEMA).unwrap();
        assert!(render().contains("\t\tfields terminated by '|'\n"));

        let ddl = OracleExternalDdl::new("DATA_DIR")
            .with_delimiter(';')
            .render(&schema)
            .unwrap();
        assert!(ddl.contains("\t\tfields terminated by ';'\n"));
        assert!(!ddl.contains("terminated by '|'"));
    }

    #[test]
    fn test_types_resolve_through_references() {
        let ddl = render();

        // Composite FK -> composite PK -> string PK.
        assert!(ddl.contains("u_nation varchar2(8)"));
        assert!(ddl.contains("n_region number"));
        assert!(ddl.contains(r#"founded CHAR(11) DATE_FORMAT DATE MASK "DD-MON-YYYY""#));
        assert!(ddl.contains(r#"seen CHAR(20) DATE_FORMAT TIMESTAMP MASK "DD-MON-YYYY HH24:MI:SS""#));
    }

    #[test]
    fn test_constraints() {
        let ddl = render();

        assert!(ddl.contains("alter table region add constraint pk_region primary key(r_id);"));
        assert!(ddl.contains(
            "alter table nation add constraint fk_nation_region foreign key(n_region) references region(r_id);"
        ));
        assert!(ddl.contains(
            "alter table pair add constraint fk_pair_nation foreign key(p_nation) references nation(n_id);"
        ));
        assert!(ddl.contains("alter table pair add constraint cpk_pair primary key(p_region,p_nation);"));
        assert!(ddl.contains(
            "alter table usage add constraint cfk_usage_pair foreign key(u_region,u_nation) references pair(p_region,p_nation);"
        ));

        // Table definitions come before any constraint.
        let last_create = ddl.rfind("create table").unwrap();
        let first_alter = ddl.find("alter table").unwrap();
        assert!(last_create < first_alter);
    }

    #[test]
    fn test_independent_composite_pk() {
        let schema = SchemaDocument::from_yaml(
            r#"
tables:
  - name: grid
    row_count: 10
    columns:
      - name: x
        type: INT
        constraint: COMP_PK
      - name: y
        type: INT
        constraint: COMP_PK
"#,
        )
        .unwrap();

        let ddl = OracleExternalDdl::default().render(&schema).unwrap();
        assert!(ddl.contains("default directory <ora_dir>"));
        assert!(ddl.contains("alter table grid add constraint comp_pk_grid primary key(x,y);"));
    }
}
