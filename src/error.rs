use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("Table already exists: {0}")]
    DuplicateTable(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Unsupported type: {0}")]
    UnsupportedType(String),
    #[error("Enum already declared: {0}")]
    DuplicateEnum(String),
    #[error("Enum name shadows a built-in type: {0}")]
    ReservedTypeName(String),
}

/// A single problem found in one table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Problem {
    #[error("duplicate table name")]
    DuplicateTable,
    #[error("duplicate column `{0}`")]
    DuplicateColumn(String),
    #[error("columns `{first}` and `{second}` both map to the field `{field}`")]
    FieldNameCollision {
        first: String,
        second: String,
        field: String,
    },
    #[error("no primary key declared")]
    MissingPrimaryKey,
    #[error("primary key column `{0}` does not exist")]
    UnknownPrimaryKeyColumn(String),
    #[error("foreign key to `{0}` has no columns")]
    EmptyForeignKey(String),
    #[error("foreign key column `{0}` does not exist")]
    UnknownForeignKeyColumn(String),
    #[error("column `{0}` is used by more than one foreign key")]
    DuplicateForeignKeyColumn(String),
    #[error("foreign key references unknown table `{0}`")]
    UnknownReferencedTable(String),
    #[error("foreign key references unknown column `{table}.{column}`")]
    UnknownReferencedColumn { table: String, column: String },
    #[error(
        "foreign key column `{column}` has type {local_type} but `{table}.{foreign_column}` has type {foreign_type}"
    )]
    ForeignKeyTypeMismatch {
        column: String,
        table: String,
        foreign_column: String,
        local_type: String,
        foreign_type: String,
    },
    #[error("duplicate check constraint `{0}`")]
    DuplicateCheck(String),
    #[error("type name `{0}` is already used by another table or enum")]
    DuplicateTypeName(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableProblems {
    pub table: String,
    pub problems: Vec<Problem>,
}

/// Every problem found in a schema, grouped by table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub tables: Vec<TableProblems>,
}

impl ValidationError {
    pub fn problems_for(&self, table: &str) -> Option<&[Problem]> {
        self.tables
            .iter()
            .find(|t| t.table == table)
            .map(|t| t.problems.as_slice())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema validation failed")?;
        for entry in &self.tables {
            write!(f, "\n  table `{}`:", entry.table)?;
            for problem in &entry.problems {
                write!(f, "\n    - {}", problem)?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}
