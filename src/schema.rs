//! Tables, columns and constraints.

use crate::types::ValueType;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => write!(f, "'{}'", s.replace('\'', "''")),
            Literal::Int(n) => write!(f, "{}", n),
            Literal::Float(x) => write!(f, "{}", x),
            Literal::Bool(b) => write!(f, "{}", b),
            Literal::Null => f.write_str("NULL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnDefault {
    Literal(Literal),
    /// Raw SQL expression, emitted verbatim (e.g. `now()`).
    Sql(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub typ: ValueType,
    pub nullable: bool,
    pub default: Option<ColumnDefault>,
}

impl Column {
    pub fn new(name: impl Into<String>, typ: ValueType) -> Self {
        Self {
            name: name.into(),
            typ,
            nullable: true,
            default: None,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn default_literal(mut self, literal: Literal) -> Self {
        self.default = Some(ColumnDefault::Literal(literal));
        self
    }

    pub fn default_sql(mut self, expr: impl Into<String>) -> Self {
        self.default = Some(ColumnDefault::Sql(expr.into()));
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::SetDefault => "SET DEFAULT",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    /// `(local column, referenced column)` pairs.
    pub columns: Vec<(String, String)>,
    pub target: String,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
}

impl ForeignKey {
    pub fn new<I, L, F>(target: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = (L, F)>,
        L: Into<String>,
        F: Into<String>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|(local, foreign)| (local.into(), foreign.into()))
                .collect(),
            target: target.into(),
            on_delete: None,
            on_update: None,
        }
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }

    pub fn local_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(local, _)| local.as_str())
    }

    pub fn foreign_columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(_, foreign)| foreign.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckConstraint {
    pub name: String,
    pub expr: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// SQL identifier.
    pub name: String,
    /// TypeScript interface name.
    pub type_name: String,
    pub columns: Vec<Column>,
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKey>,
    pub checks: Vec<CheckConstraint>,
}

impl Table {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
            checks: Vec::new(),
        }
    }

    pub fn column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn primary_key<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.primary_key.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn foreign_key(mut self, fk: ForeignKey) -> Self {
        self.foreign_keys.push(fk);
        self
    }

    pub fn check(mut self, name: impl Into<String>, expr: impl Into<String>) -> Self {
        self.checks.push(CheckConstraint {
            name: name.into(),
            expr: expr.into(),
        });
        self
    }

    pub fn get_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Primary-key columns never hold NULL, whatever their own flag says.
    pub fn is_nullable(&self, column: &Column) -> bool {
        column.nullable && !self.primary_key.contains(&column.name)
    }

    /// Drop repeated primary-key names, keeping the first occurrence.
    pub(crate) fn dedup_primary_key(&mut self) {
        let mut seen: Vec<String> = Vec::with_capacity(self.primary_key.len());
        self.primary_key.retain(|col| {
            if seen.contains(col) {
                false
            } else {
                seen.push(col.clone());
                true
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_rendering() {
        assert_eq!(Literal::Str("it's".into()).to_string(), "'it''s'");
        assert_eq!(Literal::Int(-3).to_string(), "-3");
        assert_eq!(Literal::Float(0.5).to_string(), "0.5");
        assert_eq!(Literal::Bool(true).to_string(), "true");
        assert_eq!(Literal::Null.to_string(), "NULL");
    }

    #[test]
    fn test_dedup_primary_key() {
        let mut table = Table::new("t", "T")
            .column(Column::new("a", ValueType::Integer))
            .column(Column::new("b", ValueType::Integer))
            .primary_key(["b", "a", "b"]);
        table.dedup_primary_key();
        assert_eq!(table.primary_key, vec!["b", "a"]);
    }

    #[test]
    fn test_foreign_key_builder() {
        let fk = ForeignKey::new("users", [("user_id", "id")]).on_delete(ReferentialAction::Cascade);
        assert_eq!(fk.target, "users");
        assert_eq!(fk.local_columns().collect::<Vec<_>>(), vec!["user_id"]);
        assert_eq!(fk.foreign_columns().collect::<Vec<_>>(), vec!["id"]);
        assert_eq!(fk.on_delete, Some(ReferentialAction::Cascade));
        assert_eq!(fk.on_update, None);
    }
}
