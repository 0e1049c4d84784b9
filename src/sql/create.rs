//! CREATE statements.

use super::{join_blocks, quote_ident, quote_literal};
use crate::schema::{Column, ColumnDefault, ForeignKey, Table};
use crate::types::EnumType;

/// Render the full creation script: extensions, then enum types, then tables.
pub fn create_script(extensions: &[String], custom_types: &[EnumType], tables: &[Table]) -> String {
    let extensions: Vec<String> = extensions.iter().map(|e| create_extension(e)).collect();
    let types: Vec<String> = custom_types.iter().map(create_enum).collect();
    let tables: Vec<String> = tables.iter().map(create_table).collect();

    join_blocks(&[extensions.join("\n"), types.join("\n"), tables.join("\n\n")])
}

pub fn create_extension(name: &str) -> String {
    format!("CREATE EXTENSION IF NOT EXISTS {};", quote_ident(name))
}

pub fn create_enum(enum_type: &EnumType) -> String {
    let values: Vec<String> = enum_type.values().iter().map(|v| quote_literal(v)).collect();
    format!(
        "CREATE TYPE {} AS ENUM ({});",
        enum_type.name,
        values.join(", ")
    )
}

pub fn create_table(table: &Table) -> String {
    let mut lines: Vec<String> = table
        .columns
        .iter()
        .map(|column| column_def(table, column))
        .collect();

    if !table.primary_key.is_empty() {
        lines.push(format!("PRIMARY KEY ({})", table.primary_key.join(", ")));
    }
    for fk in &table.foreign_keys {
        lines.push(foreign_key_def(fk));
    }
    for check in &table.checks {
        lines.push(format!("CONSTRAINT {} CHECK ({})", check.name, check.expr));
    }

    let mut output = format!("CREATE TABLE {} (\n", table.name);
    output.push_str(
        &lines
            .iter()
            .map(|line| format!("    {}", line))
            .collect::<Vec<_>>()
            .join(",\n"),
    );
    output.push_str("\n);");
    output
}

fn column_def(table: &Table, column: &Column) -> String {
    let mut def = format!("{} {}", column.name, column.typ.sql_name());
    if !table.is_nullable(column) {
        def.push_str(" NOT NULL");
    }
    match &column.default {
        Some(ColumnDefault::Literal(literal)) => def.push_str(&format!(" DEFAULT {}", literal)),
        Some(ColumnDefault::Sql(expr)) => def.push_str(&format!(" DEFAULT {}", expr)),
        None => {}
    }
    def
}

fn foreign_key_def(fk: &ForeignKey) -> String {
    let locals: Vec<&str> = fk.local_columns().collect();
    let foreigns: Vec<&str> = fk.foreign_columns().collect();
    format!(
        "FOREIGN KEY ({}) REFERENCES {} ({}) ON DELETE {} ON UPDATE {}",
        locals.join(", "),
        fk.target,
        foreigns.join(", "),
        fk.on_delete.unwrap_or_default().as_sql(),
        fk.on_update.unwrap_or_default().as_sql()
    )
}
