//! TypeScript declarations for enums and table rows.

use crate::case::{camel_case, pascal_case};
use crate::schema::{Column, Table};
use crate::types::EnumType;

const INDENT: &str = "  ";

/// Render every enum once, followed by one interface per table.
pub fn generate(custom_types: &[EnumType], tables: &[Table]) -> String {
    let mut blocks: Vec<String> = custom_types.iter().map(render_enum).collect();
    blocks.extend(tables.iter().map(|t| render_interface(t, custom_types)));

    let mut output = blocks.join("\n\n");
    if !output.is_empty() {
        output.push('\n');
    }
    output
}

pub fn render_enum(enum_type: &EnumType) -> String {
    let mut output = format!("export enum {} {{\n", enum_type.type_name);
    let mut members: Vec<String> = Vec::new();

    for value in enum_type.values() {
        let base = pascal_case(value);
        let mut member = base.clone();
        let mut n = 2;
        while members.contains(&member) {
            member = format!("{}{}", base, n);
            n += 1;
        }
        output.push_str(&format!(
            "{}{} = '{}',\n",
            INDENT,
            member,
            value.replace('\\', "\\\\").replace('\'', "\\'")
        ));
        members.push(member);
    }

    output.push('}');
    output
}

pub fn render_interface(table: &Table, custom_types: &[EnumType]) -> String {
    let mut output = format!("export interface {} {{\n", table.type_name);
    for column in &table.columns {
        output.push_str(&format!(
            "{}{}: {};\n",
            INDENT,
            camel_case(&column.name),
            field_type(table, column, custom_types)
        ));
    }
    output.push('}');
    output
}

fn field_type(table: &Table, column: &Column, custom_types: &[EnumType]) -> String {
    // Enum columns name the registered declaration, which is the one emitted.
    let base = match column.typ.as_enum() {
        Some(e) => custom_types
            .iter()
            .find(|t| t.name == e.name)
            .map_or(e.type_name.as_str(), |t| t.type_name.as_str()),
        None => column.typ.ts_name(),
    };

    if table.is_nullable(column) {
        format!("{} | null", base)
    } else {
        base.to_string()
    }
}
