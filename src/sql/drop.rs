//! DROP script, ordered so that dependents go first.

use super::{join_blocks, quote_ident};
use crate::schema::Table;
use crate::types::EnumType;

/// Tables in reverse registration order, then enum types, then extensions.
pub fn drop_script(extensions: &[String], custom_types: &[EnumType], tables: &[Table]) -> String {
    let tables: Vec<String> = tables
        .iter()
        .rev()
        .map(|t| format!("DROP TABLE IF EXISTS {};", t.name))
        .collect();
    let types: Vec<String> = custom_types
        .iter()
        .map(|t| format!("DROP TYPE IF EXISTS {};", t.name))
        .collect();
    let extensions: Vec<String> = extensions
        .iter()
        .map(|e| format!("DROP EXTENSION IF EXISTS {};", quote_ident(e)))
        .collect();

    join_blocks(&[tables.join("\n"), types.join("\n"), extensions.join("\n")])
}
