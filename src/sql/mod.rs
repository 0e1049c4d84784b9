//! PostgreSQL DDL generation.

mod create;
mod drop;

pub use create::{create_enum, create_extension, create_script, create_table};
pub use drop::drop_script;

/// Join statement blocks with a blank line, skipping empty blocks.
fn join_blocks(blocks: &[String]) -> String {
    let mut output = String::new();
    for block in blocks.iter().filter(|b| !b.is_empty()) {
        if !output.is_empty() {
            output.push('\n');
        }
        output.push_str(block);
        output.push('\n');
    }
    output
}

/// `"name"`, doubling embedded quotes.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}
