//! Structural and referential checks over tables.

use crate::case::camel_case;
use crate::error::{Problem, TableProblems, ValidationError};
use crate::schema::Table;
use crate::types::EnumType;

/// How foreign-key targets that are not in the table list are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A table being registered may point at tables registered later.
    Deferred,
    /// Every target must exist.
    Complete,
}

/// Check one table against `tables`, the rest of the schema.
pub fn validate_table(table: &Table, tables: &[Table], resolution: Resolution) -> Vec<Problem> {
    let mut problems = Vec::new();

    // 1. Duplicate columns
    let mut seen: Vec<&str> = Vec::new();
    let mut reported: Vec<&str> = Vec::new();
    for column in &table.columns {
        let name = column.name.as_str();
        if seen.contains(&name) {
            if !reported.contains(&name) {
                problems.push(Problem::DuplicateColumn(name.to_string()));
                reported.push(name);
            }
        } else {
            seen.push(name);
        }
    }

    // Distinct columns must still give distinct interface fields
    let mut fields: Vec<(String, &str)> = Vec::new();
    for name in seen {
        let field = camel_case(name);
        match fields.iter().find(|(f, _)| *f == field) {
            Some((_, first)) => problems.push(Problem::FieldNameCollision {
                first: first.to_string(),
                second: name.to_string(),
                field,
            }),
            None => fields.push((field, name)),
        }
    }

    // 2. Primary key
    if table.primary_key.is_empty() {
        problems.push(Problem::MissingPrimaryKey);
    }
    for col in &table.primary_key {
        if table.get_column(col).is_none() {
            problems.push(Problem::UnknownPrimaryKeyColumn(col.clone()));
        }
    }

    // 3. Foreign keys
    let mut fk_columns: Vec<&str> = Vec::new();
    let mut fk_reported: Vec<&str> = Vec::new();
    for fk in &table.foreign_keys {
        if fk.columns.is_empty() {
            problems.push(Problem::EmptyForeignKey(fk.target.clone()));
            continue;
        }

        for local in fk.local_columns() {
            if table.get_column(local).is_none() {
                problems.push(Problem::UnknownForeignKeyColumn(local.to_string()));
            }
            if fk_columns.contains(&local) {
                if !fk_reported.contains(&local) {
                    problems.push(Problem::DuplicateForeignKeyColumn(local.to_string()));
                    fk_reported.push(local);
                }
            } else {
                fk_columns.push(local);
            }
        }

        let target = if fk.target == table.name {
            Some(table)
        } else {
            tables.iter().find(|t| t.name == fk.target)
        };
        let Some(target) = target else {
            if resolution == Resolution::Complete {
                problems.push(Problem::UnknownReferencedTable(fk.target.clone()));
            }
            continue;
        };

        for (local, foreign) in &fk.columns {
            let Some(foreign_col) = target.get_column(foreign) else {
                problems.push(Problem::UnknownReferencedColumn {
                    table: target.name.clone(),
                    column: foreign.clone(),
                });
                continue;
            };
            let Some(local_col) = table.get_column(local) else {
                continue;
            };
            if local_col.typ != foreign_col.typ {
                problems.push(Problem::ForeignKeyTypeMismatch {
                    column: local.clone(),
                    table: target.name.clone(),
                    foreign_column: foreign.clone(),
                    local_type: local_col.typ.sql_name(),
                    foreign_type: foreign_col.typ.sql_name(),
                });
            }
        }
    }

    // 4. Check constraint names
    let mut check_names: Vec<&str> = Vec::new();
    for check in &table.checks {
        if check_names.contains(&check.name.as_str()) {
            problems.push(Problem::DuplicateCheck(check.name.clone()));
        } else {
            check_names.push(&check.name);
        }
    }

    problems
}

/// Check every table, plus table-name and type-name uniqueness across the
/// schema. `custom_types` are the enums that will be emitted.
pub fn validate_schema(tables: &[Table], custom_types: &[EnumType]) -> Result<(), ValidationError> {
    let mut entries: Vec<TableProblems> = Vec::new();

    for (i, table) in tables.iter().enumerate() {
        let mut problems = Vec::new();
        let first = tables.iter().position(|t| t.name == table.name);
        if first != Some(i) {
            problems.push(Problem::DuplicateTable);
        }
        problems.extend(validate_table(table, tables, Resolution::Complete));
        problems.extend(type_name_problems(table, &tables[..i], custom_types));
        push_problems(&mut entries, &table.name, problems);
    }

    if entries.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { tables: entries })
    }
}

/// Tables and enums share one TypeScript namespace. A table is blamed when its
/// own type name is taken, or when it uses an enum whose type name an earlier
/// enum already claimed.
fn type_name_problems(table: &Table, earlier: &[Table], custom_types: &[EnumType]) -> Vec<Problem> {
    let mut problems = Vec::new();

    let taken_by_table = earlier
        .iter()
        .any(|t| t.name != table.name && t.type_name == table.type_name);
    let taken_by_enum = custom_types.iter().any(|e| e.type_name == table.type_name);
    if taken_by_table || taken_by_enum {
        problems.push(Problem::DuplicateTypeName(table.type_name.clone()));
    }

    for column in &table.columns {
        let Some(used) = column.typ.as_enum() else {
            continue;
        };
        let Some(pos) = custom_types.iter().position(|e| e.name == used.name) else {
            continue;
        };
        let type_name = &custom_types[pos].type_name;
        let problem = Problem::DuplicateTypeName(type_name.clone());
        if custom_types[..pos].iter().any(|e| &e.type_name == type_name) && !problems.contains(&problem) {
            problems.push(problem);
        }
    }

    problems
}

fn push_problems(entries: &mut Vec<TableProblems>, table: &str, problems: Vec<Problem>) {
    if problems.is_empty() {
        return;
    }
    match entries.iter_mut().find(|e| e.table == table) {
        Some(entry) => {
            for problem in problems {
                if !entry.problems.contains(&problem) {
                    entry.problems.push(problem);
                }
            }
        }
        None => entries.push(TableProblems {
            table: table.to_string(),
            problems,
        }),
    }
}
