//! Syntax tree for schema source files, and its lowering into a registry.

use crate::case::pascal_case;
use crate::error::SchemaError;
use crate::registry::SchemaRegistry;
use crate::schema::{Column, ColumnDefault, ForeignKey, ReferentialAction, Table};
use crate::types::{EnumType, ValueType};
use std::collections::HashMap;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub extensions: Vec<String>,
    pub enums: Vec<EnumDecl>,
    pub tables: Vec<TableDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnumDecl {
    pub name: String,
    pub type_name: Option<String>,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDecl {
    pub name: String,
    pub type_name: Option<String>,
    pub columns: Vec<ColumnDecl>,
    pub constraints: Vec<Constraint>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnDecl {
    pub name: String,
    pub typ: TypeRef,
    pub modifiers: Vec<ColumnModifier>,
}

/// A type as written: `varchar(255)`, `order_status`.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeRef {
    pub name: String,
    pub length: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ColumnModifier {
    Pk,
    NotNull,
    Null,
    Default(ColumnDefault),
    Fk {
        target: String,
        column: String,
        on_delete: Option<ReferentialAction>,
        on_update: Option<ReferentialAction>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    PrimaryKey(Vec<String>),
    ForeignKey(ForeignKey),
    Check { name: String, expr: String },
}

impl Document {
    /// Resolve type names and register everything in a fresh registry.
    pub fn into_registry(self) -> Result<SchemaRegistry, SchemaError> {
        // Keyed by lowercased name; type names resolve case-insensitively.
        let mut enums: HashMap<String, EnumType> = HashMap::new();
        for decl in &self.enums {
            // varchar only resolves with a length
            if ValueType::from_name(&decl.name, Some(1)).is_some() {
                return Err(SchemaError::ReservedTypeName(decl.name.clone()));
            }
            let key = decl.name.to_lowercase();
            if enums.contains_key(&key) {
                return Err(SchemaError::DuplicateEnum(decl.name.clone()));
            }
            let mut e = EnumType::new(decl.name.as_str(), decl.values.iter().cloned());
            if let Some(type_name) = &decl.type_name {
                e = e.with_type_name(type_name.as_str());
            }
            enums.insert(key, e);
        }

        let tables = self
            .tables
            .iter()
            .map(|decl| lower_table(decl, &enums))
            .collect::<Result<Vec<_>, _>>()?;

        for decl in &self.enums {
            let used = tables
                .iter()
                .flat_map(|t| &t.columns)
                .any(|c| c.typ.as_enum().is_some_and(|e| e.name == decl.name));
            if !used {
                warn!("Enum {} is not used by any column and will not be emitted", decl.name);
            }
        }

        let mut registry = SchemaRegistry::new();
        for extension in self.extensions {
            registry.add_extension(extension);
        }
        registry.add_tables(tables)?;
        Ok(registry)
    }
}

fn resolve_type(typ: &TypeRef, enums: &HashMap<String, EnumType>) -> Result<ValueType, SchemaError> {
    if let Some(value_type) = ValueType::from_name(&typ.name, typ.length) {
        return Ok(value_type);
    }
    match enums.get(&typ.name.to_lowercase()) {
        Some(e) if typ.length.is_none() => Ok(ValueType::enumeration(e.clone())),
        _ => Err(SchemaError::UnsupportedType(match typ.length {
            Some(n) => format!("{}({})", typ.name, n),
            None => typ.name.clone(),
        })),
    }
}

fn lower_table(decl: &TableDecl, enums: &HashMap<String, EnumType>) -> Result<Table, SchemaError> {
    let type_name = decl
        .type_name
        .clone()
        .unwrap_or_else(|| pascal_case(&decl.name));
    let mut table = Table::new(decl.name.as_str(), type_name);

    for col in &decl.columns {
        let mut column = Column::new(col.name.as_str(), resolve_type(&col.typ, enums)?);
        for modifier in &col.modifiers {
            match modifier {
                ColumnModifier::Pk => {
                    column.nullable = false;
                    table.primary_key.push(col.name.clone());
                }
                ColumnModifier::NotNull => column.nullable = false,
                ColumnModifier::Null => column.nullable = true,
                ColumnModifier::Default(default) => column.default = Some(default.clone()),
                ColumnModifier::Fk {
                    target,
                    column: foreign,
                    on_delete,
                    on_update,
                } => table.foreign_keys.push(ForeignKey {
                    columns: vec![(col.name.clone(), foreign.clone())],
                    target: target.clone(),
                    on_delete: *on_delete,
                    on_update: *on_update,
                }),
            }
        }
        table.columns.push(column);
    }

    for constraint in &decl.constraints {
        table = match constraint {
            Constraint::PrimaryKey(cols) => {
                for column in table.columns.iter_mut().filter(|c| cols.contains(&c.name)) {
                    column.nullable = false;
                }
                table.primary_key(cols.iter().cloned())
            }
            Constraint::ForeignKey(fk) => table.foreign_key(fk.clone()),
            Constraint::Check { name, expr } => table.check(name.as_str(), expr.as_str()),
        };
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, typ: &str, modifiers: Vec<ColumnModifier>) -> ColumnDecl {
        ColumnDecl {
            name: name.into(),
            typ: TypeRef {
                name: typ.into(),
                length: None,
            },
            modifiers,
        }
    }

    #[test]
    fn test_lowering() {
        let doc = Document {
            extensions: vec!["pgcrypto".into()],
            enums: vec![EnumDecl {
                name: "user_role".into(),
                type_name: Some("Role".into()),
                values: vec!["admin".into(), "member".into()],
            }],
            tables: vec![TableDecl {
                name: "user_accounts".into(),
                type_name: None,
                columns: vec![
                    column("id", "uuid", vec![ColumnModifier::Pk]),
                    column("role", "user_role", vec![ColumnModifier::NotNull]),
                    column("bio", "text", vec![]),
                ],
                constraints: vec![],
            }],
        };

        let registry = doc.into_registry().unwrap();
        let table = registry.table("user_accounts").unwrap();
        assert_eq!(table.type_name, "UserAccounts");
        assert_eq!(table.primary_key, vec!["id"]);
        assert!(!table.columns[0].nullable);
        assert!(!table.columns[1].nullable);
        assert!(table.columns[2].nullable);
        assert_eq!(registry.custom_types()[0].type_name, "Role");
        assert_eq!(registry.extensions(), &["pgcrypto"]);
    }

    fn status_enum(values: &[&str]) -> EnumDecl {
        EnumDecl {
            name: "status".into(),
            type_name: None,
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }

    fn table(name: &str, columns: Vec<ColumnDecl>, constraints: Vec<Constraint>) -> TableDecl {
        TableDecl {
            name: name.into(),
            type_name: None,
            columns,
            constraints,
        }
    }

    #[test]
    fn test_table_primary_key_implies_not_null() {
        let doc = Document {
            tables: vec![table(
                "items",
                vec![column("id", "integer", vec![]), column("note", "text", vec![])],
                vec![Constraint::PrimaryKey(vec!["id".into()])],
            )],
            ..Document::default()
        };
        let registry = doc.into_registry().unwrap();
        let items = registry.table("items").unwrap();
        assert!(!items.columns[0].nullable);
        assert!(items.columns[1].nullable);
    }

    #[test]
    fn test_enum_declared_twice() {
        let doc = Document {
            enums: vec![status_enum(&["a", "b"]), status_enum(&["x", "y"])],
            tables: vec![table(
                "t",
                vec![
                    column("id", "integer", vec![ColumnModifier::Pk]),
                    column("v", "status", vec![]),
                ],
                vec![],
            )],
            ..Document::default()
        };
        let err = doc.into_registry().unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateEnum(ref name) if name == "status"));
    }

    #[test]
    fn test_enum_names_ignore_case() {
        let doc = Document {
            enums: vec![status_enum(&["on", "off"])],
            tables: vec![table(
                "t",
                vec![
                    column("id", "integer", vec![ColumnModifier::Pk]),
                    column("v", "Status", vec![]),
                ],
                vec![],
            )],
            ..Document::default()
        };
        let registry = doc.into_registry().unwrap();
        let typ = &registry.table("t").unwrap().columns[1].typ;
        assert_eq!(typ.as_enum().map(|e| e.name.as_str()), Some("status"));
    }

    #[test]
    fn test_enum_cannot_shadow_builtin_type() {
        for name in ["text", "TEXT", "varchar", "int4"] {
            let doc = Document {
                enums: vec![EnumDecl {
                    name: name.into(),
                    type_name: None,
                    values: vec!["a".into()],
                }],
                ..Document::default()
            };
            let err = doc.into_registry().unwrap_err();
            assert!(matches!(err, SchemaError::ReservedTypeName(ref n) if n == name));
        }
    }

    #[test]
    fn test_unknown_type() {
        let doc = Document {
            tables: vec![TableDecl {
                name: "t".into(),
                type_name: None,
                columns: vec![column("id", "money", vec![ColumnModifier::Pk])],
                constraints: vec![],
            }],
            ..Document::default()
        };
        let err = doc.into_registry().unwrap_err();
        assert!(matches!(err, SchemaError::UnsupportedType(ref name) if name == "money"));
    }

    #[test]
    fn test_inline_foreign_key() {
        let doc = Document {
            tables: vec![
                TableDecl {
                    name: "users".into(),
                    type_name: None,
                    columns: vec![column("id", "integer", vec![ColumnModifier::Pk])],
                    constraints: vec![],
                },
                TableDecl {
                    name: "posts".into(),
                    type_name: None,
                    columns: vec![
                        column("id", "integer", vec![ColumnModifier::Pk]),
                        column(
                            "author_id",
                            "integer",
                            vec![ColumnModifier::Fk {
                                target: "users".into(),
                                column: "id".into(),
                                on_delete: Some(ReferentialAction::Cascade),
                                on_update: None,
                            }],
                        ),
                    ],
                    constraints: vec![],
                },
            ],
            ..Document::default()
        };
        let registry = doc.into_registry().unwrap();
        let posts = registry.table("posts").unwrap();
        assert_eq!(posts.foreign_keys.len(), 1);
        assert_eq!(
            posts.foreign_keys[0].columns,
            vec![("author_id".to_string(), "id".to_string())]
        );
    }
}
