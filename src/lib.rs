pub mod ast;
pub mod case;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod registry;
pub mod schema;
pub mod sql;
pub mod types;
pub mod typescript;
pub mod validate;

use wasm_bindgen::prelude::*;

pub use error::{Problem, SchemaError, TableProblems, ValidationError};
pub use parser::{ParseError, Parser};
pub use registry::SchemaRegistry;
pub use schema::{CheckConstraint, Column, ColumnDefault, ForeignKey, Literal, ReferentialAction, Table};
pub use types::{EnumType, ValueType};

/// Parse schema source and register everything it declares.
pub fn compile(source: &str) -> Result<SchemaRegistry, ParseError> {
    let document = Parser::new(source)?.parse()?;
    Ok(document.into_registry()?)
}

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Render schema source to a CREATE script
#[wasm_bindgen(js_name = "schemaToSql")]
pub fn schema_to_sql(source: &str) -> Result<String, String> {
    let registry = compile(source).map_err(|e| e.to_string())?;
    registry.generate_sql_schema().map_err(|e| e.to_string())
}

/// Render schema source to TypeScript declarations
#[wasm_bindgen(js_name = "schemaToTypeScript")]
pub fn schema_to_typescript(source: &str) -> Result<String, String> {
    let registry = compile(source).map_err(|e| e.to_string())?;
    registry.generate_typescript().map_err(|e| e.to_string())
}

/// Render schema source to a DROP script
#[wasm_bindgen(js_name = "schemaToDropSql")]
pub fn schema_to_drop_sql(source: &str) -> Result<String, String> {
    let registry = compile(source).map_err(|e| e.to_string())?;
    registry.generate_drop_sql().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOP: &str = r#"
        extension "uuid-ossp"

        enum order_status { pending, shipped, "in-progress" }

        table users as User {
            id uuid pk default uuid_generate_v4()
            email varchar(255) not null
            created_at timestamp not null default now()
        }

        table orders as Order {
            id integer pk
            user_id uuid not null fk -> users.id on delete cascade
            status order_status not null default "pending"
            shipped_at timestamp
            total integer not null default 0
            check non_negative_total "total >= 0"
        }

        table returns as Return {
            id serial pk
            order_id integer not null fk -> orders.id
            status order_status not null
        }
    "#;

    #[test]
    fn test_compile_to_sql() {
        let sql = schema_to_sql(SHOP).unwrap();
        let expected = r#"CREATE EXTENSION IF NOT EXISTS "uuid-ossp";

CREATE TYPE order_status AS ENUM ('pending', 'shipped', 'in-progress');

CREATE TABLE users (
    id UUID NOT NULL DEFAULT uuid_generate_v4(),
    email VARCHAR(255) NOT NULL,
    created_at TIMESTAMP NOT NULL DEFAULT now(),
    PRIMARY KEY (id)
);

CREATE TABLE orders (
    id INTEGER NOT NULL,
    user_id UUID NOT NULL,
    status order_status NOT NULL DEFAULT 'pending',
    shipped_at TIMESTAMP,
    total INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (id),
    FOREIGN KEY (user_id) REFERENCES users (id) ON DELETE CASCADE ON UPDATE NO ACTION,
    CONSTRAINT non_negative_total CHECK (total >= 0)
);

CREATE TABLE returns (
    id SERIAL NOT NULL,
    order_id INTEGER NOT NULL,
    status order_status NOT NULL,
    PRIMARY KEY (id),
    FOREIGN KEY (order_id) REFERENCES orders (id) ON DELETE NO ACTION ON UPDATE NO ACTION
);
"#;
        assert_eq!(sql, expected);
    }

    #[test]
    fn test_compile_to_typescript() {
        let ts = schema_to_typescript(SHOP).unwrap();
        let expected = "export enum OrderStatus {
  Pending = 'pending',
  Shipped = 'shipped',
  InProgress = 'in-progress',
}

export interface User {
  id: string;
  email: string;
  createdAt: Date;
}

export interface Order {
  id: number;
  userId: string;
  status: OrderStatus;
  shippedAt: Date | null;
  total: number;
}

export interface Return {
  id: number;
  orderId: number;
  status: OrderStatus;
}
";
        assert_eq!(ts, expected);
        assert_eq!(ts.matches("export enum").count(), 1);
    }

    #[test]
    fn test_compile_to_drop_sql() {
        let sql = schema_to_drop_sql(SHOP).unwrap();
        let expected = r#"DROP TABLE IF EXISTS returns;
DROP TABLE IF EXISTS orders;
DROP TABLE IF EXISTS users;

DROP TYPE IF EXISTS order_status;

DROP EXTENSION IF EXISTS "uuid-ossp";
"#;
        assert_eq!(sql, expected);
    }

    #[test]
    fn test_serial_does_not_match_integer() {
        let source = r#"
            table parents { id serial pk }
            table children {
                id serial pk
                parent_id integer fk -> parents.id
            }
        "#;
        let v = match compile(source).unwrap_err() {
            ParseError::Schema(SchemaError::Validation(v)) => v,
            other => panic!("expected validation error, got {other:?}"),
        };
        assert!(matches!(
            v.problems_for("children").unwrap()[0],
            Problem::ForeignKeyTypeMismatch { .. }
        ));
    }

    #[test]
    fn test_tables_in_any_order() {
        let source = r#"
            table posts {
                id integer pk
                author_id integer not null fk -> authors.id
            }
            table authors { id integer pk }
        "#;
        let registry = compile(source).unwrap();
        let sql = registry.generate_sql_schema().unwrap();
        assert!(sql.find("CREATE TABLE posts").unwrap() < sql.find("CREATE TABLE authors").unwrap());
    }

    #[test]
    fn test_dangling_reference_reported_on_generation() {
        let err = schema_to_sql("table t { id integer pk fk -> ghosts.id }").unwrap_err();
        assert!(err.contains("unknown table `ghosts`"));
    }

    #[test]
    fn test_demo_schema_compiles() {
        let registry = compile(include_str!("../demos/shop.schema")).unwrap();
        assert_eq!(registry.tables().len(), 5);
        assert_eq!(registry.extensions(), &["uuid-ossp", "pgcrypto"]);

        let sql = registry.generate_sql_schema().unwrap();
        assert!(sql.contains("PRIMARY KEY (order_id, product_id)"));
        assert!(sql.contains("sku CHAR(12) NOT NULL,"));

        let ts = registry.generate_typescript().unwrap();
        assert!(ts.contains("export enum UserRole {"));
        assert!(ts.contains("  InTransit = 'in-transit',"));
        assert!(ts.contains("  attributes: unknown | null;"));

        let drop = registry.generate_drop_sql().unwrap();
        assert!(drop.starts_with("DROP TABLE IF EXISTS order_items;"));
    }

    #[test]
    fn test_table_level_primary_key_is_not_null() {
        let source = "table items { id integer primary_key(id) }";
        let sql = schema_to_sql(source).unwrap();
        assert!(sql.contains("    id INTEGER NOT NULL,\n"));
        let ts = schema_to_typescript(source).unwrap();
        assert!(ts.contains("  id: number;\n"));
    }

    #[test]
    fn test_field_names_follow_column_names() {
        let ts = schema_to_typescript("table t { id integer pk createdAt timestamp }").unwrap();
        assert!(ts.contains("  createdAt: Date | null;\n"));

        let err = schema_to_typescript("table t { id integer pk user_id integer user__id text }").unwrap_err();
        assert!(err.contains("columns `user_id` and `user__id` both map to the field `userId`"));
    }

    #[test]
    fn test_enum_declared_twice_is_rejected() {
        let err = schema_to_typescript("enum s { a, b } enum s { x, y } table t { id integer pk v s }")
            .unwrap_err();
        assert_eq!(err, "Enum already declared: s");
    }

    #[test]
    fn test_enum_and_table_share_type_name() {
        let source = r#"
            enum order_status as Order { open, closed }
            table orders as Order {
                id integer pk
                status order_status not null
            }
        "#;
        let err = schema_to_typescript(source).unwrap_err();
        assert!(err.contains("type name `Order` is already used"));
    }

    #[test]
    fn test_unsupported_type_message() {
        let err = schema_to_sql("table t { id money pk }").unwrap_err();
        assert_eq!(err, "Unsupported type: money");
    }
}
