//! Column value types and their SQL / TypeScript renderings.

use crate::case::pascal_case;
use std::fmt;

/// A user-declared enumeration.
///
/// Declare each logical enum once and clone the value into every column that
/// uses it. Two enums are the same type when they share a SQL name.
#[derive(Debug, Clone)]
pub struct EnumType {
    /// SQL type name, e.g. `order_status`.
    pub name: String,
    /// TypeScript enum name, e.g. `OrderStatus`.
    pub type_name: String,
    values: Vec<String>,
}

impl EnumType {
    /// Create an enum whose TypeScript name is the Pascal case of `name`.
    /// Repeated values are dropped, keeping the first occurrence.
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let type_name = pascal_case(&name);
        let mut distinct: Vec<String> = Vec::new();
        for value in values {
            let value = value.into();
            if !distinct.contains(&value) {
                distinct.push(value);
            }
        }
        Self {
            name,
            type_name,
            values: distinct,
        }
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl PartialEq for EnumType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for EnumType {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    SmallInt,
    Integer,
    BigInt,
    Real,
    DoublePrecision,
    Boolean,
    Timestamp,
    Date,
    Text,
    Uuid,
    Jsonb,
    SmallSerial,
    Serial,
    BigSerial,
    Char(u32),
    VarChar(u32),
    Enum(EnumType),
}

impl ValueType {
    pub fn char(length: u32) -> Self {
        Self::Char(length)
    }

    pub fn varchar(length: u32) -> Self {
        Self::VarChar(length)
    }

    pub fn enumeration(enum_type: EnumType) -> Self {
        Self::Enum(enum_type)
    }

    /// Resolve a built-in PostgreSQL type name (case-insensitive, common
    /// aliases accepted). Enums are not resolved here.
    pub fn from_name(name: &str, length: Option<u32>) -> Option<Self> {
        let lower = name.to_lowercase();
        let typ = match lower.as_str() {
            // Integer types
            "smallint" | "int2" => Self::SmallInt,
            "integer" | "int" | "int4" => Self::Integer,
            "bigint" | "int8" => Self::BigInt,
            "smallserial" | "serial2" => Self::SmallSerial,
            "serial" | "serial4" => Self::Serial,
            "bigserial" | "serial8" => Self::BigSerial,

            // Floating point
            "real" | "float4" => Self::Real,
            "double precision" | "double" | "float8" => Self::DoublePrecision,

            // String types
            "text" => Self::Text,
            "char" | "character" => Self::Char(length.unwrap_or(1)),
            "varchar" | "character varying" => Self::VarChar(length?),

            // Date/time
            "timestamp" | "timestamp without time zone" => Self::Timestamp,
            "date" => Self::Date,

            "boolean" | "bool" => Self::Boolean,
            "uuid" => Self::Uuid,
            "jsonb" => Self::Jsonb,

            _ => return None,
        };
        Some(typ)
    }

    /// Type name as written in a column definition.
    pub fn sql_name(&self) -> String {
        match self {
            Self::SmallInt => "SMALLINT".to_string(),
            Self::Integer => "INTEGER".to_string(),
            Self::BigInt => "BIGINT".to_string(),
            Self::Real => "REAL".to_string(),
            Self::DoublePrecision => "DOUBLE PRECISION".to_string(),
            Self::Boolean => "BOOLEAN".to_string(),
            Self::Timestamp => "TIMESTAMP".to_string(),
            Self::Date => "DATE".to_string(),
            Self::Text => "TEXT".to_string(),
            Self::Uuid => "UUID".to_string(),
            Self::Jsonb => "JSONB".to_string(),
            Self::SmallSerial => "SMALLSERIAL".to_string(),
            Self::Serial => "SERIAL".to_string(),
            Self::BigSerial => "BIGSERIAL".to_string(),
            Self::Char(n) => format!("CHAR({})", n),
            Self::VarChar(n) => format!("VARCHAR({})", n),
            Self::Enum(e) => e.name.clone(),
        }
    }

    /// Type name used for a TypeScript field of this type.
    pub fn ts_name(&self) -> &str {
        match self {
            Self::SmallInt
            | Self::Integer
            | Self::Real
            | Self::DoublePrecision
            | Self::SmallSerial
            | Self::Serial => "number",
            // node-postgres hands 64-bit integers back as strings
            Self::BigInt | Self::BigSerial => "string",
            Self::Boolean => "boolean",
            Self::Timestamp | Self::Date => "Date",
            Self::Text | Self::Uuid | Self::Char(_) | Self::VarChar(_) => "string",
            Self::Jsonb => "unknown",
            Self::Enum(e) => &e.type_name,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumType> {
        match self {
            Self::Enum(e) => Some(e),
            _ => None,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.sql_name())
    }
}
