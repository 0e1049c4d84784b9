//! The schema aggregate: tables, extensions and derived custom types.

use crate::error::{SchemaError, TableProblems, ValidationError};
use crate::schema::Table;
use crate::sql;
use crate::types::EnumType;
use crate::typescript;
use crate::validate::{Resolution, validate_schema, validate_table};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: Vec<Table>,
    extensions: Vec<String>,
    custom_types: Vec<EnumType>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_extension(&mut self, name: impl Into<String>) {
        let name = name.into();
        if !self.extensions.contains(&name) {
            debug!("Registered extension {}", name);
            self.extensions.push(name);
        }
    }

    /// Validate and register a table.
    ///
    /// Foreign keys may point at tables that are not registered yet; those are
    /// resolved when the schema is generated.
    pub fn add_table(&mut self, mut table: Table) -> Result<(), SchemaError> {
        if self.table(&table.name).is_some() {
            return Err(SchemaError::DuplicateTable(table.name));
        }

        table.dedup_primary_key();

        let problems = validate_table(&table, &self.tables, Resolution::Deferred);
        if !problems.is_empty() {
            warn!("Rejected table {}: {} problem(s)", table.name, problems.len());
            return Err(ValidationError {
                tables: vec![TableProblems {
                    table: table.name,
                    problems,
                }],
            }
            .into());
        }

        for column in &table.columns {
            if let Some(enum_type) = column.typ.as_enum() {
                self.register_custom_type(enum_type);
            }
        }

        debug!("Registered table {} ({} columns)", table.name, table.columns.len());
        self.tables.push(table);
        Ok(())
    }

    /// Register tables in order, stopping at the first failure. Tables before
    /// the failing one stay registered.
    pub fn add_tables<I>(&mut self, tables: I) -> Result<(), SchemaError>
    where
        I: IntoIterator<Item = Table>,
    {
        for table in tables {
            self.add_table(table)?;
        }
        Ok(())
    }

    fn register_custom_type(&mut self, enum_type: &EnumType) {
        match self.custom_types.iter().find(|t| t.name == enum_type.name) {
            Some(existing) => {
                if existing.values() != enum_type.values() || existing.type_name != enum_type.type_name
                {
                    warn!(
                        "Enum {} redeclared with a different definition; keeping the first",
                        enum_type.name
                    );
                }
            }
            None => {
                debug!("Registered custom type {}", enum_type.name);
                self.custom_types.push(enum_type.clone());
            }
        }
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Enums in the order they were first seen.
    pub fn custom_types(&self) -> &[EnumType] {
        &self.custom_types
    }

    /// Run every check against the schema as it stands now.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_schema(&self.tables, &self.custom_types).inspect_err(|err| {
            warn!("Schema validation failed for {} table(s)", err.tables.len());
        })
    }

    pub fn generate_sql_schema(&self) -> Result<String, SchemaError> {
        self.validate()?;
        debug!("Generating SQL schema for {} table(s)", self.tables.len());
        Ok(sql::create_script(
            &self.extensions,
            &self.custom_types,
            &self.tables,
        ))
    }

    pub fn generate_typescript(&self) -> Result<String, SchemaError> {
        self.validate()?;
        debug!("Generating TypeScript for {} table(s)", self.tables.len());
        Ok(typescript::generate(&self.custom_types, &self.tables))
    }

    pub fn generate_drop_sql(&self) -> Result<String, SchemaError> {
        self.validate()?;
        debug!("Generating drop script for {} table(s)", self.tables.len());
        Ok(sql::drop_script(
            &self.extensions,
            &self.custom_types,
            &self.tables,
        ))
    }
}
