//! Name → schema lookup, filled once at feature-registration time.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::debug;

use super::table::TableSchema;
use crate::errors::{ValidationError, ValidationResult};

#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Arc<TableSchema>>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema. A second schema with the same table name is rejected.
    pub fn register(&mut self, schema: TableSchema) -> ValidationResult<Arc<TableSchema>> {
        let name = schema.name().to_string();
        if self.schemas.contains_key(&name) {
            return Err(ValidationError::DuplicateTable { table: name });
        }
        let schema = Arc::new(schema);
        debug!(table = %name, columns = schema.columns().len(), "schema registered");
        self.schemas.insert(name, Arc::clone(&schema));
        Ok(schema)
    }

    pub fn get(&self, table: &str) -> ValidationResult<&Arc<TableSchema>> {
        self.schemas
            .get(table)
            .ok_or_else(|| ValidationError::UnknownTable {
                table: table.to_string(),
            })
    }

    pub fn contains(&self, table: &str) -> bool {
        self.schemas.contains_key(table)
    }

    /// Registered table names, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<TableSchema>> {
        self.schemas.values()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}
