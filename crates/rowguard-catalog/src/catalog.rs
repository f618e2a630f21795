//! Catalog trait and column metadata for mapped tables

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::CatalogError;
use crate::types::StorageType;

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRef {
    pub name: String,
    pub storage_type: StorageType,
    pub nullable: bool,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub primary_key: bool,
}

impl ColumnRef {
    /// Nullable, non-unique column
    pub fn new(name: impl Into<String>, storage_type: StorageType) -> Self {
        Self {
            name: name.into(),
            storage_type,
            nullable: true,
            unique: false,
            primary_key: false,
        }
    }

    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Primary key columns are implicitly non-nullable
    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.nullable = false;
        self
    }

    pub fn max_length(&self) -> Option<u32> {
        self.storage_type.max_length()
    }
}

/// Table metadata; columns are kept in catalog (ordinal) order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub name: String,
    pub columns: Vec<ColumnRef>,
}

impl TableInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
        }
    }

    pub fn column(mut self, column: ColumnRef) -> Self {
        self.columns.push(column);
        self
    }

    pub fn find_column(&self, name: &str) -> Option<&ColumnRef> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn primary_key(&self) -> Vec<&ColumnRef> {
        self.columns.iter().filter(|c| c.primary_key).collect()
    }
}

/// Read-only source of table metadata
pub trait Catalog {
    fn table(&self, table_name: &str) -> Result<TableInfo, CatalogError>;
}

impl<C: Catalog + ?Sized> Catalog for &C {
    fn table(&self, table_name: &str) -> Result<TableInfo, CatalogError> {
        (**self).table(table_name)
    }
}

/// A record type persisted in a named table
pub trait Model {
    fn table_name() -> &'static str;
}

/// Catalog backed by registered table definitions
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    tables: HashMap<String, TableInfo>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            tables: HashMap::new(),
        }
    }

    pub fn add_table(&mut self, table: TableInfo) {
        self.tables.insert(table.name.clone(), table);
    }

    pub fn with_table(mut self, table: TableInfo) -> Self {
        self.add_table(table);
        self
    }
}

impl Catalog for MemoryCatalog {
    fn table(&self, table_name: &str) -> Result<TableInfo, CatalogError> {
        self.tables
            .get(table_name)
            .cloned()
            .ok_or_else(|| CatalogError::TableNotFound(table_name.to_string()))
    }
}
