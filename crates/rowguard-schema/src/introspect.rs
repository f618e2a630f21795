//! Column and identity lookup for one mapped table

use rowguard_catalog::{Catalog, ColumnRef, TableInfo};

use crate::error::SchemaError;

/// Snapshot of one table's catalog entry, queried by field name
#[derive(Debug, Clone)]
pub struct Introspector {
    table: TableInfo,
}

impl Introspector {
    /// Fetch table metadata once; later lookups do not touch the catalog again
    pub fn load(catalog: &dyn Catalog, table_name: &str) -> Result<Self, SchemaError> {
        Ok(Self {
            table: catalog.table(table_name)?,
        })
    }

    pub fn from_table(table: TableInfo) -> Self {
        Self { table }
    }

    pub fn table_name(&self) -> &str {
        &self.table.name
    }

    /// Columns in catalog order
    pub fn columns(&self) -> &[ColumnRef] {
        &self.table.columns
    }

    pub fn column(&self, name: &str) -> Result<&ColumnRef, SchemaError> {
        self.table
            .find_column(name)
            .ok_or_else(|| SchemaError::ColumnNotFound {
                table: self.table.name.clone(),
                column: name.to_string(),
            })
    }

    /// The single primary-key column. Composite keys are rejected.
    pub fn identity_column(&self) -> Result<&ColumnRef, SchemaError> {
        match self.table.primary_key().as_slice() {
            [identity] => Ok(*identity),
            [] => Err(SchemaError::MissingIdentity {
                table: self.table.name.clone(),
            }),
            columns => Err(SchemaError::CompositeIdentity {
                table: self.table.name.clone(),
                columns: columns.iter().map(|c| c.name.clone()).collect(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowguard_catalog::{MemoryCatalog, StorageType};

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new()
            .with_table(
                TableInfo::new("users")
                    .column(ColumnRef::new("id", StorageType::Integer).primary_key())
                    .column(ColumnRef::new("name", StorageType::Varchar(None)).not_null()),
            )
            .with_table(
                TableInfo::new("memberships")
                    .column(ColumnRef::new("user_id", StorageType::Integer).primary_key())
                    .column(ColumnRef::new("group_id", StorageType::Integer).primary_key()),
            )
            .with_table(TableInfo::new("logs").column(ColumnRef::new("line", StorageType::Text)))
    }

    #[test]
    fn test_column_lookup() {
        let introspector = Introspector::load(&catalog(), "users").unwrap();
        assert_eq!(introspector.column("name").unwrap().name, "name");
        assert_eq!(introspector.identity_column().unwrap().name, "id");
    }

    #[test]
    fn test_missing_column_names_table_and_field() {
        let introspector = Introspector::load(&catalog(), "users").unwrap();
        let err = introspector.column("nickname").unwrap_err();
        assert!(matches!(
            err,
            SchemaError::ColumnNotFound { ref table, ref column } if table == "users" && column == "nickname"
        ));
    }

    #[test]
    fn test_composite_identity_rejected() {
        let introspector = Introspector::load(&catalog(), "memberships").unwrap();
        assert!(matches!(
            introspector.identity_column(),
            Err(SchemaError::CompositeIdentity { columns, .. }) if columns == vec!["user_id", "group_id"]
        ));
    }

    #[test]
    fn test_missing_identity_rejected() {
        let introspector = Introspector::load(&catalog(), "logs").unwrap();
        assert!(matches!(introspector.identity_column(), Err(SchemaError::MissingIdentity { .. })));
    }

    #[test]
    fn test_unknown_table() {
        assert!(matches!(
            Introspector::load(&catalog(), "ghosts"),
            Err(SchemaError::Catalog(_))
        ));
    }
}
