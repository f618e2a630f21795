//! Table metadata read from DuckDB's information schema

use duckdb::{params, Connection, Result as DuckResult};
use rowguard_catalog::{Catalog, CatalogError, ColumnRef, StorageType, TableInfo};
use std::collections::HashSet;
use tracing::debug;

/// Catalog backed by a DuckDB connection.
///
/// Reads `information_schema.columns` for column types and nullability, and
/// `duckdb_constraints()` for primary key and unique constraints.
pub struct DuckCatalog<'a> {
    conn: &'a Connection,
}

struct KeyColumns {
    primary_key: HashSet<String>,
    unique: HashSet<String>,
}

impl<'a> DuckCatalog<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// All base tables in the `main` schema
    pub fn table_names(&self) -> Result<Vec<String>, CatalogError> {
        self.query_table_names().map_err(database_error)
    }

    fn query_table_names(&self) -> DuckResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = 'main' AND table_type = 'BASE TABLE' \
             ORDER BY table_name",
        )?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<DuckResult<Vec<String>>>()?;
        Ok(names)
    }

    fn query_columns(&self, table: &str) -> DuckResult<Vec<(String, String, String, Option<i64>)>> {
        let mut stmt = self.conn.prepare(
            "SELECT column_name, data_type, is_nullable, character_maximum_length \
             FROM information_schema.columns \
             WHERE table_schema = 'main' AND table_name = ? \
             ORDER BY ordinal_position",
        )?;
        let columns = stmt
            .query_map(params![table], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<i64>>(3)?,
                ))
            })?
            .collect::<DuckResult<Vec<_>>>()?;
        Ok(columns)
    }

    fn query_key_columns(&self, table: &str) -> DuckResult<KeyColumns> {
        // one row per constrained column; `width` tells single-column UNIQUE apart
        let mut stmt = self.conn.prepare(
            "SELECT constraint_type, len(constraint_column_names) AS width, \
                    unnest(constraint_column_names) AS column_name \
             FROM duckdb_constraints() \
             WHERE schema_name = 'main' AND table_name = ? \
               AND constraint_type IN ('PRIMARY KEY', 'UNIQUE')",
        )?;
        let rows = stmt
            .query_map(params![table], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?
            .collect::<DuckResult<Vec<_>>>()?;

        let mut keys = KeyColumns {
            primary_key: HashSet::new(),
            unique: HashSet::new(),
        };
        for (constraint_type, width, column) in rows {
            match constraint_type.as_str() {
                "PRIMARY KEY" => {
                    keys.primary_key.insert(column);
                }
                "UNIQUE" if width == 1 => {
                    keys.unique.insert(column);
                }
                _ => {}
            }
        }
        Ok(keys)
    }
}

impl Catalog for DuckCatalog<'_> {
    fn table(&self, name: &str) -> Result<TableInfo, CatalogError> {
        let columns = self.query_columns(name).map_err(database_error)?;
        if columns.is_empty() {
            return Err(CatalogError::TableNotFound(name.to_string()));
        }
        let keys = self.query_key_columns(name).map_err(database_error)?;

        let mut table = TableInfo::new(name);
        for (column_name, data_type, is_nullable, max_length) in columns {
            let storage_type = match (StorageType::parse(&data_type), max_length) {
                (StorageType::Varchar(None), Some(len)) => StorageType::Varchar(u32::try_from(len).ok()),
                (storage_type, _) => storage_type,
            };

            let mut column = ColumnRef::new(column_name, storage_type);
            column.nullable = is_nullable == "YES";
            if keys.unique.contains(&column.name) {
                column = column.unique();
            }
            if keys.primary_key.contains(&column.name) {
                column = column.primary_key();
            }
            table = table.column(column);
        }

        debug!(
            table = name,
            columns = table.columns.len(),
            primary_key = keys.primary_key.len(),
            "loaded table metadata"
        );
        Ok(table)
    }
}

fn database_error(err: duckdb::Error) -> CatalogError {
    CatalogError::Database(err.to_string())
}
