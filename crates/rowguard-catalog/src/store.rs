//! Store trait for existence queries against persisted rows

use std::collections::HashMap;

use rowguard_rules::{Record, Value};
use tracing::trace;

use crate::catalog::ColumnRef;
use crate::error::StoreError;

/// Read-only handle onto whatever transaction the caller has open.
///
/// Implementations must not open, commit or roll back transactions.
pub trait Store {
    /// Whether a row of `table` matches every `(column, value)` pair in `filter`,
    /// ignoring any row whose `excluding` column equals the given value.
    fn exists(
        &self,
        table: &str,
        filter: &[(&ColumnRef, &Value)],
        excluding: Option<(&ColumnRef, &Value)>,
    ) -> Result<bool, StoreError>;
}

impl<S: Store + ?Sized> Store for &S {
    fn exists(
        &self,
        table: &str,
        filter: &[(&ColumnRef, &Value)],
        excluding: Option<(&ColumnRef, &Value)>,
    ) -> Result<bool, StoreError> {
        (**self).exists(table, filter, excluding)
    }
}

/// Rows held in memory, keyed by table name
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: HashMap<String, Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: impl Into<String>, row: Record) {
        self.rows.entry(table.into()).or_default().push(row);
    }

    pub fn rows(&self, table: &str) -> &[Record] {
        self.rows.get(table).map(Vec::as_slice).unwrap_or(&[])
    }
}

// NULL never compares equal, as in SQL
fn sql_eq(left: Option<&Value>, right: &Value) -> bool {
    match left {
        Some(left) => !left.is_null() && !right.is_null() && left == right,
        None => false,
    }
}

impl Store for MemoryStore {
    fn exists(
        &self,
        table: &str,
        filter: &[(&ColumnRef, &Value)],
        excluding: Option<(&ColumnRef, &Value)>,
    ) -> Result<bool, StoreError> {
        let found = self.rows(table).iter().any(|row| {
            let matches = filter
                .iter()
                .all(|(column, value)| sql_eq(row.get(&column.name), value));
            let excluded = excluding
                .map(|(column, value)| sql_eq(row.get(&column.name), value))
                .unwrap_or(false);
            matches && !excluded
        });

        trace!(table, found, "memory store existence check");
        Ok(found)
    }
}
