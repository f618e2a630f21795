//! Existence queries against a DuckDB connection

use chrono::Datelike;
use duckdb::types::Value as DuckValue;
use duckdb::{params_from_iter, Connection};
use rowguard_catalog::{ColumnRef, Store, StoreError, TypeFamily};
use rowguard_rules::Value;
use tracing::trace;

/// `NaiveDate::num_days_from_ce` of 1970-01-01; DuckDB dates count days from there
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Store over the caller's connection. Runs only `SELECT EXISTS` queries, inside
/// whatever transaction the connection already has open.
pub struct DuckStore<'a> {
    conn: &'a Connection,
}

impl<'a> DuckStore<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }
}

impl Store for DuckStore<'_> {
    fn exists(
        &self,
        table: &str,
        filter: &[(&ColumnRef, &Value)],
        excluding: Option<(&ColumnRef, &Value)>,
    ) -> Result<bool, StoreError> {
        let (sql, params) = exists_query(table, filter, excluding)?;
        trace!(sql = %sql, params = params.len(), "existence query");

        self.conn
            .query_row(&sql, params_from_iter(params), |row| row.get::<_, bool>(0))
            .map_err(|e| StoreError::Database(e.to_string()))
    }
}

fn exists_query(
    table: &str,
    filter: &[(&ColumnRef, &Value)],
    excluding: Option<(&ColumnRef, &Value)>,
) -> Result<(String, Vec<DuckValue>), StoreError> {
    let mut conditions = Vec::with_capacity(filter.len() + 1);
    let mut params = Vec::with_capacity(filter.len() + 1);

    for (column, value) in filter {
        conditions.push(format!("{} = ?", quote_ident(&column.name)));
        params.push(to_duck_value(value, column)?);
    }
    if let Some((column, value)) = excluding {
        conditions.push(format!("{} <> ?", quote_ident(&column.name)));
        params.push(to_duck_value(value, column)?);
    }

    let mut sql = format!("SELECT EXISTS (SELECT 1 FROM {}", quote_ident(table));
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push(')');

    Ok((sql, params))
}

fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Whether DuckDB can compare `value` with a column of `family` without a cast error
fn comparable(value: &Value, family: &TypeFamily) -> bool {
    match (value, family) {
        (Value::Bool(_), TypeFamily::Boolean) => true,
        (Value::Int(_), TypeFamily::Integer | TypeFamily::Float) => true,
        (Value::Float(_), TypeFamily::Float) => true,
        (Value::Str(_), TypeFamily::Text) => true,
        (Value::Date(_), TypeFamily::Date | TypeFamily::Timestamp) => true,
        (_, TypeFamily::Other) => true,
        _ => false,
    }
}

fn to_duck_value(value: &Value, column: &ColumnRef) -> Result<DuckValue, StoreError> {
    if !comparable(value, &column.storage_type.family()) {
        return Err(StoreError::UnsupportedValue(value.type_name()));
    }

    match value {
        Value::Bool(b) => Ok(DuckValue::Boolean(*b)),
        Value::Int(i) => Ok(DuckValue::BigInt(*i)),
        Value::Float(f) => Ok(DuckValue::Double(*f)),
        Value::Str(s) => Ok(DuckValue::Text(s.clone())),
        Value::Date(d) => Ok(DuckValue::Date32(d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE)),
        other => Err(StoreError::UnsupportedValue(other.type_name())),
    }
}
