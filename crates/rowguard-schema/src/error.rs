//! Error taxonomy for schema construction and validation
//!
//! [`SchemaError`] means the schema or the call is misconfigured and is never
//! aggregated. [`ValidationError::Rejected`] carries the structured report about
//! the input itself.

use rowguard_catalog::{CatalogError, StorageType, StoreError};
use rowguard_rules::{Error, ErrorCode, NestedErrors};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("mapped table {table} has no column {column}")]
    ColumnNotFound { table: String, column: String },

    #[error("mapped table {table} has a composite primary key ({columns:?}), which is not supported")]
    CompositeIdentity { table: String, columns: Vec<String> },

    #[error("mapped table {table} has no primary key")]
    MissingIdentity { table: String },

    #[error("unmapped column type {storage_type} for {table}.{column}")]
    UnmappedType {
        table: String,
        column: String,
        storage_type: StorageType,
    },

    #[error("property field {field} cannot be unique: it has no column to query")]
    UniqueProperty { field: String },

    #[error("a store session is required in the validation context")]
    MissingSession,

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Top-level errors of one rejected validation pass
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ErrorReport {
    errors: Vec<Error>,
}

impl ErrorReport {
    pub fn new(errors: Vec<Error>) -> Self {
        Self { errors }
    }

    pub fn errors(&self) -> &[Error] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<Error> {
        self.errors
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Missing and unexpected keys, per field
    pub fn key_errors(&self) -> Option<&NestedErrors> {
        self.nested(&ErrorCode::KeyErrors)
    }

    /// Failed field values, per field
    pub fn value_errors(&self) -> Option<&NestedErrors> {
        self.nested(&ErrorCode::ValueErrors)
    }

    fn nested(&self, code: &ErrorCode) -> Option<&NestedErrors> {
        self.errors.iter().find(|e| &e.code == code).map(|e| &e.nested)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let codes: Vec<&str> = self.errors.iter().map(|e| e.code.as_str()).collect();
        write!(f, "[{}]", codes.join(", "))
    }
}

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("input rejected: {0}")]
    Rejected(ErrorReport),
}

impl ValidationError {
    pub fn rejected(errors: Vec<Error>) -> Self {
        ValidationError::Rejected(ErrorReport::new(errors))
    }

    pub fn report(&self) -> Option<&ErrorReport> {
        match self {
            ValidationError::Rejected(report) => Some(report),
            ValidationError::Schema(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_buckets() {
        let mut key_errors = NestedErrors::new();
        key_errors.insert("name".into(), vec![Error::new(ErrorCode::RequiredKey)]);
        let report = ErrorReport::new(vec![Error::new(ErrorCode::KeyErrors).with_nested(key_errors.clone())]);

        assert_eq!(report.key_errors(), Some(&key_errors));
        assert!(report.value_errors().is_none());
        assert_eq!(report.to_string(), "[key_errors]");
    }

    #[test]
    fn test_report_serializes_as_list() {
        let report = ErrorReport::new(vec![Error::unexpected_type("dict")]);
        let json = report.to_json();

        assert_eq!(json[0]["code"], "unexpected_type");
        assert_eq!(json[0]["args"]["expected_type"], "dict");
    }

    #[test]
    fn test_schema_error_messages_name_the_field() {
        let err = SchemaError::ColumnNotFound {
            table: "users".into(),
            column: "nickname".into(),
        };
        assert_eq!(err.to_string(), "mapped table users has no column nickname");
    }
}
