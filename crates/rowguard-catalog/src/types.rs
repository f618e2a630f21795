//! Storage type system for mapped columns

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StorageType {
    // Primitives
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Float,
    Double,

    // Text
    Varchar(Option<u32>),
    Text,

    // Temporal
    Date,
    Timestamp,

    // Binary
    Blob,

    // Anything the parser does not recognise, kept verbatim
    Other(String),
}

/// Coarse grouping of storage types; rule factories can be registered per family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeFamily {
    Boolean,
    Integer,
    Float,
    Text,
    Date,
    Timestamp,
    Binary,
    Other,
}

impl StorageType {
    /// Parse a SQL type name such as `INTEGER`, `VARCHAR(32)` or `int8`
    pub fn parse(sql_type: &str) -> Self {
        let normalized = sql_type.trim().to_ascii_uppercase();
        let (base, args) = match normalized.find('(') {
            Some(idx) => (
                normalized[..idx].trim(),
                Some(normalized[idx + 1..].trim_end_matches(')').trim()),
            ),
            None => (normalized.as_str(), None),
        };

        match base {
            "BOOLEAN" | "BOOL" | "LOGICAL" => StorageType::Boolean,
            "TINYINT" | "INT1" => StorageType::TinyInt,
            "SMALLINT" | "INT2" | "SHORT" => StorageType::SmallInt,
            "INTEGER" | "INT" | "INT4" | "SIGNED" => StorageType::Integer,
            "BIGINT" | "INT8" | "LONG" => StorageType::BigInt,
            "FLOAT" | "REAL" | "FLOAT4" => StorageType::Float,
            "DOUBLE" | "FLOAT8" | "DOUBLE PRECISION" => StorageType::Double,
            "VARCHAR" | "CHAR" | "BPCHAR" | "CHARACTER VARYING" | "CHARACTER" | "NVARCHAR" => {
                StorageType::Varchar(args.and_then(|a| a.parse().ok()))
            }
            "TEXT" | "STRING" => StorageType::Text,
            "DATE" => StorageType::Date,
            "TIMESTAMP" | "DATETIME" | "TIMESTAMP WITH TIME ZONE" | "TIMESTAMPTZ" => StorageType::Timestamp,
            "BLOB" | "BYTEA" | "BINARY" | "VARBINARY" => StorageType::Blob,
            _ => StorageType::Other(sql_type.trim().to_string()),
        }
    }

    pub fn family(&self) -> TypeFamily {
        match self {
            StorageType::Boolean => TypeFamily::Boolean,
            StorageType::TinyInt | StorageType::SmallInt | StorageType::Integer | StorageType::BigInt => {
                TypeFamily::Integer
            }
            StorageType::Float | StorageType::Double => TypeFamily::Float,
            StorageType::Varchar(_) | StorageType::Text => TypeFamily::Text,
            StorageType::Date => TypeFamily::Date,
            StorageType::Timestamp => TypeFamily::Timestamp,
            StorageType::Blob => TypeFamily::Binary,
            StorageType::Other(_) => TypeFamily::Other,
        }
    }

    /// Declared maximum length for text types
    pub fn max_length(&self) -> Option<u32> {
        match self {
            StorageType::Varchar(len) => *len,
            _ => None,
        }
    }
}

impl fmt::Display for StorageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageType::Boolean => write!(f, "BOOLEAN"),
            StorageType::TinyInt => write!(f, "TINYINT"),
            StorageType::SmallInt => write!(f, "SMALLINT"),
            StorageType::Integer => write!(f, "INTEGER"),
            StorageType::BigInt => write!(f, "BIGINT"),
            StorageType::Float => write!(f, "FLOAT"),
            StorageType::Double => write!(f, "DOUBLE"),
            StorageType::Varchar(Some(len)) => write!(f, "VARCHAR({})", len),
            StorageType::Varchar(None) => write!(f, "VARCHAR"),
            StorageType::Text => write!(f, "TEXT"),
            StorageType::Date => write!(f, "DATE"),
            StorageType::Timestamp => write!(f, "TIMESTAMP"),
            StorageType::Blob => write!(f, "BLOB"),
            StorageType::Other(name) => write!(f, "{}", name),
        }
    }
}
