//! rowguard: input validation schemas derived from database table metadata
//!
//! Field rules come from column types and nullability; unique columns are checked
//! against the caller's open transaction. See [`MappedSchema`] for the validation
//! pass and [`Config`] for building named schemas at start-up.

pub mod config;
pub mod logging;

pub use config::{Config, ConfigError, LoggingConfig, SchemaConfig, ValidationConfig};

pub use rowguard_catalog::{
    Catalog, CatalogError, ColumnRef, MemoryCatalog, MemoryStore, Model, StorageType, Store,
    StoreError, TableInfo, TypeFamily,
};
pub use rowguard_duck::{DuckCatalog, DuckStore};
pub use rowguard_rules::{
    Context, DateRule, Error, ErrorCode, IntRule, Messages, NestedErrors, Record, Rule, StrRule,
    Value,
};
pub use rowguard_schema::{
    BoundField, ErrorReport, FieldBuilder, FieldDescriptor, MappedSchema, MappedSchemaBuilder,
    RuleRegistry, SchemaCache, SchemaError, TypeMatcher, ValidationContext, ValidationError,
};

pub mod prelude {
    pub use crate::{
        Catalog, Config, FieldDescriptor, MappedSchema, Model, Record, Store, ValidationContext,
        ValidationError, Value,
    };
}
