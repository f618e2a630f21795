//! Validation schemas derived from table metadata
//!
//! A [`MappedSchema`] is built from a [`Catalog`](rowguard_catalog::Catalog) entry:
//! each requested column becomes a [`FieldDescriptor`] whose rule follows the
//! column's storage type and nullability, and unique columns are checked against a
//! [`Store`](rowguard_catalog::Store) at validation time.

mod bound;
mod builder;
mod cache;
mod context;
mod error;
mod field;
mod introspect;
mod mapped;

pub use bound::BoundField;
pub use builder::{FieldBuilder, RuleFactory, RuleRegistry, TypeMatcher};
pub use cache::SchemaCache;
pub use context::ValidationContext;
pub use error::{ErrorReport, SchemaError, ValidationError};
pub use field::{Binding, FieldDescriptor, Predicate};
pub use introspect::Introspector;
pub use mapped::{MappedSchema, MappedSchemaBuilder};
