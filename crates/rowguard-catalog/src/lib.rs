//! Catalog and store interfaces the schema layer queries through
//!
//! The catalog answers "what does this table look like"; the store answers
//! "does a row like this already exist". Both come with in-memory versions.

mod catalog;
mod error;
mod store;
mod types;

pub use catalog::{Catalog, ColumnRef, MemoryCatalog, Model, TableInfo};
pub use error::{CatalogError, StoreError};
pub use store::{MemoryStore, Store};
pub use types::{StorageType, TypeFamily};
