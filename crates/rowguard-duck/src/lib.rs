//! DuckDB implementations of the catalog and store interfaces

mod catalog;
mod store;

pub use catalog::DuckCatalog;
pub use store::DuckStore;
