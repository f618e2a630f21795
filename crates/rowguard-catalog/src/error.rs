use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Catalog query failed: {0}")]
    Database(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store query failed: {0}")]
    Database(String),

    #[error("Value of type {0} cannot be used in a store query")]
    UnsupportedValue(&'static str),
}
