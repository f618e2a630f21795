//! Build-once storage for mapped schemas

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::SchemaError;
use crate::mapped::MappedSchema;

/// Named schemas shared across validation calls
#[derive(Debug, Default)]
pub struct SchemaCache {
    schemas: RwLock<HashMap<String, Arc<MappedSchema>>>,
}

impl SchemaCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<Arc<MappedSchema>> {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Store `schema` under `name`, replacing any previous entry
    pub fn insert(&self, name: impl Into<String>, schema: MappedSchema) -> Arc<MappedSchema> {
        let schema = Arc::new(schema);
        self.schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.into(), schema.clone());
        schema
    }

    /// Return the cached schema, building it with `build` on first request.
    ///
    /// A failed build caches nothing.
    pub fn get_or_build<F>(&self, name: &str, build: F) -> Result<Arc<MappedSchema>, SchemaError>
    where
        F: FnOnce() -> Result<MappedSchema, SchemaError>,
    {
        if let Some(schema) = self.get(name) {
            return Ok(schema);
        }

        let mut schemas = self.schemas.write().unwrap_or_else(PoisonError::into_inner);
        // another caller may have built it while we waited for the lock
        if let Some(schema) = schemas.get(name) {
            return Ok(schema.clone());
        }

        let schema = Arc::new(build()?);
        schemas.insert(name.to_string(), schema.clone());
        Ok(schema)
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.schemas.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
