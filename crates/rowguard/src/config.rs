//! Configuration for rowguard
//!
//! Loads configuration from:
//! 1. a YAML file - validation defaults, message overrides, logging, named schemas
//! 2. a `.env` file, if present
//!
//! Environment variables always override YAML values.

use rowguard_catalog::Catalog;
use rowguard_rules::Messages;
use rowguard_schema::{MappedSchema, SchemaCache, SchemaError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Validation defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Default `typecast` flag for validation calls
    #[serde(default)]
    pub typecast: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error) or module-specific
    pub level: String,

    /// Output format: pretty, json, compact
    pub format: String,

    /// Output destination: stdout, file, both
    pub output: String,

    /// Directory for log files
    pub directory: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            output: "stdout".to_string(),
            directory: "./logs".to_string(),
        }
    }
}

/// A named schema over one table, built from catalog columns
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub name: String,
    pub table: String,
    pub fields: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Error code → message template overrides
    #[serde(default)]
    pub messages: HashMap<String, String>,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub schemas: Vec<SchemaConfig>,
}

impl Config {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_yaml(&contents)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse YAML only; no environment lookups
    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(typecast) = std::env::var("ROWGUARD_TYPECAST") {
            if let Ok(typecast) = typecast.parse() {
                self.validation.typecast = typecast;
            }
        }

        if let Ok(level) = std::env::var("RUST_LOG") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(output) = std::env::var("LOG_OUTPUT") {
            self.logging.output = output;
        }
        if let Ok(dir) = std::env::var("LOG_DIR") {
            self.logging.directory = dir;
        }
    }

    /// Default messages with the configured overrides applied
    pub fn messages(&self) -> Messages {
        Messages::with_overrides(self.messages.clone())
    }

    /// Build every configured schema against `catalog`.
    ///
    /// Fails on the first misconfigured schema so problems surface at start-up.
    pub fn build_schemas(&self, catalog: &dyn Catalog) -> Result<SchemaCache, SchemaError> {
        let messages = Arc::new(self.messages());
        let cache = SchemaCache::new();

        for schema in &self.schemas {
            let built = MappedSchema::builder(schema.table.as_str())
                .derive(&schema.fields)
                .shared_messages(messages.clone())
                .build(catalog)?;
            cache.insert(schema.name.as_str(), built);
        }

        info!(schemas = cache.len(), "built configured schemas");
        Ok(cache)
    }

    /// Set logging environment variables for the logging module
    pub fn apply_logging_env(&self) {
        std::env::set_var("RUST_LOG", &self.logging.level);
        std::env::set_var("LOG_FORMAT", &self.logging.format);
        std::env::set_var("LOG_OUTPUT", &self.logging.output);
        std::env::set_var("LOG_DIR", &self.logging.directory);
    }
}
