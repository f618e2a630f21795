//! Multi-field schemas over one mapped table

use rowguard_catalog::{Catalog, ColumnRef, Model};
use rowguard_rules::{Error, ErrorCode, Messages, NestedErrors, Record, Value};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, trace};

use crate::bound::BoundField;
use crate::builder::FieldBuilder;
use crate::context::ValidationContext;
use crate::error::{SchemaError, ValidationError};
use crate::field::FieldDescriptor;
use crate::introspect::Introspector;

/// The ordered validators for one table and field set.
///
/// Immutable once built and safe to share across threads; only the store
/// handle passed per call carries state.
#[derive(Debug, Clone)]
pub struct MappedSchema {
    table: String,
    identity: ColumnRef,
    fields: Vec<BoundField>,
    messages: Arc<Messages>,
}

impl MappedSchema {
    /// Declared descriptors first, then one derived descriptor per name in `field_names`.
    pub fn build<S: AsRef<str>>(
        catalog: &dyn Catalog,
        table: &str,
        declared: Vec<FieldDescriptor>,
        field_names: &[S],
    ) -> Result<Self, SchemaError> {
        Self::builder(table)
            .fields(declared)
            .derive(field_names)
            .build(catalog)
    }

    pub fn for_model<M: Model, S: AsRef<str>>(
        catalog: &dyn Catalog,
        declared: Vec<FieldDescriptor>,
        field_names: &[S],
    ) -> Result<Self, SchemaError> {
        Self::build(catalog, M::table_name(), declared, field_names)
    }

    pub fn builder(table: impl Into<String>) -> MappedSchemaBuilder {
        MappedSchemaBuilder::new(table)
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn identity(&self) -> &ColumnRef {
        &self.identity
    }

    /// Bound validators in evaluation order
    pub fn fields(&self) -> &[BoundField] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&BoundField> {
        self.fields.iter().find(|field| field.name() == name)
    }

    pub fn messages(&self) -> &Messages {
        &self.messages
    }

    /// Validate one input mapping in a single ordered pass.
    ///
    /// A missing session and a non-mapping input fail before any field runs.
    /// Otherwise every field is attempted and failures are collected into one
    /// `key_errors` and one `value_errors` entry.
    pub fn validate(
        &self,
        input: &Value,
        typecast: bool,
        context: &ValidationContext<'_>,
    ) -> Result<Record, ValidationError> {
        if context.session().is_none() {
            return Err(SchemaError::MissingSession.into());
        }

        let input = match input.as_map() {
            Some(map) => map,
            None => {
                return Err(ValidationError::rejected(vec![
                    Error::unexpected_type("dict").with_message_from(&self.messages)
                ]))
            }
        };

        let mut unconsumed: BTreeSet<&str> = input.keys().map(String::as_str).collect();
        let mut result = Record::new();
        let mut key_errors = NestedErrors::new();
        let mut value_errors = NestedErrors::new();

        for field in &self.fields {
            let name = field.name();

            if !field.predicate_result(&result) {
                trace!(table = %self.table, field = name, "skipped by predicate");
                continue;
            }

            match input.get(name) {
                Some(value) if unconsumed.remove(name) => {
                    match field.validate(value, typecast, context) {
                        Ok(value) => {
                            result.insert(name.to_string(), value);
                        }
                        Err(ValidationError::Rejected(report)) => {
                            value_errors.insert(name.to_string(), self.localize(report.into_errors()));
                        }
                        Err(err @ ValidationError::Schema(_)) => return Err(err),
                    }
                }
                _ if field.required() => {
                    key_errors.insert(name.to_string(), vec![self.error(ErrorCode::RequiredKey)]);
                }
                _ => {}
            }
        }

        for key in unconsumed {
            key_errors.insert(key.to_string(), vec![self.error(ErrorCode::UnknownKey)]);
        }

        if key_errors.is_empty() && value_errors.is_empty() {
            return Ok(result);
        }

        debug!(
            table = %self.table,
            key_errors = key_errors.len(),
            value_errors = value_errors.len(),
            "validation rejected"
        );

        let mut errors = Vec::with_capacity(2);
        if !key_errors.is_empty() {
            errors.push(self.error(ErrorCode::KeyErrors).with_nested(key_errors));
        }
        if !value_errors.is_empty() {
            errors.push(self.error(ErrorCode::ValueErrors).with_nested(value_errors));
        }
        Err(ValidationError::rejected(errors))
    }

    fn error(&self, code: ErrorCode) -> Error {
        Error::new(code).with_message_from(&self.messages)
    }

    /// Fill in messages for rule errors, nested ones included, that arrived without one
    fn localize(&self, errors: Vec<Error>) -> Vec<Error> {
        errors
            .into_iter()
            .map(|error| error.localize(&self.messages))
            .collect()
    }
}

/// Step-by-step construction of a [`MappedSchema`]
#[derive(Debug, Clone)]
pub struct MappedSchemaBuilder {
    table: String,
    declared: Vec<FieldDescriptor>,
    derived: Vec<String>,
    field_builder: FieldBuilder,
    messages: Arc<Messages>,
}

impl MappedSchemaBuilder {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            declared: Vec::new(),
            derived: Vec::new(),
            field_builder: FieldBuilder::default(),
            messages: Arc::new(Messages::default()),
        }
    }

    /// Add an explicitly declared descriptor
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.declared.push(descriptor);
        self
    }

    pub fn fields(mut self, descriptors: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        self.declared.extend(descriptors);
        self
    }

    /// Add fields derived from the catalog, by column name
    pub fn derive<S: AsRef<str>>(mut self, field_names: &[S]) -> Self {
        self.derived
            .extend(field_names.iter().map(|name| name.as_ref().to_string()));
        self
    }

    pub fn field_builder(mut self, field_builder: FieldBuilder) -> Self {
        self.field_builder = field_builder;
        self
    }

    pub fn messages(mut self, messages: Messages) -> Self {
        self.messages = Arc::new(messages);
        self
    }

    pub fn shared_messages(mut self, messages: Arc<Messages>) -> Self {
        self.messages = messages;
        self
    }

    pub fn build(self, catalog: &dyn Catalog) -> Result<MappedSchema, SchemaError> {
        let introspector = Introspector::load(catalog, &self.table)?;
        let identity = introspector.identity_column()?.clone();
        let derived = self.field_builder.build(&introspector, &self.derived)?;

        let fields = self
            .declared
            .into_iter()
            .chain(derived)
            .map(|descriptor| {
                BoundField::bind(&introspector, &identity, descriptor, self.messages.clone())
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            table = %self.table,
            identity = %identity.name,
            fields = fields.len(),
            "built mapped schema"
        );

        Ok(MappedSchema {
            table: self.table,
            identity,
            fields,
            messages: self.messages,
        })
    }
}
