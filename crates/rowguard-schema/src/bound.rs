//! Field descriptors bound to their table, column and identity column

use rowguard_catalog::{ColumnRef, StoreError};
use rowguard_rules::{Error, ErrorCode, Messages, Record, Value};
use std::sync::Arc;
use tracing::trace;

use crate::context::ValidationContext;
use crate::error::{SchemaError, ValidationError};
use crate::field::{Binding, FieldDescriptor};
use crate::introspect::Introspector;

/// A descriptor plus what the uniqueness check needs to query the store.
/// Holds no state between validation calls.
#[derive(Debug, Clone)]
pub struct BoundField {
    table: String,
    column: Option<ColumnRef>,
    identity: ColumnRef,
    descriptor: FieldDescriptor,
    messages: Arc<Messages>,
}

impl BoundField {
    /// Resolve the descriptor's column in `introspector`; property fields stay unbound.
    pub fn bind(
        introspector: &Introspector,
        identity: &ColumnRef,
        descriptor: FieldDescriptor,
        messages: Arc<Messages>,
    ) -> Result<Self, SchemaError> {
        let column = match descriptor.binding() {
            Binding::Column => Some(introspector.column(descriptor.name())?.clone()),
            Binding::Property if descriptor.is_unique() => {
                return Err(SchemaError::UniqueProperty {
                    field: descriptor.name().to_string(),
                })
            }
            Binding::Property => None,
        };

        Ok(Self {
            table: introspector.table_name().to_string(),
            column,
            identity: identity.clone(),
            descriptor,
            messages,
        })
    }

    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn required(&self) -> bool {
        self.descriptor.is_required()
    }

    pub fn unique(&self) -> bool {
        self.descriptor.is_unique()
    }

    pub fn column(&self) -> Option<&ColumnRef> {
        self.column.as_ref()
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub fn predicate_result(&self, prev_values: &Record) -> bool {
        self.descriptor.predicate_result(prev_values)
    }

    /// Rule validation, then the store uniqueness check for unique fields.
    ///
    /// Field problems come back as [`ValidationError::Rejected`]; a missing session
    /// or a failing store query as [`ValidationError::Schema`].
    pub fn validate(
        &self,
        value: &Value,
        typecast: bool,
        context: &ValidationContext<'_>,
    ) -> Result<Value, ValidationError> {
        let value = self
            .descriptor
            .validate(value, typecast, context.rule_context())
            .map_err(ValidationError::rejected)?;

        if let (true, Some(column)) = (self.descriptor.is_unique(), &self.column) {
            match self.already_exists(column, &value, context) {
                Ok(false) => {}
                Ok(true) => {
                    return Err(ValidationError::rejected(vec![self.error(ErrorCode::AlreadyExists)]));
                }
                // the value cannot be compared with the column, so it is this field's error
                Err(SchemaError::Store(StoreError::UnsupportedValue(type_name))) => {
                    trace!(table = %self.table, column = %column.name, type_name, "value not comparable");
                    let error = Error::unexpected_type(&column.storage_type.to_string())
                        .with_message_from(&self.messages);
                    return Err(ValidationError::rejected(vec![error]));
                }
                Err(err) => return Err(err.into()),
            }
        }

        Ok(value)
    }

    fn already_exists(
        &self,
        column: &ColumnRef,
        value: &Value,
        context: &ValidationContext<'_>,
    ) -> Result<bool, SchemaError> {
        // NULL never collides with a stored value
        if value.is_null() {
            return Ok(false);
        }

        let session = context.session().ok_or(SchemaError::MissingSession)?;

        let identity_value = context
            .instance()
            .and_then(|instance| instance.get(&self.identity.name))
            .filter(|v| !v.is_null());
        let excluding = identity_value.map(|v| (&self.identity, v));

        let exists = session.exists(&self.table, &[(column, value)], excluding)?;
        trace!(
            table = %self.table,
            column = %column.name,
            excluding_self = excluding.is_some(),
            exists,
            "uniqueness check"
        );
        Ok(exists)
    }

    fn error(&self, code: ErrorCode) -> Error {
        Error::new(code).with_message_from(&self.messages)
    }
}
