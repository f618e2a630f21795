//! Storage type → rule registry and the builder deriving descriptors from columns

use rowguard_catalog::{ColumnRef, StorageType, TypeFamily};
use rowguard_rules::{DateRule, IntRule, Rule, StrRule};
use std::fmt;
use std::sync::Arc;
use tracing::trace;

use crate::error::SchemaError;
use crate::field::FieldDescriptor;
use crate::introspect::Introspector;

/// Produces the rule for a column; receives the column so it can read
/// nullability and declared length.
pub trait RuleFactory: Send + Sync {
    fn build(&self, column: &ColumnRef) -> Arc<dyn Rule>;
}

impl<F> RuleFactory for F
where
    F: Fn(&ColumnRef) -> Arc<dyn Rule> + Send + Sync,
{
    fn build(&self, column: &ColumnRef) -> Arc<dyn Rule> {
        self(column)
    }
}

/// Which storage types a registry entry applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeMatcher {
    Exact(StorageType),
    Family(TypeFamily),
}

impl TypeMatcher {
    pub fn matches(&self, storage_type: &StorageType) -> bool {
        match self {
            TypeMatcher::Exact(expected) => expected == storage_type,
            TypeMatcher::Family(family) => storage_type.family() == *family,
        }
    }
}

struct Entry {
    matcher: TypeMatcher,
    factory: Arc<dyn RuleFactory>,
}

/// Ordered rule factories; the first matching entry wins
#[derive(Clone)]
pub struct RuleRegistry {
    entries: Vec<Arc<Entry>>,
}

impl RuleRegistry {
    /// Registry with the built-in integer, text and date factories
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register_builtins();
        registry
    }

    pub fn empty() -> Self {
        Self { entries: Vec::new() }
    }

    fn register_builtins(&mut self) {
        self.register(TypeMatcher::Family(TypeFamily::Integer), |column: &ColumnRef| {
            Arc::new(IntRule::new().allow_none(column.nullable)) as Arc<dyn Rule>
        });

        self.register(TypeMatcher::Family(TypeFamily::Date), |column: &ColumnRef| {
            Arc::new(DateRule::new().allow_none(column.nullable)) as Arc<dyn Rule>
        });

        self.register(TypeMatcher::Family(TypeFamily::Text), |column: &ColumnRef| {
            let mut rule = StrRule::new().allow_none(column.nullable);
            if let Some(max_length) = column.max_length() {
                rule = rule.max_length(max_length as usize);
            }
            Arc::new(rule) as Arc<dyn Rule>
        });
    }

    pub fn register(&mut self, matcher: TypeMatcher, factory: impl RuleFactory + 'static) {
        self.entries.push(Arc::new(Entry {
            matcher,
            factory: Arc::new(factory),
        }));
    }

    pub fn lookup(&self, storage_type: &StorageType) -> Option<&dyn RuleFactory> {
        self.entries
            .iter()
            .find(|entry| entry.matcher.matches(storage_type))
            .map(|entry| entry.factory.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| &entry.matcher))
            .finish()
    }
}

/// Derives field descriptors from catalog columns
#[derive(Debug, Clone, Default)]
pub struct FieldBuilder {
    registry: RuleRegistry,
}

impl FieldBuilder {
    pub fn new(registry: RuleRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    /// Descriptor for one column: rule from the registry, `required` from nullability
    pub fn build_one(&self, table: &str, column: &ColumnRef) -> Result<FieldDescriptor, SchemaError> {
        let factory = self
            .registry
            .lookup(&column.storage_type)
            .ok_or_else(|| SchemaError::UnmappedType {
                table: table.to_string(),
                column: column.name.clone(),
                storage_type: column.storage_type.clone(),
            })?;

        trace!(table, column = %column.name, storage_type = %column.storage_type, "deriving field");

        Ok(FieldDescriptor::new(column.name.clone())
            .shared_rule(factory.build(column))
            .required(!column.nullable)
            .unique(column.unique))
    }

    /// One descriptor per name, in the order given
    pub fn build<S: AsRef<str>>(
        &self,
        introspector: &Introspector,
        field_names: &[S],
    ) -> Result<Vec<FieldDescriptor>, SchemaError> {
        field_names
            .iter()
            .map(|name| {
                let column = introspector.column(name.as_ref())?;
                self.build_one(introspector.table_name(), column)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowguard_catalog::TableInfo;
    use rowguard_rules::{Context, Error, Value};

    #[derive(Debug, PartialEq)]
    struct Marker;

    impl Rule for Marker {
        fn validate(&self, value: &Value, _typecast: bool, _context: &Context) -> Result<Value, Vec<Error>> {
            Ok(value.clone())
        }
    }

    fn introspector() -> Introspector {
        Introspector::from_table(
            TableInfo::new("users")
                .column(ColumnRef::new("id", StorageType::Integer).primary_key())
                .column(ColumnRef::new("name", StorageType::Varchar(Some(255))).not_null().unique())
                .column(ColumnRef::new("bday", StorageType::Date))
                .column(ColumnRef::new("score", StorageType::Double)),
        )
    }

    #[test]
    fn test_integer_factory_respects_nullability() {
        for nullable in [true, false] {
            let mut column = ColumnRef::new("dummy", StorageType::BigInt);
            column.nullable = nullable;

            let field = FieldBuilder::default().build_one("t", &column).unwrap();
            let expected = FieldDescriptor::new("dummy")
                .rule(IntRule::new().allow_none(nullable))
                .required(!nullable);
            assert_eq!(field, expected);
        }
    }

    #[test]
    fn test_string_factory_carries_max_length() {
        let fields = FieldBuilder::default().build(&introspector(), &["name"]).unwrap();
        let expected = FieldDescriptor::new("name")
            .rule(StrRule::new().allow_none(false).max_length(255))
            .required(true)
            .unique(true);

        assert_eq!(fields, vec![expected]);
    }

    #[test]
    fn test_preserves_requested_order() {
        let fields = FieldBuilder::default().build(&introspector(), &["bday", "name", "id"]).unwrap();
        let names: Vec<&str> = fields.iter().map(FieldDescriptor::name).collect();
        assert_eq!(names, vec!["bday", "name", "id"]);
    }

    #[test]
    fn test_unmapped_type_fails_loudly() {
        let err = FieldBuilder::default().build(&introspector(), &["score"]).unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnmappedType { ref column, storage_type: StorageType::Double, .. } if column == "score"
        ));
    }

    #[test]
    fn test_empty_registry_maps_nothing() {
        let builder = FieldBuilder::new(RuleRegistry::empty());
        assert!(matches!(
            builder.build(&introspector(), &["id"]),
            Err(SchemaError::UnmappedType { .. })
        ));
    }

    #[test]
    fn test_unknown_column_propagates() {
        let err = FieldBuilder::default().build(&introspector(), &["nickname"]).unwrap_err();
        assert!(matches!(err, SchemaError::ColumnNotFound { .. }));
    }

    #[test]
    fn test_first_registered_match_wins() {
        let mut registry = RuleRegistry::empty();
        registry.register(TypeMatcher::Exact(StorageType::Double), |_: &ColumnRef| {
            Arc::new(Marker) as Arc<dyn Rule>
        });
        registry.register(TypeMatcher::Family(TypeFamily::Float), |_: &ColumnRef| {
            Arc::new(IntRule::new()) as Arc<dyn Rule>
        });

        let builder = FieldBuilder::new(registry);
        let field = builder.build(&introspector(), &["score"]).unwrap().remove(0);
        assert_eq!(field, FieldDescriptor::new("score").rule(Marker).required(false));
        assert_eq!(
            field.validate(&Value::Float(1.5), false, &Context::new()),
            Ok(Value::Float(1.5))
        );
    }
}
