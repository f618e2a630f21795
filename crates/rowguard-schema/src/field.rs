//! Field descriptors: named, independently validatable units

use rowguard_rules::{Context, Error, Record, Rule, Value};
use std::fmt;
use std::sync::Arc;

/// Decides whether a field takes part in a pass, given the fields validated so far.
pub type Predicate = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

/// Whether a descriptor is backed by a table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    Column,
    /// Validated by its rule only; never looked up in the catalog
    Property,
}

#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    rule: Option<Arc<dyn Rule>>,
    required: Option<bool>,
    unique: bool,
    predicate: Option<Predicate>,
    binding: Binding,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rule: None,
            required: None,
            unique: false,
            predicate: None,
            binding: Binding::Column,
        }
    }

    /// A field that exists only in the input, e.g. a confirmation value
    pub fn property(name: impl Into<String>) -> Self {
        Self {
            binding: Binding::Property,
            ..Self::new(name)
        }
    }

    pub fn rule(mut self, rule: impl Rule + 'static) -> Self {
        self.rule = Some(Arc::new(rule));
        self
    }

    pub fn shared_rule(mut self, rule: Arc<dyn Rule>) -> Self {
        self.rule = Some(rule);
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    pub fn predicate<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&Record) -> bool + Send + Sync + 'static,
    {
        self.predicate = Some(Arc::new(predicate));
        self
    }

    /// Copy of this descriptor with only the predicate replaced
    pub fn with_predicate(&self, predicate: Option<Predicate>) -> Self {
        Self {
            predicate,
            ..self.clone()
        }
    }

    pub fn with_required(&self, required: Option<bool>) -> Self {
        Self {
            required,
            ..self.clone()
        }
    }

    pub fn with_unique(&self, unique: bool) -> Self {
        Self {
            unique,
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rule_ref(&self) -> Option<&Arc<dyn Rule>> {
        self.rule.as_ref()
    }

    pub fn is_required(&self) -> bool {
        self.required.unwrap_or(false)
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn binding(&self) -> Binding {
        self.binding
    }

    pub fn has_predicate(&self) -> bool {
        self.predicate.is_some()
    }

    pub fn predicate_result(&self, prev_values: &Record) -> bool {
        match &self.predicate {
            Some(predicate) => predicate(prev_values),
            None => true,
        }
    }

    /// Run the rule, or pass the value through unchanged when there is none
    pub fn validate(&self, value: &Value, typecast: bool, context: &Context) -> Result<Value, Vec<Error>> {
        match &self.rule {
            Some(rule) => rule.validate(value, typecast, context),
            None => Ok(value.clone()),
        }
    }
}

impl PartialEq for FieldDescriptor {
    fn eq(&self, other: &Self) -> bool {
        let predicates_equal = match (&self.predicate, &other.predicate) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };

        self.name == other.name
            && self.rule == other.rule
            && self.required == other.required
            && self.unique == other.unique
            && self.binding == other.binding
            && predicates_equal
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("rule", &self.rule)
            .field("required", &self.required)
            .field("unique", &self.unique)
            .field("predicate", &self.predicate.as_ref().map(|_| "<fn>"))
            .field("binding", &self.binding)
            .finish()
    }
}
