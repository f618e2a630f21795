//! Single-value rule trait

use std::any::Any;
use std::fmt;

use crate::error::Error;
use crate::value::{Record, Value};

/// Free-form values a caller passes through to every rule of a validation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Context {
    values: Record,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

/// Validates (and with `typecast`, converts) one value.
///
/// Implementors also get value equality for free as long as they derive `PartialEq`,
/// which is what lets two independently built field descriptors compare equal.
pub trait Rule: RuleEq + fmt::Debug + Send + Sync {
    fn validate(&self, value: &Value, typecast: bool, context: &Context) -> Result<Value, Vec<Error>>;
}

#[doc(hidden)]
pub trait RuleEq {
    fn as_any(&self) -> &dyn Any;
    fn rule_eq(&self, other: &dyn Any) -> bool;
}

impl<T: PartialEq + Any> RuleEq for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn rule_eq(&self, other: &dyn Any) -> bool {
        other.downcast_ref::<T>().map_or(false, |other| self == other)
    }
}

impl PartialEq for dyn Rule {
    fn eq(&self, other: &dyn Rule) -> bool {
        self.rule_eq(other.as_any())
    }
}
