//! Message catalog: error code → human-readable template

use std::collections::{BTreeMap, HashMap};

use crate::error::ErrorCode;
use crate::value::Value;

/// Templates use `{arg}` placeholders filled from the error's args.
#[derive(Debug, Clone, PartialEq)]
pub struct Messages {
    templates: HashMap<String, String>,
}

impl Messages {
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    /// Default catalog with user-supplied templates layered on top
    pub fn with_overrides<I, K, V>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut messages = Self::default();
        for (code, template) in overrides {
            messages.set(code, template);
        }
        messages
    }

    pub fn set(&mut self, code: impl Into<String>, template: impl Into<String>) {
        self.templates.insert(code.into(), template.into());
    }

    pub fn get_message(&self, code: &ErrorCode) -> Option<&str> {
        self.templates.get(code.as_str()).map(String::as_str)
    }

    pub fn render(&self, code: &ErrorCode, args: &BTreeMap<String, Value>) -> Option<String> {
        let template = self.get_message(code)?;
        Some(interpolate(template, args))
    }
}

/// Single left-to-right pass: substituted values are never rescanned, and
/// placeholders without a matching arg are kept as written.
fn interpolate(template: &str, args: &BTreeMap<String, Value>) -> String {
    let mut rendered = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        rendered.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}').and_then(|close| args.get(&after[..close]).map(|v| (close, v))) {
            Some((close, value)) => {
                rendered.push_str(&value.to_string());
                rest = &after[close + 1..];
            }
            None => {
                rendered.push('{');
                rest = after;
            }
        }
    }
    rendered.push_str(rest);
    rendered
}

impl Default for Messages {
    fn default() -> Self {
        let mut messages = Self::empty();
        for (code, template) in [
            (ErrorCode::RequiredKey, "this field is required"),
            (ErrorCode::UnknownKey, "unknown field"),
            (ErrorCode::KeyErrors, "some fields are missing or unexpected"),
            (ErrorCode::ValueErrors, "some fields have invalid values"),
            (ErrorCode::AlreadyExists, "a record with this value already exists"),
            (ErrorCode::UnexpectedType, "expected a value of type {expected_type}"),
            (ErrorCode::CannotBeNone, "cannot be null"),
            (ErrorCode::CannotBeBlank, "cannot be blank"),
            (ErrorCode::MaxLengthExceeded, "must be at most {max_length} characters long"),
            (ErrorCode::InvalidDate, "must be a date in YYYY-MM-DD format"),
            (ErrorCode::InvalidInteger, "must be an integer"),
        ] {
            messages.set(code.as_str(), template);
        }
        messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_interpolates_args() {
        let mut args = BTreeMap::new();
        args.insert("max_length".to_string(), Value::Int(32));

        let rendered = Messages::default().render(&ErrorCode::MaxLengthExceeded, &args);
        assert_eq!(rendered.as_deref(), Some("must be at most 32 characters long"));
    }

    #[test]
    fn test_substituted_values_are_not_expanded_again() {
        let messages = Messages::with_overrides([("unexpected_type", "{expected_type} wanted, {missing} kept")]);
        let mut args = BTreeMap::new();
        args.insert("expected_type".to_string(), Value::from("{other}"));
        args.insert("other".to_string(), Value::from("oops"));

        let rendered = messages.render(&ErrorCode::UnexpectedType, &args);
        assert_eq!(rendered.as_deref(), Some("{other} wanted, {missing} kept"));
    }

    #[test]
    fn test_overrides_replace_defaults() {
        let messages = Messages::with_overrides([("already_exists", "taken")]);
        assert_eq!(messages.get_message(&ErrorCode::AlreadyExists), Some("taken"));
        assert_eq!(messages.get_message(&ErrorCode::CannotBeNone), Some("cannot be null"));
    }

    #[test]
    fn test_unknown_code_has_no_message() {
        let code = ErrorCode::Custom("nope".into());
        assert!(Messages::default().render(&code, &BTreeMap::new()).is_none());
    }
}
