//! Structured validation errors
//!
//! An [`Error`] is data, not a failure signal: rules return lists of them and schemas
//! nest them per field. Equality ignores the rendered message so tests can compare
//! against bare codes.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::messages::Messages;
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    RequiredKey,
    UnknownKey,
    KeyErrors,
    ValueErrors,
    AlreadyExists,
    UnexpectedType,
    CannotBeNone,
    CannotBeBlank,
    MaxLengthExceeded,
    InvalidDate,
    InvalidInteger,
    /// Code emitted by a rule defined outside this crate
    Custom(String),
}

impl ErrorCode {
    pub fn as_str(&self) -> &str {
        match self {
            ErrorCode::RequiredKey => "required_key",
            ErrorCode::UnknownKey => "unknown_key",
            ErrorCode::KeyErrors => "key_errors",
            ErrorCode::ValueErrors => "value_errors",
            ErrorCode::AlreadyExists => "already_exists",
            ErrorCode::UnexpectedType => "unexpected_type",
            ErrorCode::CannotBeNone => "cannot_be_none",
            ErrorCode::CannotBeBlank => "cannot_be_blank",
            ErrorCode::MaxLengthExceeded => "max_length_exceeded",
            ErrorCode::InvalidDate => "invalid_date",
            ErrorCode::InvalidInteger => "invalid_integer",
            ErrorCode::Custom(code) => code,
        }
    }

    pub fn parse(code: &str) -> Self {
        match code {
            "required_key" => ErrorCode::RequiredKey,
            "unknown_key" => ErrorCode::UnknownKey,
            "key_errors" => ErrorCode::KeyErrors,
            "value_errors" => ErrorCode::ValueErrors,
            "already_exists" => ErrorCode::AlreadyExists,
            "unexpected_type" => ErrorCode::UnexpectedType,
            "cannot_be_none" => ErrorCode::CannotBeNone,
            "cannot_be_blank" => ErrorCode::CannotBeBlank,
            "max_length_exceeded" => ErrorCode::MaxLengthExceeded,
            "invalid_date" => ErrorCode::InvalidDate,
            "invalid_integer" => ErrorCode::InvalidInteger,
            other => ErrorCode::Custom(other.to_string()),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Per-field error lists, keyed by input field name
pub type NestedErrors = BTreeMap<String, Vec<Error>>;

#[derive(Debug, Clone, Serialize)]
pub struct Error {
    pub code: ErrorCode,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub args: BTreeMap<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub nested: NestedErrors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Error {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            args: BTreeMap::new(),
            nested: BTreeMap::new(),
            message: None,
        }
    }

    pub fn with_arg(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(name.into(), value.into());
        self
    }

    pub fn with_nested(mut self, nested: NestedErrors) -> Self {
        self.nested = nested;
        self
    }

    /// Render the message for this code from `messages`, interpolating args
    pub fn with_message_from(mut self, messages: &Messages) -> Self {
        self.message = messages.render(&self.code, &self.args);
        self
    }

    /// Fill in missing messages here and in every nested error; rendered ones are kept
    pub fn localize(mut self, messages: &Messages) -> Self {
        if self.message.is_none() {
            self.message = messages.render(&self.code, &self.args);
        }
        self.nested = std::mem::take(&mut self.nested)
            .into_iter()
            .map(|(field, errors)| {
                let errors = errors.into_iter().map(|e| e.localize(messages)).collect();
                (field, errors)
            })
            .collect();
        self
    }

    pub fn unexpected_type(expected_type: &str) -> Self {
        Error::new(ErrorCode::UnexpectedType).with_arg("expected_type", expected_type)
    }
}

impl PartialEq for Error {
    fn eq(&self, other: &Self) -> bool {
        self.code == other.code && self.args == other.args && self.nested == other.nested
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.code, message),
            None => write!(f, "{}", self.code),
        }
    }
}

impl std::error::Error for Error {}

impl From<ErrorCode> for Error {
    fn from(code: ErrorCode) -> Self {
        Error::new(code)
    }
}
