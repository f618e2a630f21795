//! Built-in rules for the storage types columns are most commonly declared with

use chrono::NaiveDate;

use crate::error::{Error, ErrorCode};
use crate::rule::{Context, Rule};
use crate::value::{Value, DATE_FORMAT};

fn none_check(value: &Value, allow_none: bool) -> Option<Result<Value, Vec<Error>>> {
    if !value.is_null() {
        return None;
    }
    if allow_none {
        Some(Ok(Value::Null))
    } else {
        Some(Err(vec![Error::new(ErrorCode::CannotBeNone)]))
    }
}

/// 64-bit integer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntRule {
    pub allow_none: bool,
}

impl IntRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_none(mut self, allow_none: bool) -> Self {
        self.allow_none = allow_none;
        self
    }
}

impl Rule for IntRule {
    fn validate(&self, value: &Value, typecast: bool, _context: &Context) -> Result<Value, Vec<Error>> {
        if let Some(result) = none_check(value, self.allow_none) {
            return result;
        }

        match value {
            Value::Int(i) => Ok(Value::Int(*i)),
            Value::Str(s) if typecast => s
                .trim()
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| vec![Error::new(ErrorCode::InvalidInteger)]),
            Value::Float(f) if typecast => float_to_int(*f),
            _ => Err(vec![Error::unexpected_type("int")]),
        }
    }
}

// Whole floats only, and only inside the i64 range; `as` would saturate
fn float_to_int(f: f64) -> Result<Value, Vec<Error>> {
    if f.fract() == 0.0 && (i64::MIN as f64..i64::MAX as f64).contains(&f) {
        Ok(Value::Int(f as i64))
    } else {
        Err(vec![Error::new(ErrorCode::InvalidInteger)])
    }
}

/// UTF-8 text, optionally length-limited
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StrRule {
    pub allow_none: bool,
    pub allow_blank: bool,
    pub max_length: Option<usize>,
}

impl StrRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_none(mut self, allow_none: bool) -> Self {
        self.allow_none = allow_none;
        self
    }

    pub fn allow_blank(mut self, allow_blank: bool) -> Self {
        self.allow_blank = allow_blank;
        self
    }

    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }
}

impl Rule for StrRule {
    fn validate(&self, value: &Value, _typecast: bool, _context: &Context) -> Result<Value, Vec<Error>> {
        if let Some(result) = none_check(value, self.allow_none) {
            return result;
        }

        let s = value.as_str().ok_or_else(|| vec![Error::unexpected_type("str")])?;

        let mut errors = Vec::new();
        if s.is_empty() && !self.allow_blank {
            errors.push(Error::new(ErrorCode::CannotBeBlank));
        }
        if let Some(max_length) = self.max_length {
            // Length is counted in characters, not bytes
            if s.chars().count() > max_length {
                errors.push(
                    Error::new(ErrorCode::MaxLengthExceeded).with_arg("max_length", max_length as i64),
                );
            }
        }

        if errors.is_empty() {
            Ok(Value::Str(s.to_string()))
        } else {
            Err(errors)
        }
    }
}

/// Calendar date. With typecast, ISO `YYYY-MM-DD` strings are parsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateRule {
    pub allow_none: bool,
}

impl DateRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn allow_none(mut self, allow_none: bool) -> Self {
        self.allow_none = allow_none;
        self
    }
}

impl Rule for DateRule {
    fn validate(&self, value: &Value, typecast: bool, _context: &Context) -> Result<Value, Vec<Error>> {
        if let Some(result) = none_check(value, self.allow_none) {
            return result;
        }

        match value {
            Value::Date(d) => Ok(Value::Date(*d)),
            Value::Str(s) if typecast => NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
                .map(Value::Date)
                .map_err(|_| vec![Error::new(ErrorCode::InvalidDate)]),
            _ => Err(vec![Error::unexpected_type("date")]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> Context {
        Context::new()
    }

    #[test]
    fn test_int_accepts_int() {
        assert_eq!(IntRule::new().validate(&Value::Int(3000), false, &ctx()), Ok(Value::Int(3000)));
    }

    #[test]
    fn test_int_rejects_string_without_typecast() {
        let result = IntRule::new().validate(&Value::from("oops"), false, &ctx());
        assert_eq!(result, Err(vec![Error::unexpected_type("int")]));
    }

    #[test]
    fn test_int_typecasts_numeric_string() {
        assert_eq!(IntRule::new().validate(&Value::from(" 42 "), true, &ctx()), Ok(Value::Int(42)));
        assert_eq!(
            IntRule::new().validate(&Value::from("4x2"), true, &ctx()),
            Err(vec![Error::new(ErrorCode::InvalidInteger)])
        );
    }

    #[test]
    fn test_int_typecasts_whole_floats_in_range() {
        let int = IntRule::new();
        assert_eq!(int.validate(&Value::Float(42.0), true, &ctx()), Ok(Value::Int(42)));
        assert_eq!(int.validate(&Value::Float(-2.0e15), true, &ctx()), Ok(Value::Int(-2_000_000_000_000_000)));

        for f in [1.5, 1e30, -1e30, 9_223_372_036_854_775_808.0, f64::INFINITY, f64::NAN] {
            assert_eq!(
                int.validate(&Value::Float(f), true, &ctx()),
                Err(vec![Error::new(ErrorCode::InvalidInteger)]),
                "{f} should not become an integer"
            );
        }
        assert_eq!(
            int.validate(&Value::Float(42.0), false, &ctx()),
            Err(vec![Error::unexpected_type("int")])
        );
    }

    #[test]
    fn test_none_handling() {
        assert_eq!(
            IntRule::new().validate(&Value::Null, false, &ctx()),
            Err(vec![Error::new(ErrorCode::CannotBeNone)])
        );
        assert_eq!(
            DateRule::new().allow_none(true).validate(&Value::Null, false, &ctx()),
            Ok(Value::Null)
        );
    }

    #[test]
    fn test_str_rejects_blank_by_default() {
        assert_eq!(
            StrRule::new().validate(&Value::from(""), false, &ctx()),
            Err(vec![Error::new(ErrorCode::CannotBeBlank)])
        );
        assert_eq!(
            StrRule::new().allow_blank(true).validate(&Value::from(""), false, &ctx()),
            Ok(Value::from(""))
        );
    }

    #[test]
    fn test_str_max_length_counts_chars() {
        let rule = StrRule::new().max_length(3);
        assert_eq!(rule.validate(&Value::from("äöü"), false, &ctx()), Ok(Value::from("äöü")));
        assert_eq!(
            rule.validate(&Value::from("abcd"), false, &ctx()),
            Err(vec![Error::new(ErrorCode::MaxLengthExceeded).with_arg("max_length", 3i64)])
        );
    }

    #[test]
    fn test_str_does_not_stringify_numbers() {
        assert_eq!(
            StrRule::new().validate(&Value::Int(1), true, &ctx()),
            Err(vec![Error::unexpected_type("str")])
        );
    }

    #[test]
    fn test_date_typecast() {
        let expected = NaiveDate::from_ymd_opt(1968, 6, 12).unwrap();
        let rule = DateRule::new();

        assert_eq!(rule.validate(&Value::from("1968-06-12"), true, &ctx()), Ok(Value::Date(expected)));
        assert_eq!(
            rule.validate(&Value::from("1968-06-12"), false, &ctx()),
            Err(vec![Error::unexpected_type("date")])
        );
        assert_eq!(
            rule.validate(&Value::from("12/06/1968"), true, &ctx()),
            Err(vec![Error::new(ErrorCode::InvalidDate)])
        );
    }
}
