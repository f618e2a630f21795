//! Rowguard rules - value model, structured errors and single-value rules

mod builtin;
mod error;
mod messages;
mod rule;
mod value;

pub use builtin::{DateRule, IntRule, StrRule};
pub use error::{Error, ErrorCode, NestedErrors};
pub use messages::Messages;
pub use rule::{Context, Rule, RuleEq};
pub use value::{Record, Value, DATE_FORMAT};
