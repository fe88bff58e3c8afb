//! String leaf checker.

use regex::Regex;
use serde_json::Value;

use crate::codes;
use crate::error::{DataError, SchemaDefinitionError};

use super::traits::Checker;

#[derive(Clone)]
enum StringConstraint {
    MinLength(usize),
    MaxLength(usize),
    Pattern(Regex),
}

/// Accepts strings, rejecting blank ones unless [`Str::allow_blank`] is set.
///
/// Constraints are checked in the order they were added and the first
/// violation is reported.
///
/// ```rust
/// use scrutiny::{Checker, Schema};
/// use serde_json::json;
///
/// let name = Schema::string().min_len(2).max_len(6);
/// assert!(name.check(&json!("123")).is_ok());
///
/// let error = name.check(&json!("1")).unwrap_err();
/// assert_eq!(error.message(), Some("String is shorter than 2 characters"));
/// ```
#[derive(Clone, Default)]
pub struct Str {
    allow_blank: bool,
    constraints: Vec<StringConstraint>,
}

impl Str {
    /// Creates a string checker that rejects the empty string.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts the empty string, which then skips every other constraint.
    pub fn allow_blank(mut self) -> Self {
        self.allow_blank = true;
        self
    }

    /// Minimum length in characters (Unicode scalar values).
    pub fn min_len(mut self, min: usize) -> Self {
        self.constraints.push(StringConstraint::MinLength(min));
        self
    }

    /// Maximum length in characters.
    pub fn max_len(mut self, max: usize) -> Self {
        self.constraints.push(StringConstraint::MaxLength(max));
        self
    }

    /// Requires a regex match somewhere in the string.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, SchemaDefinitionError> {
        self.constraints.push(StringConstraint::Pattern(Regex::new(pattern)?));
        Ok(self)
    }

    fn fail(&self, message: String, code: &str, value: &Value) -> DataError {
        DataError::new(message)
            .with_code(code)
            .with_value(value.clone())
            .with_checker(self.describe())
    }
}

impl Checker for Str {
    fn check_with_context(&self, value: &Value, _context: Option<&Value>) -> Result<Value, DataError> {
        let s = match value.as_str() {
            Some(s) => s,
            None => {
                return Err(self.fail("value is not a string".to_string(), codes::IS_NOT_A_STRING, value));
            }
        };
        if s.is_empty() {
            if self.allow_blank {
                return Ok(value.clone());
            }
            return Err(self.fail("blank value is not allowed".to_string(), codes::EMPTY_STRING, value));
        }

        let len = s.chars().count();
        for constraint in &self.constraints {
            match constraint {
                StringConstraint::MinLength(min) if len < *min => {
                    return Err(self.fail(
                        format!("String is shorter than {} characters", min),
                        codes::SHORT_STRING,
                        value,
                    ));
                }
                StringConstraint::MaxLength(max) if len > *max => {
                    return Err(self.fail(
                        format!("String is longer than {} characters", max),
                        codes::LONG_STRING,
                        value,
                    ));
                }
                StringConstraint::Pattern(regex) if !regex.is_match(s) => {
                    return Err(self.fail(
                        format!("does not match pattern {}", regex.as_str()),
                        codes::DOES_NOT_MATCH_PATTERN,
                        value,
                    ));
                }
                _ => {}
            }
        }
        Ok(value.clone())
    }

    fn describe(&self) -> String {
        if self.allow_blank {
            "<String(blank)>".to_string()
        } else {
            "<String>".to_string()
        }
    }
}
