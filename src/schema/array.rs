//! Sequence checkers.
//!
//! [`List`] checks a homogeneous list of any length, [`Tuple`] a
//! fixed-arity list with one checker per position. Both report every failing
//! element at once, keyed by index. A value of the wrong type or length
//! fails as a whole before any element is looked at.

use serde_json::Value;
use tracing::trace;

use crate::codes;
use crate::error::{DataError, ErrorMap};
use crate::path::PathSegment;

use super::traits::{Checker, SharedChecker};

/// Checks every element of a list against one checker.
///
/// # Example
///
/// ```rust
/// use scrutiny::{Checker, Schema};
/// use serde_json::json;
///
/// let scores = Schema::list(Schema::int()).min_len(1);
///
/// assert_eq!(scores.check(&json!([1, 2])).unwrap(), json!([1, 2]));
///
/// let error = scores.check(&json!([1, "two", 3, "four"])).unwrap_err();
/// assert_eq!(
///     error.as_dict(false).to_json(),
///     json!({"1": "value is not int", "3": "value is not int"})
/// );
/// ```
#[derive(Clone)]
pub struct List {
    item: SharedChecker,
    min_len: usize,
    max_len: Option<usize>,
}

impl List {
    /// Creates a list checker applying `item` to every element.
    pub fn new<C: Checker + 'static>(item: C) -> Self {
        Self {
            item: item.into_shared(),
            min_len: 0,
            max_len: None,
        }
    }

    /// Minimum number of elements (inclusive).
    pub fn min_len(mut self, min: usize) -> Self {
        self.min_len = min;
        self
    }

    /// Maximum number of elements (inclusive).
    pub fn max_len(mut self, max: usize) -> Self {
        self.max_len = Some(max);
        self
    }

    /// Shorthand for `min_len(1)`.
    pub fn non_empty(self) -> Self {
        self.min_len(1)
    }

    fn fail(&self, message: String, code: &str, value: &Value) -> DataError {
        DataError::new(message)
            .with_code(code)
            .with_value(value.clone())
            .with_checker(self.describe())
    }
}

impl Checker for List {
    fn check_with_context(&self, value: &Value, context: Option<&Value>) -> Result<Value, DataError> {
        let items = match value.as_array() {
            Some(items) => items,
            None => {
                return Err(self.fail("value is not a list".to_string(), codes::IS_NOT_A_LIST, value));
            }
        };
        if items.len() < self.min_len {
            return Err(self.fail(
                format!("list length is less than {}", self.min_len),
                codes::TOO_SHORT,
                value,
            ));
        }
        if let Some(max) = self.max_len {
            if items.len() > max {
                return Err(self.fail(format!("list length is greater than {}", max), codes::TOO_LONG, value));
            }
        }

        let mut checked = Vec::with_capacity(items.len());
        let mut errors = ErrorMap::new();
        for (index, item) in items.iter().enumerate() {
            match self.item.check_with_context(item, context) {
                Ok(item) => checked.push(item),
                Err(error) => {
                    errors.insert(PathSegment::Index(index), error);
                }
            }
        }

        if errors.is_empty() {
            Ok(Value::Array(checked))
        } else {
            trace!(failed = errors.len(), total = items.len(), "list elements did not match");
            Err(DataError::nested(errors).with_checker(self.describe()))
        }
    }

    fn describe(&self) -> String {
        let mut options = Vec::new();
        if self.min_len > 0 {
            options.push(format!("min_length={}", self.min_len));
        }
        if let Some(max) = self.max_len {
            options.push(format!("max_length={}", max));
        }
        if options.is_empty() {
            format!("<List({})>", self.item.describe())
        } else {
            format!("<List({} | {})>", options.join(", "), self.item.describe())
        }
    }
}

/// Checks a list of fixed length, position by position.
///
/// Output is a list of the same length.
#[derive(Clone)]
pub struct Tuple {
    items: Vec<SharedChecker>,
}

impl Tuple {
    /// Creates a tuple checker with one checker per position.
    pub fn new(items: Vec<SharedChecker>) -> Self {
        Self { items }
    }

    /// Appends a position.
    pub fn item<C: Checker + 'static>(mut self, checker: C) -> Self {
        self.items.push(checker.into_shared());
        self
    }

    /// Number of positions the input must have.
    pub fn arity(&self) -> usize {
        self.items.len()
    }

    fn fail(&self, message: String, code: &str, value: &Value) -> DataError {
        DataError::new(message)
            .with_code(code)
            .with_value(value.clone())
            .with_checker(self.describe())
    }
}

impl Checker for Tuple {
    fn check_with_context(&self, value: &Value, context: Option<&Value>) -> Result<Value, DataError> {
        let values = match value.as_array() {
            Some(values) => values,
            None => {
                return Err(self.fail(
                    "value must be convertible to tuple".to_string(),
                    codes::IS_NOT_A_TUPLE,
                    value,
                ));
            }
        };
        if values.len() != self.items.len() {
            return Err(self.fail(
                format!("value must contain {} items", self.items.len()),
                codes::WRONG_LENGTH,
                value,
            ));
        }

        let mut checked = Vec::with_capacity(values.len());
        let mut errors = ErrorMap::new();
        for (index, (checker, item)) in self.items.iter().zip(values).enumerate() {
            match checker.check_with_context(item, context) {
                Ok(item) => checked.push(item),
                Err(error) => {
                    errors.insert(PathSegment::Index(index), error);
                }
            }
        }

        if errors.is_empty() {
            Ok(Value::Array(checked))
        } else {
            trace!(failed = errors.len(), arity = self.items.len(), "tuple positions did not match");
            Err(DataError::nested(errors).with_checker(self.describe()))
        }
    }

    fn describe(&self) -> String {
        let items: Vec<String> = self.items.iter().map(|c| c.describe()).collect();
        format!("<Tuple({})>", items.join(", "))
    }
}
