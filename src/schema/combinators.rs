//! Checker combinators.
//!
//! - [`Or`]: the first alternative that accepts the value wins
//! - [`And`]: the output of one checker feeds the next
//! - [`OnError`]: replaces a failure with a fixed message
//! - [`WithRepr`]: overrides a checker's description
//!
//! # Example
//!
//! ```rust
//! use scrutiny::{Checker, CheckerExt, Schema};
//! use serde_json::json;
//!
//! let nullable_name = Schema::string().or_else(Schema::null());
//!
//! let error = nullable_name.check(&json!(1)).unwrap_err();
//! assert_eq!(
//!     error.as_dict(false).to_json(),
//!     json!({"0": "value is not a string", "1": "value should be None"})
//! );
//! ```

use serde_json::Value;
use tracing::trace;

use crate::codes;
use crate::error::{DataError, ErrorMap};
use crate::path::PathSegment;

use super::traits::{Checker, SharedChecker};

/// Tries each alternative in order and returns the first success.
///
/// When every alternative fails the error is an aggregate keyed by the
/// index of each alternative, with code `nothing_match`.
#[derive(Clone)]
pub struct Or {
    alternatives: Vec<SharedChecker>,
}

impl Or {
    /// Creates an alternative over `alternatives`, tried in order.
    pub fn new(alternatives: Vec<SharedChecker>) -> Self {
        Self { alternatives }
    }

    /// Appends another alternative instead of nesting a new `Or`.
    pub fn or_else<C: Checker + 'static>(mut self, other: C) -> Self {
        self.alternatives.push(other.into_shared());
        self
    }

    pub fn alternatives(&self) -> &[SharedChecker] {
        &self.alternatives
    }
}

impl Checker for Or {
    fn check_with_context(&self, value: &Value, context: Option<&Value>) -> Result<Value, DataError> {
        let mut errors = ErrorMap::new();
        for (index, alternative) in self.alternatives.iter().enumerate() {
            match alternative.check_with_context(value, context) {
                Ok(checked) => return Ok(checked),
                Err(error) => {
                    errors.insert(PathSegment::Index(index), error);
                }
            }
        }
        trace!(alternatives = self.alternatives.len(), "no alternative matched");
        Err(DataError::nested(errors)
            .with_code(codes::NOTHING_MATCH)
            .with_checker(self.describe()))
    }

    fn describe(&self) -> String {
        let alternatives: Vec<String> = self.alternatives.iter().map(|c| c.describe()).collect();
        format!("<Or({})>", alternatives.join(", "))
    }
}

/// Runs `first`, then `second` on its output. The first failure is
/// returned unchanged.
#[derive(Clone)]
pub struct And {
    first: SharedChecker,
    second: SharedChecker,
}

impl And {
    /// Runs `first`, then `second` on its output.
    pub fn new<A, B>(first: A, second: B) -> Self
    where
        A: Checker + 'static,
        B: Checker + 'static,
    {
        Self {
            first: first.into_shared(),
            second: second.into_shared(),
        }
    }
}

impl Checker for And {
    fn check_with_context(&self, value: &Value, context: Option<&Value>) -> Result<Value, DataError> {
        let intermediate = self.first.check_with_context(value, context)?;
        self.second.check_with_context(&intermediate, context)
    }

    fn describe(&self) -> String {
        format!("<And({}, {})>", self.first.describe(), self.second.describe())
    }
}

/// Replaces any failure of the inner checker with a terminal `message`.
#[derive(Clone)]
pub struct OnError {
    inner: SharedChecker,
    message: String,
}

impl OnError {
    /// Wraps `inner`, replacing any failure with `message`.
    pub fn new<C: Checker + 'static>(inner: C, message: impl Into<String>) -> Self {
        Self {
            inner: inner.into_shared(),
            message: message.into(),
        }
    }
}

impl Checker for OnError {
    fn check_with_context(&self, value: &Value, context: Option<&Value>) -> Result<Value, DataError> {
        self.inner.check_with_context(value, context).map_err(|error| {
            DataError::new(self.message.clone())
                .with_code(error.code)
                .with_value(value.clone())
                .with_checker(self.describe())
        })
    }

    fn describe(&self) -> String {
        format!("<OnError({})>", self.inner.describe())
    }
}

/// Gives the inner checker a custom description.
#[derive(Clone)]
pub struct WithRepr {
    inner: SharedChecker,
    repr: String,
}

impl WithRepr {
    /// Wraps `inner`, describing it as `repr`.
    pub fn new<C: Checker + 'static>(inner: C, repr: impl Into<String>) -> Self {
        Self {
            inner: inner.into_shared(),
            repr: repr.into(),
        }
    }
}

impl Checker for WithRepr {
    fn check_with_context(&self, value: &Value, context: Option<&Value>) -> Result<Value, DataError> {
        self.inner.check_with_context(value, context)
    }

    fn describe(&self) -> String {
        self.repr.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::basic::{Call, Null};
    use crate::schema::numeric::Int;
    use crate::schema::string::Str;
    use crate::schema::traits::CheckerExt;
    use serde_json::json;

    #[test]
    fn test_or_first_success_wins() {
        let checker = Or::new(vec![Int::new().into_shared(), Int::new().convert().into_shared()]);
        assert_eq!(checker.check(&json!("5")).unwrap(), json!(5));
    }

    #[test]
    fn test_or_collects_every_failure() {
        let checker = Str::new().or_else(Null);
        let error = checker.check(&json!(1)).unwrap_err();
        assert_eq!(error.code, codes::NOTHING_MATCH);
        assert_eq!(error.get(0usize).and_then(|e| e.message()), Some("value is not a string"));
        assert_eq!(error.get(1usize).and_then(|e| e.message()), Some("value should be None"));
    }

    #[test]
    fn test_or_else_appends() {
        let checker = Str::new().or_else(Null).or_else(Int::new());
        assert_eq!(checker.alternatives().len(), 3);
        assert_eq!(checker.describe(), "<Or(<String>, <Null>, <Int>)>");
    }

    #[test]
    fn test_and_feeds_output_forward() {
        let checker = Int::new().convert().and_then(Int::new().gte(10));
        assert_eq!(checker.check(&json!("12")).unwrap(), json!(12));
        let error = checker.check(&json!("5")).unwrap_err();
        assert_eq!(error.message(), Some("value is less than 10"));
    }

    #[test]
    fn test_and_fails_fast() {
        let never = Call::new(|_: &Value| panic!("second checker must not run"));
        let checker = Int::new().and_then(never);
        assert_eq!(checker.check(&json!("x")).unwrap_err().message(), Some("value is not int"));
    }

    #[test]
    fn test_on_error_replaces_message() {
        let checker = Int::new().on_error("Bad input");
        let error = checker.check(&json!("x")).unwrap_err();
        assert_eq!(error.message(), Some("Bad input"));
        assert_eq!(error.code, codes::IS_NOT_INT);
    }

    #[test]
    fn test_with_repr() {
        assert_eq!(Int::new().with_repr("<Age>").describe(), "<Age>");
    }
}
