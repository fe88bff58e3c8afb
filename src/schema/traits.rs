//! The checker contract.
//!
//! A [`Checker`] either returns the (possibly converted) value or fails with a
//! [`DataError`]. Containers and combinators hold their children as
//! [`SharedChecker`]s, so a child can be shared between many schemas.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use stillwater::Validation;

use crate::error::{DataError, Violations};
use crate::schema::combinators::{And, OnError, Or, WithRepr};

/// A composable unit of validation and conversion.
///
/// Implementations must not keep state between calls: checking the same
/// value twice yields the same result. The `Send + Sync` bounds let a built
/// schema be checked from many threads at once.
///
/// # Example
///
/// ```rust
/// use scrutiny::{Checker, CheckerExt, Schema};
/// use serde_json::json;
///
/// let id = Schema::int().or_else(Schema::string());
///
/// assert_eq!(id.check(&json!(42)).unwrap(), json!(42));
/// assert_eq!(id.check(&json!("a-42")).unwrap(), json!("a-42"));
/// assert!(id.check(&json!(null)).is_err());
/// ```
pub trait Checker: Send + Sync {
    /// Checks `value`, handing `context` unchanged to every child checker.
    fn check_with_context(&self, value: &Value, context: Option<&Value>) -> Result<Value, DataError>;

    /// Short description used in error back-references and debugging output.
    fn describe(&self) -> String;

    fn check(&self, value: &Value) -> Result<Value, DataError> {
        self.check_with_context(value, None)
    }

    /// Checks `value` and flattens a failure into path-addressed violations.
    fn validate(&self, value: &Value) -> Validation<Value, Violations> {
        match self.check(value) {
            Ok(value) => Validation::Success(value),
            Err(error) => Validation::Failure(error.flatten()),
        }
    }

    /// Converts the checker into a shareable handle.
    fn into_shared(self) -> SharedChecker
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

/// A checker shared between the schemas that use it.
pub type SharedChecker = Arc<dyn Checker>;

impl Checker for SharedChecker {
    fn check_with_context(&self, value: &Value, context: Option<&Value>) -> Result<Value, DataError> {
        (**self).check_with_context(value, context)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }

    fn into_shared(self) -> SharedChecker {
        self
    }
}

impl fmt::Debug for dyn Checker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

/// Turns any checker into a [`SharedChecker`]; an already shared checker is passed through.
pub fn ensure_checker<C: Checker + 'static>(checker: C) -> SharedChecker {
    checker.into_shared()
}

/// Builder-style composition available on every checker.
pub trait CheckerExt: Checker + Sized + 'static {
    /// Tries `self`, then `other`; the first success wins.
    fn or_else<C: Checker + 'static>(self, other: C) -> Or {
        Or::new(vec![self.into_shared(), other.into_shared()])
    }

    /// Feeds the output of `self` into `other`, failing fast.
    fn and_then<C: Checker + 'static>(self, other: C) -> And {
        And::new(self, other)
    }

    /// Replaces any failure with a single terminal `message`.
    fn on_error(self, message: impl Into<String>) -> OnError {
        OnError::new(self, message)
    }

    /// Overrides the description of `self`.
    fn with_repr(self, repr: impl Into<String>) -> WithRepr {
        WithRepr::new(self, repr)
    }

    fn shared(self) -> SharedChecker {
        self.into_shared()
    }
}

impl<C: Checker + Sized + 'static> CheckerExt for C {}
