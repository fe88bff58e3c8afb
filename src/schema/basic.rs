//! Small leaf checkers and the function-backed checker.

use std::fmt::{self, Display};
use std::sync::Arc;

use serde_json::Value;

use crate::codes;
use crate::error::DataError;

use super::traits::Checker;

/// Accepts every value unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Any;

impl Checker for Any {
    fn check_with_context(&self, value: &Value, _context: Option<&Value>) -> Result<Value, DataError> {
        Ok(value.clone())
    }

    fn describe(&self) -> String {
        "<Any>".to_string()
    }
}

/// Accepts only `null`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Null;

impl Checker for Null {
    fn check_with_context(&self, value: &Value, _context: Option<&Value>) -> Result<Value, DataError> {
        if value.is_null() {
            Ok(Value::Null)
        } else {
            Err(DataError::new("value should be None")
                .with_code(codes::IS_NOT_NULL)
                .with_value(value.clone())
                .with_checker(self.describe()))
        }
    }

    fn describe(&self) -> String {
        "<Null>".to_string()
    }
}

/// Accepts only `true` and `false`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bool;

impl Checker for Bool {
    fn check_with_context(&self, value: &Value, _context: Option<&Value>) -> Result<Value, DataError> {
        match value {
            Value::Bool(_) => Ok(value.clone()),
            _ => Err(DataError::new("value should be True or False")
                .with_code(codes::IS_NOT_BOOL)
                .with_value(value.clone())
                .with_checker(self.describe())),
        }
    }

    fn describe(&self) -> String {
        "<Bool>".to_string()
    }
}

/// Accepts exactly one value.
#[derive(Debug, Clone)]
pub struct Atom(pub Value);

impl Checker for Atom {
    fn check_with_context(&self, value: &Value, _context: Option<&Value>) -> Result<Value, DataError> {
        if *value == self.0 {
            return Ok(value.clone());
        }
        let expected = match &self.0 {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        Err(DataError::new(format!("value is not exactly '{}'", expected))
            .with_code(codes::IS_NOT_EXACTLY)
            .with_value(value.clone())
            .with_checker(self.describe()))
    }

    fn describe(&self) -> String {
        format!("<Atom({})>", self.0)
    }
}

/// Accepts any of a fixed set of values.
#[derive(Debug, Clone)]
pub struct Enum {
    variants: Vec<Value>,
}

impl Enum {
    /// Creates an enum accepting exactly `variants`, compared by JSON equality.
    pub fn new(variants: impl IntoIterator<Item = Value>) -> Self {
        Self {
            variants: variants.into_iter().collect(),
        }
    }
}

impl Checker for Enum {
    fn check_with_context(&self, value: &Value, _context: Option<&Value>) -> Result<Value, DataError> {
        if self.variants.contains(value) {
            Ok(value.clone())
        } else {
            Err(DataError::new("value doesn't match any variant")
                .with_code(codes::DOES_NOT_MATCH_ANY_VARIANT)
                .with_value(value.clone())
                .with_checker(self.describe()))
        }
    }

    fn describe(&self) -> String {
        let variants: Vec<String> = self.variants.iter().map(Value::to_string).collect();
        format!("<Enum({})>", variants.join(", "))
    }
}

/// The kind of a JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classifies `value`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Bool,
            Value::Number(_) => ValueKind::Number,
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type-membership check: accepts values of one [`ValueKind`] unchanged.
#[derive(Debug, Clone, Copy)]
pub struct TypeOf(pub ValueKind);

impl Checker for TypeOf {
    fn check_with_context(&self, value: &Value, _context: Option<&Value>) -> Result<Value, DataError> {
        if ValueKind::of(value) == self.0 {
            Ok(value.clone())
        } else {
            Err(DataError::new(format!("value is not {}", self.0))
                .with_code(codes::WRONG_TYPE)
                .with_value(value.clone())
                .with_checker(self.describe()))
        }
    }

    fn describe(&self) -> String {
        format!("<Type({})>", self.0)
    }
}

type CallFn = dyn Fn(&Value, Option<&Value>) -> Result<Value, DataError> + Send + Sync;

/// Adapts a plain function into a checker.
///
/// The function's `Ok` value becomes the checked value; its `Err` is the
/// failure. Conversions are checkers that always succeed with a new value.
///
/// ```rust
/// use scrutiny::{Call, Checker, DataError};
/// use serde_json::{json, Value};
///
/// let only_foo = Call::new(|value: &Value| {
///     if value == "foo" {
///         Ok(value.clone())
///     } else {
///         Err(DataError::new("I want only foo!"))
///     }
/// });
///
/// assert_eq!(only_foo.check(&json!("foo")).unwrap(), json!("foo"));
/// assert_eq!(only_foo.check(&json!("bar")).unwrap_err().to_string(), "I want only foo!");
/// ```
#[derive(Clone)]
pub struct Call {
    name: Option<String>,
    func: Arc<CallFn>,
}

impl Call {
    /// Wraps a plain function of the value.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Value) -> Result<Value, DataError> + Send + Sync + 'static,
    {
        Self {
            name: None,
            func: Arc::new(move |value, _context| func(value)),
        }
    }

    /// Wraps a function that also reads the check context.
    pub fn with_context<F>(func: F) -> Self
    where
        F: Fn(&Value, Option<&Value>) -> Result<Value, DataError> + Send + Sync + 'static,
    {
        Self {
            name: None,
            func: Arc::new(func),
        }
    }

    /// Names the function in the checker description.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Checker for Call {
    fn check_with_context(&self, value: &Value, context: Option<&Value>) -> Result<Value, DataError> {
        (self.func)(value, context).map_err(|error| match error.checker {
            Some(_) => error,
            None => error.with_checker(self.describe()),
        })
    }

    fn describe(&self) -> String {
        match &self.name {
            Some(name) => format!("<Call({})>", name),
            None => "<Call>".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_any_passes_everything() {
        assert_eq!(Any.check(&json!({"a": [1]})).unwrap(), json!({"a": [1]}));
    }

    #[test]
    fn test_null() {
        assert_eq!(Null.check(&json!(null)).unwrap(), json!(null));
        let error = Null.check(&json!(1)).unwrap_err();
        assert_eq!(error.message(), Some("value should be None"));
        assert_eq!(error.code, codes::IS_NOT_NULL);
        assert_eq!(error.value, Some(json!(1)));
        assert_eq!(error.checker.as_deref(), Some("<Null>"));
    }

    #[test]
    fn test_bool() {
        assert_eq!(Bool.check(&json!(false)).unwrap(), json!(false));
        let error = Bool.check(&json!(1)).unwrap_err();
        assert_eq!(error.message(), Some("value should be True or False"));
    }

    #[test]
    fn test_atom() {
        let atom = Atom(json!("atom"));
        assert_eq!(atom.check(&json!("atom")).unwrap(), json!("atom"));
        let error = atom.check(&json!("molecule")).unwrap_err();
        assert_eq!(error.message(), Some("value is not exactly 'atom'"));
    }

    #[test]
    fn test_enum() {
        let variants = Enum::new([json!("foo"), json!("bar"), json!(1)]);
        assert!(variants.check(&json!("foo")).is_ok());
        assert!(variants.check(&json!(1)).is_ok());
        let error = variants.check(&json!(2)).unwrap_err();
        assert_eq!(error.message(), Some("value doesn't match any variant"));
        assert_eq!(variants.describe(), "<Enum(\"foo\", \"bar\", 1)>");
    }

    #[test]
    fn test_type_of() {
        let objects = TypeOf(ValueKind::Object);
        assert!(objects.check(&json!({})).is_ok());
        let error = objects.check(&json!([])).unwrap_err();
        assert_eq!(error.message(), Some("value is not object"));
        assert_eq!(error.code, codes::WRONG_TYPE);
    }

    #[test]
    fn test_call_converts() {
        let upper = Call::new(|value: &Value| match value.as_str() {
            Some(s) => Ok(Value::String(s.to_uppercase())),
            None => Err(DataError::new("not text")),
        })
        .named("upper");
        assert_eq!(upper.check(&json!("abc-Abc")).unwrap(), json!("ABC-ABC"));
        let error = upper.check(&json!(1)).unwrap_err();
        assert_eq!(error.checker.as_deref(), Some("<Call(upper)>"));
    }

    #[test]
    fn test_call_keeps_custom_code() {
        let other = Call::new(|_: &Value| Err(DataError::new("other error").with_code("other_error")));
        let error = other.check(&json!(45)).unwrap_err();
        assert_eq!(error.code, "other_error");
        assert_eq!(error.message(), Some("other error"));
    }

    #[test]
    fn test_call_reads_context() {
        let same_as_context = Call::with_context(|value: &Value, context: Option<&Value>| {
            if Some(value) == context {
                Ok(value.clone())
            } else {
                Err(DataError::new("have not context there"))
            }
        });
        assert!(same_as_context
            .check_with_context(&json!(123), Some(&json!(123)))
            .is_ok());
        assert!(same_as_context.check(&json!(123)).is_err());
    }
}
