//! Field policies for [`Dict`](super::Dict).
//!
//! A [`KeyExtractor`] reads some entries of the input mapping and reports
//! zero or more named results together with the input keys it consumed.
//! [`Key`] is the ordinary one-field extractor; [`super::keys`] has
//! extractors built from several input keys.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::codes;
use crate::error::{DataError, SchemaDefinitionError};

use super::basic::Any;
use super::traits::{Checker, SharedChecker};

/// One named result produced by a [`KeyExtractor`].
#[derive(Debug, Clone, PartialEq)]
pub struct Extracted {
    /// Output name the result is stored (or reported) under.
    pub name: String,
    pub result: Result<Value, DataError>,
    /// Input keys consumed to produce the result.
    pub touched: Vec<String>,
}

impl Extracted {
    pub fn new(name: impl Into<String>, result: Result<Value, DataError>, touched: Vec<String>) -> Self {
        Self {
            name: name.into(),
            result,
            touched,
        }
    }

    /// Shorthand for a result that consumed exactly the key it is named after.
    pub fn single(name: &str, result: Result<Value, DataError>) -> Self {
        Self::new(name, result, vec![name.to_string()])
    }
}

/// Reads named results out of an input mapping.
///
/// Extractors run in declaration order and their results are collected
/// before the dict looks at keys nobody touched.
pub trait KeyExtractor: Send + Sync {
    fn extract(&self, data: &Map<String, Value>, context: Option<&Value>) -> Vec<Extracted>;

    /// Input keys this extractor reads.
    fn source_names(&self) -> Vec<String>;

    /// Output names this extractor may produce.
    fn output_names(&self) -> Vec<String>;

    fn describe(&self) -> String;
}

/// Value used by a [`Key`] when its input key is absent.
#[derive(Clone)]
pub enum KeyDefault {
    Value(Value),
    /// Called once per check that needs the default.
    With(Arc<dyn Fn() -> Value + Send + Sync>),
}

impl KeyDefault {
    pub fn resolve(&self) -> Value {
        match self {
            KeyDefault::Value(value) => value.clone(),
            KeyDefault::With(produce) => produce(),
        }
    }
}

impl fmt::Debug for KeyDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyDefault::Value(value) => write!(f, "Value({})", value),
            KeyDefault::With(_) => f.write_str("With(..)"),
        }
    }
}

/// A single dict field: where to read it, how to check it and what to
/// do when it is missing.
///
/// # Example
///
/// ```rust
/// use scrutiny::{Checker, Dict, Key, Schema};
/// use serde_json::json;
///
/// let user = Dict::new()
///     .key(Key::new("userName").checker(Schema::string()).to_name("user_name"))
///     .key(Key::new("role").checker(Schema::string()).default(json!("guest")));
///
/// assert_eq!(
///     user.check(&json!({"userName": "ann"})).unwrap(),
///     json!({"user_name": "ann", "role": "guest"})
/// );
/// ```
#[derive(Clone)]
pub struct Key {
    name: String,
    to_name: Option<String>,
    default: Option<KeyDefault>,
    optional: bool,
    checker: SharedChecker,
}

impl Key {
    /// A required key accepting any value.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            to_name: None,
            default: None,
            optional: false,
            checker: Arc::new(Any),
        }
    }

    /// Parses the `"name"` / `"name?"` shorthand, where a trailing `?`
    /// marks the key optional.
    pub fn parse(shorthand: &str) -> Result<Self, SchemaDefinitionError> {
        let (name, optional) = match shorthand.strip_suffix('?') {
            Some(name) => (name, true),
            None => (shorthand, false),
        };
        if name.is_empty() {
            return Err(SchemaDefinitionError::MalformedKey(shorthand.to_string()));
        }
        let key = Self::new(name);
        Ok(if optional { key.optional() } else { key })
    }

    /// Sets the checker applied to the value.
    pub fn checker<C: Checker + 'static>(mut self, checker: C) -> Self {
        self.checker = checker.into_shared();
        self
    }

    /// Stores the checked value under `name` instead of the input key.
    pub fn to_name(mut self, name: impl Into<String>) -> Self {
        self.to_name = Some(name.into());
        self
    }

    /// Checks `value` in place of a missing input key.
    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(KeyDefault::Value(value));
        self
    }

    /// Like [`Key::default`], calling `produce` each time the default is needed.
    pub fn default_with<F>(mut self, produce: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(KeyDefault::With(Arc::new(produce)));
        self
    }

    /// A missing optional key produces nothing instead of an error.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Input key name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The output name: the rename target, or the input key.
    pub fn output_name(&self) -> &str {
        self.to_name.as_deref().unwrap_or(&self.name)
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }
}

impl KeyExtractor for Key {
    fn extract(&self, data: &Map<String, Value>, context: Option<&Value>) -> Vec<Extracted> {
        let touched = vec![self.name.clone()];
        let result = match (data.get(&self.name), &self.default) {
            (Some(value), _) => self.checker.check_with_context(value, context),
            (None, Some(default)) => self.checker.check_with_context(&default.resolve(), context),
            (None, None) if self.optional => return Vec::new(),
            (None, None) => {
                let error = DataError::new("is required").with_code(codes::REQUIRED);
                return vec![Extracted::new(self.name.clone(), Err(error), touched)];
            }
        };
        vec![Extracted::new(self.output_name(), result, touched)]
    }

    fn source_names(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn output_names(&self) -> Vec<String> {
        vec![self.output_name().to_string()]
    }

    fn describe(&self) -> String {
        match &self.to_name {
            Some(to_name) => format!("<Key \"{}\" to \"{}\">", self.name, to_name),
            None => format!("<Key \"{}\">", self.name),
        }
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&KeyExtractor::describe(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::numeric::Int;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn data(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn test_present_key() {
        let key = Key::new("a").checker(Int::new());
        let extracted = key.extract(&data(json!({"a": 1})), None);
        assert_eq!(extracted, vec![Extracted::single("a", Ok(json!(1)))]);
    }

    #[test]
    fn test_missing_required_key() {
        let extracted = Key::new("a").to_name("b").extract(&data(json!({})), None);
        assert_eq!(extracted.len(), 1);
        assert_eq!(extracted[0].name, "a");
        let error = extracted[0].result.as_ref().unwrap_err();
        assert_eq!(error.message(), Some("is required"));
        assert_eq!(error.code, codes::REQUIRED);
    }

    #[test]
    fn test_missing_optional_key_yields_nothing() {
        assert!(Key::new("a").optional().extract(&data(json!({})), None).is_empty());
    }

    #[test]
    fn test_default_is_checked_and_renamed() {
        let key = Key::new("a").checker(Int::new().convert()).default(json!("7")).to_name("b");
        let extracted = key.extract(&data(json!({})), None);
        assert_eq!(extracted[0].name, "b");
        assert_eq!(extracted[0].result, Ok(json!(7)));
        assert_eq!(extracted[0].touched, vec!["a".to_string()]);
    }

    #[test]
    fn test_default_producer_runs_per_check() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let key = Key::new("a").default_with(move || json!(counter.fetch_add(1, Ordering::SeqCst)));
        assert_eq!(key.extract(&data(json!({})), None)[0].result, Ok(json!(0)));
        assert_eq!(key.extract(&data(json!({})), None)[0].result, Ok(json!(1)));
        assert_eq!(key.extract(&data(json!({"a": "x"})), None)[0].result, Ok(json!("x")));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_parse_shorthand() {
        let key = Key::parse("b?").unwrap();
        assert_eq!(key.name(), "b");
        assert!(key.is_optional());
        assert!(!Key::parse("b").unwrap().is_optional());
        assert!(matches!(Key::parse("?"), Err(SchemaDefinitionError::MalformedKey(_))));
        assert!(matches!(Key::parse(""), Err(SchemaDefinitionError::MalformedKey(_))));
    }

    #[test]
    fn test_describe() {
        assert_eq!(KeyExtractor::describe(&Key::new("a")), "<Key \"a\">");
        assert_eq!(KeyExtractor::describe(&Key::new("a").to_name("b")), "<Key \"a\" to \"b\">");
    }
}
