//! Open key/value mappings.

use serde_json::{Map, Value};
use tracing::trace;

use crate::codes;
use crate::error::{DataError, ErrorMap};
use crate::path::PathSegment;

use super::traits::{Checker, SharedChecker};

/// Checks every key of an object against one checker and every value
/// against another.
///
/// Keys reach the key checker as JSON strings. A checked key that is not a
/// string is written to the output as its JSON text. A failing pair is
/// reported under its original key, with `"key"` and/or `"value"` entries
/// for the side that failed.
///
/// # Example
///
/// ```rust
/// use scrutiny::{Checker, Schema};
/// use serde_json::json;
///
/// let counters = Schema::mapping(Schema::string(), Schema::int());
///
/// let error = counters.check(&json!({"a": 1, "b": "x"})).unwrap_err();
/// assert_eq!(error.as_dict(false).to_json(), json!({"b": {"value": "value is not int"}}));
/// ```
#[derive(Clone)]
pub struct Mapping {
    key: SharedChecker,
    value: SharedChecker,
}

impl Mapping {
    /// Creates a mapping checker applying `key` to every key and `value` to every value.
    pub fn new<K, V>(key: K, value: V) -> Self
    where
        K: Checker + 'static,
        V: Checker + 'static,
    {
        Self {
            key: key.into_shared(),
            value: value.into_shared(),
        }
    }
}

fn key_text(key: Value) -> String {
    match key {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

impl Checker for Mapping {
    fn check_with_context(&self, value: &Value, context: Option<&Value>) -> Result<Value, DataError> {
        let entries = match value.as_object() {
            Some(entries) => entries,
            None => {
                return Err(DataError::new("value is not a dict")
                    .with_code(codes::IS_NOT_A_DICT)
                    .with_value(value.clone())
                    .with_checker(self.describe()));
            }
        };

        let mut checked = Map::new();
        let mut errors = ErrorMap::new();
        for (key, item) in entries {
            let key_result = self.key.check_with_context(&Value::String(key.clone()), context);
            let value_result = self.value.check_with_context(item, context);
            match (key_result, value_result) {
                (Ok(checked_key), Ok(checked_value)) => {
                    checked.insert(key_text(checked_key), checked_value);
                }
                (key_result, value_result) => {
                    let mut pair = ErrorMap::new();
                    if let Err(error) = key_result {
                        pair.insert(PathSegment::field("key"), error);
                    }
                    if let Err(error) = value_result {
                        pair.insert(PathSegment::field("value"), error);
                    }
                    errors.insert(
                        PathSegment::field(key.as_str()),
                        DataError::nested(pair).with_code(codes::PAIR_MEMBERS_DID_NOT_MATCH),
                    );
                }
            }
        }

        if errors.is_empty() {
            Ok(Value::Object(checked))
        } else {
            trace!(failed = errors.len(), total = entries.len(), "mapping pairs did not match");
            Err(DataError::nested(errors).with_checker(self.describe()))
        }
    }

    fn describe(&self) -> String {
        format!("<Mapping({} => {})>", self.key.describe(), self.value.describe())
    }
}
