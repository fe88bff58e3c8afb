//! Extractors that read several input keys at once.
//!
//! - [`subdict`]: checks a group of keys, then the group as a whole
//! - [`xor_key`]: exactly one of two keys must be present
//! - [`confirm_key`]: two keys must both be present and equal
//! - [`keys_subset`]: hands several keys to one checker that returns a mapping
//!
//! # Example
//!
//! ```rust
//! use scrutiny::keys::confirm_key;
//! use scrutiny::{Checker, Dict, Schema};
//! use serde_json::json;
//!
//! let signup = Dict::new()
//!     .field("email", Schema::string())
//!     .extractor(confirm_key("password", "password_confirm", Schema::string()));
//!
//! let error = signup
//!     .check(&json!({"email": "a@b.c", "password": "one", "password_confirm": "two"}))
//!     .unwrap_err();
//! assert_eq!(
//!     error.as_dict(false).to_json(),
//!     json!({"password_confirm": "must be equal to password"})
//! );
//! ```

use serde_json::{Map, Value};

use crate::codes;
use crate::error::{DataError, ErrorBody};

use super::key::{Extracted, Key, KeyExtractor};
use super::traits::{Checker, SharedChecker};

/// Built by [`subdict`].
#[derive(Clone)]
pub struct SubDict {
    name: String,
    keys: Vec<Key>,
    checker: SharedChecker,
}

/// Runs `keys` and, when all of them pass, feeds the collected sub-mapping
/// to `checker`, producing one result under `name`.
///
/// When any inner key fails its own results are reported instead. When the
/// inner keys produce nothing (all optional and absent) nothing is produced.
pub fn subdict<C: Checker + 'static>(name: impl Into<String>, keys: impl IntoIterator<Item = Key>, checker: C) -> SubDict {
    SubDict {
        name: name.into(),
        keys: keys.into_iter().collect(),
        checker: checker.into_shared(),
    }
}

impl KeyExtractor for SubDict {
    fn extract(&self, data: &Map<String, Value>, context: Option<&Value>) -> Vec<Extracted> {
        let inner: Vec<Extracted> = self
            .keys
            .iter()
            .flat_map(|key| key.extract(data, context))
            .collect();

        if inner.iter().any(|extracted| extracted.result.is_err()) {
            return inner;
        }
        if inner.is_empty() {
            return Vec::new();
        }

        let mut touched = Vec::new();
        let mut collect = Map::new();
        for extracted in inner {
            touched.extend(extracted.touched);
            if let Ok(value) = extracted.result {
                collect.insert(extracted.name, value);
            }
        }
        let result = self.checker.check_with_context(&Value::Object(collect), context);
        vec![Extracted::new(self.name.clone(), result, touched)]
    }

    fn source_names(&self) -> Vec<String> {
        self.keys.iter().flat_map(KeyExtractor::source_names).collect()
    }

    fn output_names(&self) -> Vec<String> {
        let mut names = vec![self.name.clone()];
        names.extend(self.keys.iter().flat_map(KeyExtractor::output_names));
        names
    }

    fn describe(&self) -> String {
        format!("<SubDict \"{}\">", self.name)
    }
}

/// Built by [`xor_key`].
#[derive(Clone)]
pub struct XorKey {
    first: String,
    second: String,
    checker: SharedChecker,
}

/// Requires exactly one of `first` and `second`. The present value is
/// checked and always stored under `first`.
pub fn xor_key<C: Checker + 'static>(first: impl Into<String>, second: impl Into<String>, checker: C) -> XorKey {
    XorKey {
        first: first.into(),
        second: second.into(),
        checker: checker.into_shared(),
    }
}

impl KeyExtractor for XorKey {
    fn extract(&self, data: &Map<String, Value>, context: Option<&Value>) -> Vec<Extracted> {
        match (data.get(&self.first), data.get(&self.second)) {
            (Some(value), None) => vec![Extracted::single(
                &self.first,
                self.checker.check_with_context(value, context),
            )],
            (None, Some(value)) => vec![Extracted::new(
                self.first.clone(),
                self.checker.check_with_context(value, context),
                vec![self.second.clone()],
            )],
            (Some(_), Some(_)) => vec![
                Extracted::single(
                    &self.first,
                    Err(DataError::new(format!("correct only if {} is not defined", self.second))
                        .with_code(codes::MUTUALLY_EXCLUSIVE)),
                ),
                Extracted::single(
                    &self.second,
                    Err(DataError::new(format!("correct only if {} is not defined", self.first))
                        .with_code(codes::MUTUALLY_EXCLUSIVE)),
                ),
            ],
            (None, None) => vec![
                Extracted::single(
                    &self.first,
                    Err(DataError::new(format!("is required if {} is not defined", self.second))
                        .with_code(codes::REQUIRED)),
                ),
                Extracted::single(
                    &self.second,
                    Err(DataError::new(format!("is required if {} is not defined", self.first))
                        .with_code(codes::REQUIRED)),
                ),
            ],
        }
    }

    fn source_names(&self) -> Vec<String> {
        vec![self.first.clone(), self.second.clone()]
    }

    fn output_names(&self) -> Vec<String> {
        vec![self.first.clone(), self.second.clone()]
    }

    fn describe(&self) -> String {
        format!("<XorKey \"{}\" ^ \"{}\">", self.first, self.second)
    }
}

/// Built by [`confirm_key`].
#[derive(Clone)]
pub struct ConfirmKey {
    name: String,
    confirm_name: String,
    checker: SharedChecker,
}

/// Requires `name` and `confirm_name`, checks both with `checker` and
/// reports a mismatch under `confirm_name`.
pub fn confirm_key<C: Checker + 'static>(
    name: impl Into<String>,
    confirm_name: impl Into<String>,
    checker: C,
) -> ConfirmKey {
    ConfirmKey {
        name: name.into(),
        confirm_name: confirm_name.into(),
        checker: checker.into_shared(),
    }
}

impl ConfirmKey {
    fn extract_one(&self, name: &str, value: Option<&Value>, context: Option<&Value>) -> Extracted {
        let result = match value {
            Some(value) => self.checker.check_with_context(value, context),
            None => Err(DataError::new("is required").with_code(codes::REQUIRED)),
        };
        Extracted::single(name, result)
    }
}

impl KeyExtractor for ConfirmKey {
    fn extract(&self, data: &Map<String, Value>, context: Option<&Value>) -> Vec<Extracted> {
        let first = data.get(&self.name);
        let second = data.get(&self.confirm_name);
        let mut out = vec![self.extract_one(&self.name, first, context)];
        match (first, second) {
            (Some(first), Some(second)) if first != second => out.push(Extracted::single(
                &self.confirm_name,
                Err(DataError::new(format!("must be equal to {}", self.name))
                    .with_code(codes::NOT_EQUAL)
                    .with_value(second.clone())),
            )),
            _ => out.push(self.extract_one(&self.confirm_name, second, context)),
        }
        out
    }

    fn source_names(&self) -> Vec<String> {
        vec![self.name.clone(), self.confirm_name.clone()]
    }

    fn output_names(&self) -> Vec<String> {
        vec![self.name.clone(), self.confirm_name.clone()]
    }

    fn describe(&self) -> String {
        format!("<ConfirmKey \"{}\" = \"{}\">", self.name, self.confirm_name)
    }
}

/// Built by [`keys_subset`].
#[derive(Clone)]
pub struct KeysSubset {
    names: Vec<String>,
    checker: SharedChecker,
}

/// Hands the present entries among `names` to `checker` as one mapping.
///
/// Every entry of the mapping the checker returns becomes its own result,
/// and so does every entry of an aggregate error. A terminal error, or a
/// success that is not a mapping, is reported under `[name, ...]`.
///
/// ```rust
/// use scrutiny::keys::keys_subset;
/// use scrutiny::{Call, Checker, Dict};
/// use serde_json::{json, Value};
///
/// let full_name = Call::new(|data: &Value| {
///     let parts: Vec<&str> = ["name", "last"].iter().filter_map(|k| data[*k].as_str()).collect();
///     Ok(json!({"name": parts.join(" ")}))
/// });
/// let person = Dict::new().extractor(keys_subset(["name", "last"], full_name));
///
/// assert_eq!(
///     person.check(&json!({"name": "Adam", "last": "Smith"})).unwrap(),
///     json!({"name": "Adam Smith"})
/// );
/// ```
pub fn keys_subset<I, S, C>(names: I, checker: C) -> KeysSubset
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    C: Checker + 'static,
{
    KeysSubset {
        names: names.into_iter().map(Into::into).collect(),
        checker: checker.into_shared(),
    }
}

impl KeysSubset {
    fn label(&self) -> String {
        format!("[{}]", self.names.join(", "))
    }
}

impl KeyExtractor for KeysSubset {
    fn extract(&self, data: &Map<String, Value>, context: Option<&Value>) -> Vec<Extracted> {
        let subset: Map<String, Value> = self
            .names
            .iter()
            .filter_map(|name| data.get(name).map(|value| (name.clone(), value.clone())))
            .collect();

        match self.checker.check_with_context(&Value::Object(subset), context) {
            Ok(Value::Object(checked)) => checked
                .into_iter()
                .map(|(name, value)| Extracted::new(name, Ok(value), self.names.clone()))
                .collect(),
            Ok(other) => vec![Extracted::new(
                self.label(),
                Err(DataError::new("value is not a dict")
                    .with_code(codes::IS_NOT_A_DICT)
                    .with_value(other)),
                self.names.clone(),
            )],
            Err(DataError {
                error: ErrorBody::Nested(errors),
                ..
            }) => errors
                .into_iter()
                .map(|(segment, error)| Extracted::new(segment.to_string(), Err(error), self.names.clone()))
                .collect(),
            Err(error) => vec![Extracted::new(self.label(), Err(error), self.names.clone())],
        }
    }

    fn source_names(&self) -> Vec<String> {
        self.names.clone()
    }

    /// The checker decides the real output names; the input names are the
    /// best guess available for overlap detection.
    fn output_names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn describe(&self) -> String {
        format!("<KeysSubset {}>", self.label())
    }
}
