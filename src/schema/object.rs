//! Fixed-shape mappings.
//!
//! A [`Dict`] runs its key extractors in declaration order, then decides
//! what to do with input keys none of them consumed: ignore them, check
//! them with the extras checker, or reject them. Every failure is collected
//! into one aggregate keyed by output name.

use std::collections::HashSet;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::trace;

use crate::codes;
use crate::error::{DataError, ErrorMap, SchemaDefinitionError};
use crate::path::PathSegment;

use super::basic::Any;
use super::key::{Key, KeyExtractor};
use super::traits::{Checker, SharedChecker};

const WILDCARD: &str = "*";

#[derive(Clone)]
enum Entry {
    Key(Key),
    Extractor(Arc<dyn KeyExtractor>),
}

impl Entry {
    fn extractor(&self) -> &dyn KeyExtractor {
        match self {
            Entry::Key(key) => key as &dyn KeyExtractor,
            Entry::Extractor(extractor) => extractor.as_ref(),
        }
    }
}

/// What happens to input keys no extractor consumed.
#[derive(Clone, Default)]
struct ExtrasPolicy {
    allow_any: bool,
    allowed: Vec<String>,
    ignore_any: bool,
    ignored: Vec<String>,
    checker: Option<SharedChecker>,
}

impl ExtrasPolicy {
    fn union(mut self, other: ExtrasPolicy) -> Self {
        self.allow_any |= other.allow_any;
        self.allowed.extend(other.allowed);
        self.ignore_any |= other.ignore_any;
        self.ignored.extend(other.ignored);
        self.checker = self.checker.or(other.checker);
        self
    }

    fn is_allowed(&self, name: &str) -> bool {
        self.allow_any || self.allowed.iter().any(|allowed| allowed == name)
    }

    fn is_ignored(&self, name: &str) -> bool {
        self.ignored.iter().any(|ignored| ignored == name)
    }

    fn describe(&self) -> Option<String> {
        let mut parts = Vec::new();
        if self.allow_any {
            parts.push("any".to_string());
        }
        if !self.allowed.is_empty() {
            parts.push(format!("extras=({})", self.allowed.join(", ")));
        }
        if self.ignore_any {
            parts.push("ignore_any".to_string());
        }
        if !self.ignored.is_empty() {
            parts.push(format!("ignore=({})", self.ignored.join(", ")));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

/// Checks an object with a fixed set of named keys.
///
/// All builders consume the dict and return a new one, so a configured
/// dict can be cloned and extended without touching the original.
///
/// A name that is both ignored and allowed is ignored.
///
/// # Example
///
/// ```rust
/// use scrutiny::{Checker, Dict, Schema};
/// use serde_json::json;
///
/// let user = Dict::new()
///     .field("name", Schema::string())
///     .optional("age", Schema::int())
///     .ignore_extra(["_meta"]);
///
/// assert_eq!(
///     user.check(&json!({"name": "ann", "_meta": 1})).unwrap(),
///     json!({"name": "ann"})
/// );
///
/// let error = user.check(&json!({"age": "x", "admin": true})).unwrap_err();
/// assert_eq!(
///     error.as_dict(false).to_json(),
///     json!({
///         "name": "is required",
///         "age": "value is not int",
///         "admin": "admin is not allowed key"
///     })
/// );
/// ```
#[derive(Clone)]
pub struct Dict {
    entries: Vec<Entry>,
    extras: ExtrasPolicy,
}

impl Dict {
    /// Creates an empty dict that rejects every extra key.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            extras: ExtrasPolicy::default(),
        }
    }

    /// Builds a dict from `(shorthand, checker)` pairs, where a trailing `?`
    /// on the name marks the key optional.
    ///
    /// ```rust
    /// use scrutiny::{Checker, CheckerExt, Dict, Schema};
    /// use serde_json::json;
    ///
    /// let dict = Dict::from_fields([("a", Schema::int().shared()), ("b?", Schema::bool().shared())]).unwrap();
    /// assert_eq!(dict.check(&json!({"a": 1})).unwrap(), json!({"a": 1}));
    /// ```
    pub fn from_fields<I, S>(fields: I) -> Result<Self, SchemaDefinitionError>
    where
        I: IntoIterator<Item = (S, SharedChecker)>,
        S: AsRef<str>,
    {
        fields.into_iter().try_fold(Self::new(), |dict, (shorthand, checker)| {
            Ok(dict.key(Key::parse(shorthand.as_ref())?.checker(checker)))
        })
    }

    /// A dict of required keys accepting any value.
    pub fn keys_only<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        names.into_iter().fold(Self::new(), |dict, name| dict.key(Key::new(name)))
    }

    /// Adds a required key.
    pub fn field<C: Checker + 'static>(self, name: impl Into<String>, checker: C) -> Self {
        self.key(Key::new(name).checker(checker))
    }

    /// Adds a key that is skipped when absent.
    pub fn optional<C: Checker + 'static>(self, name: impl Into<String>, checker: C) -> Self {
        self.key(Key::new(name).checker(checker).optional())
    }

    /// Adds a key that falls back to `value` when absent. The default is
    /// checked like any input value.
    pub fn default<C: Checker + 'static>(self, name: impl Into<String>, checker: C, value: Value) -> Self {
        self.key(Key::new(name).checker(checker).default(value))
    }

    /// Adds a key, replacing an earlier [`Key`] with the same input name.
    pub fn key(mut self, key: Key) -> Self {
        let existing = self
            .entries
            .iter()
            .position(|entry| matches!(entry, Entry::Key(k) if k.name() == key.name()));
        match existing {
            Some(index) => self.entries[index] = Entry::Key(key),
            None => self.entries.push(Entry::Key(key)),
        }
        self
    }

    /// Adds any extractor, such as those in [`super::keys`].
    pub fn extractor<E: KeyExtractor + 'static>(mut self, extractor: E) -> Self {
        self.entries.push(Entry::Extractor(Arc::new(extractor)));
        self
    }

    /// Accepts the named extra keys unchanged; `"*"` accepts every extra key.
    pub fn allow_extra<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if name == WILDCARD {
                self.extras.allow_any = true;
            } else {
                self.extras.allowed.push(name);
            }
        }
        self
    }

    /// Like [`Dict::allow_extra`], checking accepted extras with `checker`.
    pub fn allow_extra_with<I, S, C>(self, names: I, checker: C) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        C: Checker + 'static,
    {
        let mut dict = self.allow_extra(names);
        dict.extras.checker = Some(checker.into_shared());
        dict
    }

    /// Drops the named extra keys from the output; `"*"` drops every extra key.
    pub fn ignore_extra<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            if name == WILDCARD {
                self.extras.ignore_any = true;
            } else {
                self.extras.ignored.push(name);
            }
        }
        self
    }

    /// Marks the named keys optional; `"*"` marks every declared key.
    ///
    /// Only plain [`Key`]s are affected, matched by input name.
    pub fn make_optional<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        let every = names.iter().any(|name| name == WILDCARD);
        for entry in &mut self.entries {
            if let Entry::Key(key) = entry {
                if every || names.iter().any(|name| name == key.name()) {
                    *key = key.clone().optional();
                }
            }
        }
        self
    }

    /// Combines two dicts.
    ///
    /// Fails when both read the same input key or write the same output
    /// name. The extras policies are united.
    pub fn merge(mut self, other: Dict) -> Result<Dict, SchemaDefinitionError> {
        let overlapping = overlap(self.source_names(), other.source_names());
        if !overlapping.is_empty() {
            return Err(SchemaDefinitionError::OverlappingKeys(overlapping));
        }
        let overlapping = overlap(self.output_names(), other.output_names());
        if !overlapping.is_empty() {
            return Err(SchemaDefinitionError::OverlappingOutputNames(overlapping));
        }
        self.entries.extend(other.entries);
        self.extras = self.extras.union(other.extras);
        Ok(self)
    }

    /// Merges a list of keys as if they formed a dict of their own.
    pub fn merge_keys(self, keys: impl IntoIterator<Item = Key>) -> Result<Dict, SchemaDefinitionError> {
        let other = keys.into_iter().fold(Dict::new(), Dict::key);
        self.merge(other)
    }

    /// Input keys read by the extractors, in declaration order.
    pub fn source_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|entry| entry.extractor().source_names())
            .collect()
    }

    /// Output names the extractors may produce, in declaration order.
    pub fn output_names(&self) -> Vec<String> {
        self.entries
            .iter()
            .flat_map(|entry| entry.extractor().output_names())
            .collect()
    }

    fn check_extras(
        &self,
        data: &Map<String, Value>,
        touched: &HashSet<String>,
        collect: &mut Map<String, Value>,
        errors: &mut ErrorMap,
        context: Option<&Value>,
    ) {
        for (name, value) in data {
            if touched.contains(name) || self.extras.is_ignored(name) {
                continue;
            }
            if !self.extras.is_allowed(name) {
                errors.insert(
                    PathSegment::field(name.as_str()),
                    DataError::new(format!("{} is not allowed key", name)).with_code(codes::NOT_ALLOWED),
                );
                continue;
            }
            if collect.contains_key(name) {
                errors.insert(
                    PathSegment::field(name.as_str()),
                    DataError::new(format!("{} key was shadowed", name)).with_code(codes::SHADOWED),
                );
                continue;
            }
            let checked = match &self.extras.checker {
                Some(checker) => checker.check_with_context(value, context),
                None => Any.check_with_context(value, context),
            };
            match checked {
                Ok(checked) => {
                    collect.insert(name.clone(), checked);
                }
                Err(error) => {
                    errors.insert(PathSegment::field(name.as_str()), error);
                }
            }
        }
    }
}

impl Default for Dict {
    fn default() -> Self {
        Self::new()
    }
}

fn overlap(left: Vec<String>, right: Vec<String>) -> Vec<String> {
    let left: HashSet<String> = left.into_iter().collect();
    let mut shared: Vec<String> = right.into_iter().filter(|name| left.contains(name)).collect();
    shared.sort();
    shared.dedup();
    shared
}

impl Checker for Dict {
    fn check_with_context(&self, value: &Value, context: Option<&Value>) -> Result<Value, DataError> {
        let data = match value.as_object() {
            Some(data) => data,
            None => {
                return Err(DataError::new("value is not a dict")
                    .with_code(codes::IS_NOT_A_DICT)
                    .with_value(value.clone())
                    .with_checker(self.describe()));
            }
        };

        let mut collect = Map::new();
        let mut errors = ErrorMap::new();
        let mut touched = HashSet::new();
        for entry in &self.entries {
            for extracted in entry.extractor().extract(data, context) {
                touched.extend(extracted.touched);
                match extracted.result {
                    Ok(checked) => {
                        collect.insert(extracted.name, checked);
                    }
                    Err(error) => {
                        errors.insert(PathSegment::Field(extracted.name), error);
                    }
                }
            }
        }

        if !self.extras.ignore_any {
            self.check_extras(data, &touched, &mut collect, &mut errors, context);
        }

        if errors.is_empty() {
            Ok(Value::Object(collect))
        } else {
            trace!(failed = errors.len(), "dict keys did not match");
            Err(DataError::nested(errors).with_checker(self.describe()))
        }
    }

    fn describe(&self) -> String {
        let keys: Vec<String> = self.entries.iter().map(|entry| entry.extractor().describe()).collect();
        match self.extras.describe() {
            Some(extras) => format!("<Dict({} | {})>", extras, keys.join(", ")),
            None => format!("<Dict({})>", keys.join(", ")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::basic::Bool;
    use crate::schema::numeric::Int;
    use crate::schema::string::Str;
    use serde_json::json;

    #[test]
    fn test_required_and_optional() {
        let dict = Dict::new().field("a", Int::new()).optional("b", Bool);
        assert_eq!(dict.check(&json!({"a": 1})).unwrap(), json!({"a": 1}));
        let error = dict.check(&json!({})).unwrap_err();
        assert_eq!(error.as_dict(false).to_json(), json!({"a": "is required"}));
    }

    #[test]
    fn test_rejects_non_mapping() {
        let error = Dict::new().check(&json!([])).unwrap_err();
        assert_eq!(error.message(), Some("value is not a dict"));
        assert_eq!(error.code, codes::IS_NOT_A_DICT);
    }

    #[test]
    fn test_extra_key_not_allowed() {
        let error = Dict::new().check(&json!({"eggs": 1})).unwrap_err();
        let eggs = error.get("eggs").unwrap();
        assert_eq!(eggs.message(), Some("eggs is not allowed key"));
        assert_eq!(eggs.code, codes::NOT_ALLOWED);
    }

    #[test]
    fn test_extras_checker() {
        let dict = Dict::new().allow_extra_with(["*"], Int::new());
        assert_eq!(dict.check(&json!({"a": 1})).unwrap(), json!({"a": 1}));
        let error = dict.check(&json!({"a": "x"})).unwrap_err();
        assert_eq!(error.as_dict(false).to_json(), json!({"a": "value is not int"}));
    }

    #[test]
    fn test_shadowed_extra() {
        let dict = Dict::new()
            .key(Key::new("bar").checker(Str::new()).default(json!("x")).to_name("baz"))
            .field("foo", Int::new())
            .allow_extra(["*"]);
        let error = dict.check(&json!({"baz": "spam", "foo": 4})).unwrap_err();
        assert_eq!(error.as_dict(false).to_json(), json!({"baz": "baz key was shadowed"}));
        assert_eq!(error.get("baz").map(|e| e.code.as_str()), Some(codes::SHADOWED));
    }

    #[test]
    fn test_key_replaces_same_name() {
        let dict = Dict::new().field("a", Int::new()).field("a", Str::new());
        assert_eq!(dict.source_names(), vec!["a".to_string()]);
        assert!(dict.check(&json!({"a": "text"})).is_ok());
    }

    #[test]
    fn test_describe() {
        let dict = Dict::new().field("a", Int::new()).allow_extra(["*", "eggs"]);
        assert_eq!(dict.describe(), "<Dict(any, extras=(eggs) | <Key \"a\">)>");
    }

    #[test]
    fn test_overlap_is_sorted_and_unique() {
        let shared = overlap(
            vec!["b".to_string(), "a".to_string()],
            vec!["a".to_string(), "b".to_string(), "a".to_string()],
        );
        assert_eq!(shared, vec!["a".to_string(), "b".to_string()]);
    }
}
