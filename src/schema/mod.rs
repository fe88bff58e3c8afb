//! Checker definitions.
//!
//! Leaves check single values; containers ([`List`], [`Tuple`],
//! [`Mapping`], [`Dict`]) visit every element and report all failures at
//! once; combinators ([`Or`], [`And`]) compose checkers.
//!
//! # Example
//!
//! ```rust
//! use scrutiny::{Checker, CheckerExt, Schema};
//! use serde_json::json;
//!
//! let point = Schema::tuple(vec![Schema::int().shared(), Schema::int().shared()]);
//!
//! assert_eq!(point.check(&json!([1, 2])).unwrap(), json!([1, 2]));
//! assert_eq!(
//!     point.check(&json!([1])).unwrap_err().to_string(),
//!     "value must contain 2 items"
//! );
//! ```

mod array;
mod basic;
mod combinators;
mod key;
pub mod keys;
mod mapping;
mod numeric;
mod object;
mod string;
mod traits;

use serde_json::Value;

pub use array::{List, Tuple};
pub use basic::{Any, Atom, Bool, Call, Enum, Null, TypeOf, ValueKind};
pub use combinators::{And, OnError, Or, WithRepr};
pub use key::{Extracted, Key, KeyDefault, KeyExtractor};
pub use mapping::Mapping;
pub use numeric::{Float, Int};
pub use object::Dict;
pub use string::Str;
pub use traits::{ensure_checker, Checker, CheckerExt, SharedChecker};

/// Entry point for building checkers.
///
/// Every factory returns the concrete checker so its builder methods stay
/// available.
///
/// # Example
///
/// ```rust
/// use scrutiny::{Checker, Schema};
/// use serde_json::json;
///
/// let tags = Schema::list(Schema::string().max_len(16)).max_len(8);
/// let config = Schema::dict()
///     .field("name", Schema::string())
///     .default("tags", tags, json!([]))
///     .optional("env", Schema::mapping(Schema::string(), Schema::string()));
///
/// assert_eq!(
///     config.check(&json!({"name": "web"})).unwrap(),
///     json!({"name": "web", "tags": []})
/// );
/// ```
pub struct Schema;

impl Schema {
    /// Accepts every value unchanged.
    pub fn any() -> Any {
        Any
    }

    /// Accepts only `null`.
    pub fn null() -> Null {
        Null
    }

    /// Accepts `true` or `false`.
    pub fn bool() -> Bool {
        Bool
    }

    /// Creates a non-blank string checker.
    pub fn string() -> Str {
        Str::new()
    }

    /// Creates an integer checker.
    pub fn int() -> Int {
        Int::new()
    }

    /// Creates a float checker.
    pub fn float() -> Float {
        Float::new()
    }

    /// Accepts exactly `value`.
    pub fn atom(value: Value) -> Atom {
        Atom(value)
    }

    /// Accepts one of `variants`.
    pub fn enumeration(variants: impl IntoIterator<Item = Value>) -> Enum {
        Enum::new(variants)
    }

    /// Accepts values of one JSON kind unchanged.
    pub fn type_of(kind: ValueKind) -> TypeOf {
        TypeOf(kind)
    }

    /// Creates a list checker for elements accepted by `item`.
    pub fn list<C: Checker + 'static>(item: C) -> List {
        List::new(item)
    }

    /// Creates a fixed-length tuple checker.
    pub fn tuple(items: Vec<SharedChecker>) -> Tuple {
        Tuple::new(items)
    }

    /// Creates a free-form mapping checker.
    pub fn mapping<K, V>(key: K, value: V) -> Mapping
    where
        K: Checker + 'static,
        V: Checker + 'static,
    {
        Mapping::new(key, value)
    }

    /// Creates an empty dict checker.
    pub fn dict() -> Dict {
        Dict::new()
    }

    /// Accepts the first alternative that succeeds.
    pub fn or(alternatives: Vec<SharedChecker>) -> Or {
        Or::new(alternatives)
    }

    /// Chains two checkers, failing fast.
    pub fn and<A, B>(first: A, second: B) -> And
    where
        A: Checker + 'static,
        B: Checker + 'static,
    {
        And::new(first, second)
    }

    /// Accepts `null` or whatever `checker` accepts.
    pub fn nullable<C: Checker + 'static>(checker: C) -> Or {
        Or::new(vec![checker.into_shared(), Null.into_shared()])
    }
}
