//! # Scrutiny
//!
//! Composable checkers that validate and convert JSON-like data, reporting
//! every violation at once with the location it happened at.
//!
//! ## Overview
//!
//! A [`Checker`] either returns the (possibly converted) value or fails with
//! a [`DataError`]. Containers visit every element before failing, so the
//! error mirrors the shape of the input: list index, tuple position, dict
//! key or alternative index map to the nested error found there.
//!
//! ## Core Types
//!
//! - [`Checker`]: the contract, with `or_else`/`and_then` composition via [`CheckerExt`]
//! - [`List`], [`Tuple`], [`Mapping`], [`Dict`]: containers
//! - [`Key`] and [`keys`]: field policies for [`Dict`]
//! - [`ForwardRegistry`] / [`Forward`]: recursive schemas
//! - [`DataError`]: the structured failure, projected with [`DataError::as_dict`]
//!   or flattened into [`Violations`]
//! - [`Schema`]: entry point for building checkers
//!
//! ## Example
//!
//! ```rust
//! use scrutiny::{Checker, Schema};
//! use serde_json::json;
//!
//! let order = Schema::dict()
//!     .field("id", Schema::int().convert())
//!     .field("items", Schema::list(Schema::string()).min_len(1));
//!
//! assert_eq!(
//!     order.check(&json!({"id": "7", "items": ["tea"]})).unwrap(),
//!     json!({"id": 7, "items": ["tea"]})
//! );
//!
//! let error = order.check(&json!({"id": "x", "items": ["tea", 2]})).unwrap_err();
//! assert_eq!(
//!     error.as_dict(false).to_json(),
//!     json!({
//!         "id": "value can't be converted to int",
//!         "items": {"1": "value is not a string"}
//!     })
//! );
//! ```
//!
//! Logging goes through `tracing`; the crate never installs a subscriber.

pub mod codes;
pub mod error;
pub mod path;
pub mod registry;
pub mod schema;

pub use error::{DataError, ErrorBody, ErrorMap, ErrorReport, SchemaDefinitionError, Violation, Violations};
pub use path::{JsonPath, PathSegment};
pub use registry::{Forward, ForwardRegistry, RegistryError};
pub use schema::keys;
pub use schema::{
    ensure_checker, And, Any, Atom, Bool, Call, Checker, CheckerExt, Dict, Enum, Extracted, Float, Int, Key,
    KeyDefault, KeyExtractor, List, Mapping, Null, OnError, Or, Schema, SharedChecker, Str, Tuple, TypeOf,
    ValueKind, WithRepr,
};

/// Type alias for validation results using Violations
pub type ValidationResult<T> = stillwater::Validation<T, Violations>;
