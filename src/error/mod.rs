//! Error types.
//!
//! - [`DataError`]: the structured failure returned by `check`
//! - [`Violations`]: its flat, path-addressed projection
//! - [`SchemaDefinitionError`]: hard failures while building a schema

mod data_error;
mod definition;
mod violation;

pub use data_error::{DataError, ErrorBody, ErrorMap, ErrorReport};
pub use definition::SchemaDefinitionError;
pub use violation::{Violation, Violations};
