//! Errors raised while a schema is being built.
//!
//! These never surface from `check`: an ill-formed schema fails at the call
//! that tried to build it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaDefinitionError {
    /// Two merged dicts read the same input key.
    #[error("merged dicts should have no overlapping keys: {0:?}")]
    OverlappingKeys(Vec<String>),

    /// Two merged dicts write the same output name.
    #[error("merged dicts should have no overlapping output names: {0:?}")]
    OverlappingOutputNames(Vec<String>),

    /// A key shorthand such as `""` or `"?"` names no key.
    #[error("malformed key shorthand '{0}'")]
    MalformedKey(String),

    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}
