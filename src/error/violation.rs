//! Flat, path-addressed view of a failed check.
//!
//! [`DataError`](crate::DataError) mirrors the shape of the input. Callers that
//! want a list of "field X: message" lines flatten it into [`Violations`], a
//! non-empty collection that combines with other failures through
//! stillwater's `Semigroup`.

use std::fmt::{self, Display};

use stillwater::prelude::*;

use crate::path::JsonPath;

/// One terminal failure together with where it happened.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: JsonPath,
    pub message: String,
    /// The offending value rendered as JSON, when known.
    pub got: Option<String>,
    pub code: String,
}

impl Violation {
    pub fn new(path: JsonPath, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
            got: None,
            code: crate::codes::VALIDATION_ERROR.to_string(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_got(mut self, got: impl Into<String>) -> Self {
        self.got = Some(got.into());
        self
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.message)?;
        } else {
            write!(f, "{}: {}", self.path, self.message)?;
        }
        if let Some(ref got) = self.got {
            write!(f, " (got: {})", got)?;
        }
        Ok(())
    }
}

impl std::error::Error for Violation {}

/// A non-empty list of [`Violation`]s.
///
/// ```rust
/// use scrutiny::{JsonPath, Violation, Violations};
/// use stillwater::prelude::*;
///
/// let name = Violations::single(Violation::new(JsonPath::root().push_field("name"), "is required"));
/// let age = Violations::single(Violation::new(JsonPath::root().push_field("age"), "value is not int"));
///
/// assert_eq!(name.combine(age).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Violations(NonEmptyVec<Violation>);

impl Violations {
    pub fn single(violation: Violation) -> Self {
        Self(NonEmptyVec::singleton(violation))
    }

    /// Returns `None` when `violations` is empty.
    pub fn try_from_vec(violations: Vec<Violation>) -> Option<Self> {
        NonEmptyVec::from_vec(violations).map(Self)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> impl Iterator<Item = &Violation> {
        self.0.iter()
    }

    pub fn first(&self) -> &Violation {
        self.0.head()
    }

    /// Returns the violations recorded exactly at `path`.
    pub fn at_path(&self, path: &JsonPath) -> Vec<&Violation> {
        self.0.iter().filter(|v| &v.path == path).collect()
    }

    pub fn with_code(&self, code: &str) -> Vec<&Violation> {
        self.0.iter().filter(|v| v.code == code).collect()
    }

    pub fn into_vec(self) -> Vec<Violation> {
        self.0.into_vec()
    }
}

impl Semigroup for Violations {
    fn combine(self, other: Self) -> Self {
        Violations(self.0.combine(other.0))
    }
}

impl Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "check failed with {} violation(s):", self.len())?;
        for (i, violation) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, violation)?;
        }
        Ok(())
    }
}

impl std::error::Error for Violations {}

impl IntoIterator for Violations {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Violations>();
    assert_sync::<Violations>();
};
