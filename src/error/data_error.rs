//! The structured failure raised by checkers.
//!
//! A [`DataError`] is either terminal (a message) or an aggregate: a mapping
//! from [`PathSegment`] to nested errors whose shape mirrors the input that
//! failed. Containers build aggregates; leaves build terminal errors.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::codes;
use crate::error::violation::{Violation, Violations};
use crate::path::{JsonPath, PathSegment};

/// Insertion-ordered mapping from sub-location to nested error.
pub type ErrorMap = IndexMap<PathSegment, DataError>;

/// The payload of a [`DataError`]: a message or a mapping of nested errors, never both.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Message(String),
    Nested(ErrorMap),
}

/// A validation failure.
///
/// - **error**: the message, or the nested errors of an aggregate
/// - **value**: the offending input, absent for aggregates
/// - **code**: machine-readable classification, see [`crate::codes`]
/// - **checker**: description of the checker that raised it
///
/// # Example
///
/// ```rust
/// use scrutiny::{DataError, PathSegment};
/// use serde_json::json;
///
/// let error = DataError::new("Wait for good value")
///     .with_value(json!("BAD ONE"))
///     .with_code("bad_value");
///
/// assert_eq!(error.as_dict(false).to_json(), json!("Wait for good value"));
/// assert_eq!(
///     error.as_dict(true).to_json(),
///     json!("Wait for good value, got \"BAD ONE\"")
/// );
///
/// let aggregate = DataError::nested([(PathSegment::Index(0), error)].into_iter().collect());
/// assert_eq!(aggregate.as_dict(false).to_json(), json!({"0": "Wait for good value"}));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DataError {
    pub error: ErrorBody,
    pub value: Option<Value>,
    pub code: String,
    pub checker: Option<String>,
}

impl DataError {
    /// Creates a terminal error. The code defaults to `validation_error`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: ErrorBody::Message(message.into()),
            value: None,
            code: codes::VALIDATION_ERROR.to_string(),
            checker: None,
        }
    }

    /// Creates an aggregate error with code `some_elements_did_not_match`.
    pub fn nested(errors: ErrorMap) -> Self {
        Self {
            error: ErrorBody::Nested(errors),
            value: None,
            code: codes::SOME_ELEMENTS_DID_NOT_MATCH.to_string(),
            checker: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn with_checker(mut self, checker: impl Into<String>) -> Self {
        self.checker = Some(checker.into());
        self
    }

    /// Returns the message of a terminal error.
    pub fn message(&self) -> Option<&str> {
        match &self.error {
            ErrorBody::Message(message) => Some(message),
            ErrorBody::Nested(_) => None,
        }
    }

    /// Returns the nested errors of an aggregate.
    pub fn errors(&self) -> Option<&ErrorMap> {
        match &self.error {
            ErrorBody::Message(_) => None,
            ErrorBody::Nested(errors) => Some(errors),
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self.error, ErrorBody::Nested(_))
    }

    /// Looks up the nested error at `segment`.
    pub fn get(&self, segment: impl Into<PathSegment>) -> Option<&DataError> {
        self.errors()?.get(&segment.into())
    }

    /// Projects the error into plain messages.
    ///
    /// Terminal errors become their message, suffixed with `, got <value>`
    /// when `include_value` is set and the offending value is known.
    /// Aggregates are projected recursively. The error itself is not touched,
    /// so projecting twice yields identical reports.
    pub fn as_dict(&self, include_value: bool) -> ErrorReport {
        match &self.error {
            ErrorBody::Message(message) => match (&self.value, include_value) {
                (Some(value), true) => ErrorReport::Message(format!("{}, got {}", message, value)),
                _ => ErrorReport::Message(message.clone()),
            },
            ErrorBody::Nested(errors) => ErrorReport::Nested(
                errors
                    .iter()
                    .map(|(segment, error)| (segment.clone(), error.as_dict(include_value)))
                    .collect(),
            ),
        }
    }

    /// Renders the error with its codes as a JSON value.
    ///
    /// Terminal errors render as `{"code": .., "message": ..}`, aggregates as
    /// `{"code": .., "nested": {..}}`.
    pub fn to_struct(&self, include_value: bool) -> Value {
        let mut out = Map::new();
        out.insert("code".to_string(), Value::String(self.code.clone()));
        match &self.error {
            ErrorBody::Message(_) => {
                if let ErrorReport::Message(message) = self.as_dict(include_value) {
                    out.insert("message".to_string(), Value::String(message));
                }
            }
            ErrorBody::Nested(errors) => {
                let nested = errors
                    .iter()
                    .map(|(segment, error)| (segment.to_string(), error.to_struct(include_value)))
                    .collect();
                out.insert("nested".to_string(), Value::Object(nested));
            }
        }
        Value::Object(out)
    }

    /// Flattens the tree into one [`Violation`] per terminal error, in tree order.
    pub fn flatten(&self) -> Violations {
        let mut out = Vec::new();
        self.collect_violations(&JsonPath::root(), &mut out);
        Violations::try_from_vec(out).unwrap_or_else(|| {
            // an aggregate with no entries still has to report something
            Violations::single(Violation::new(JsonPath::root(), self.to_string()).with_code(&self.code))
        })
    }

    fn collect_violations(&self, path: &JsonPath, out: &mut Vec<Violation>) {
        match &self.error {
            ErrorBody::Message(message) => {
                let mut violation = Violation::new(path.clone(), message.clone()).with_code(&self.code);
                if let Some(value) = &self.value {
                    violation = violation.with_got(value.to_string());
                }
                out.push(violation);
            }
            ErrorBody::Nested(errors) => {
                for (segment, error) in errors {
                    error.collect_violations(&path.push(segment.clone()), out);
                }
            }
        }
    }
}

impl Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.error {
            ErrorBody::Message(message) => write!(f, "{}", message),
            ErrorBody::Nested(errors) => {
                write!(f, "{{")?;
                for (i, (segment, error)) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", segment, error)?;
                }
                write!(f, "}}")
            }
        }
    }
}

impl std::error::Error for DataError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<DataError>();
    assert_sync::<DataError>();
};

/// Plain projection of a [`DataError`], produced by [`DataError::as_dict`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorReport {
    Message(String),
    Nested(IndexMap<PathSegment, ErrorReport>),
}

impl ErrorReport {
    pub fn message(&self) -> Option<&str> {
        match self {
            ErrorReport::Message(message) => Some(message),
            ErrorReport::Nested(_) => None,
        }
    }

    pub fn get(&self, segment: impl Into<PathSegment>) -> Option<&ErrorReport> {
        match self {
            ErrorReport::Message(_) => None,
            ErrorReport::Nested(entries) => entries.get(&segment.into()),
        }
    }

    /// Renders the report as JSON; index keys become decimal strings.
    pub fn to_json(&self) -> Value {
        match self {
            ErrorReport::Message(message) => Value::String(message.clone()),
            ErrorReport::Nested(entries) => Value::Object(
                entries
                    .iter()
                    .map(|(segment, report)| (segment.to_string(), report.to_json()))
                    .collect(),
            ),
        }
    }
}

impl From<&DataError> for ErrorReport {
    fn from(error: &DataError) -> Self {
        error.as_dict(false)
    }
}
