//! Numeric leaf checkers.
//!
//! [`Int`] and [`Float`] check the number type and optional bounds. With
//! `convert()` they also accept numeric strings and return the parsed number,
//! so checking an already converted value returns it unchanged.

use std::fmt::Display;
use std::ops::RangeInclusive;

use serde_json::{Number, Value};

use crate::codes;
use crate::error::DataError;

use super::traits::Checker;

/// Inclusive and exclusive bounds shared by the numeric checkers.
#[derive(Debug, Clone, Copy, Default)]
struct Bounds<T> {
    gte: Option<T>,
    lte: Option<T>,
    gt: Option<T>,
    lt: Option<T>,
}

impl<T: PartialOrd + Display + Copy> Bounds<T> {
    /// Returns the first violated bound as `(message, code)`.
    fn violation(&self, n: T) -> Option<(String, &'static str)> {
        if let Some(gte) = self.gte {
            if n < gte {
                return Some((format!("value is less than {}", gte), codes::TOO_SMALL));
            }
        }
        if let Some(lte) = self.lte {
            if n > lte {
                return Some((format!("value is greater than {}", lte), codes::TOO_BIG));
            }
        }
        if let Some(lt) = self.lt {
            if n >= lt {
                return Some((format!("value should be less than {}", lt), codes::TOO_BIG));
            }
        }
        if let Some(gt) = self.gt {
            if n <= gt {
                return Some((format!("value should be greater than {}", gt), codes::TOO_SMALL));
            }
        }
        None
    }

    fn describe(&self, name: &str) -> String {
        let mut options = Vec::new();
        for (label, bound) in [("gte", self.gte), ("lte", self.lte), ("gt", self.gt), ("lt", self.lt)] {
            if let Some(bound) = bound {
                options.push(format!("{}={}", label, bound));
            }
        }
        if options.is_empty() {
            format!("<{}>", name)
        } else {
            format!("<{}({})>", name, options.join(", "))
        }
    }
}

macro_rules! bound_builders {
    ($num:ty) => {
        /// Value must be `>= min`.
        pub fn gte(mut self, min: $num) -> Self {
            self.bounds.gte = Some(min);
            self
        }

        /// Value must be `<= max`.
        pub fn lte(mut self, max: $num) -> Self {
            self.bounds.lte = Some(max);
            self
        }

        /// Value must be `> min`.
        pub fn gt(mut self, min: $num) -> Self {
            self.bounds.gt = Some(min);
            self
        }

        /// Value must be `< max`.
        pub fn lt(mut self, max: $num) -> Self {
            self.bounds.lt = Some(max);
            self
        }

        /// Value must lie within `range`, both ends included.
        pub fn range(self, range: RangeInclusive<$num>) -> Self {
            let (min, max) = range.into_inner();
            self.gte(min).lte(max)
        }

        /// Also accept strings holding a number, returning the parsed number.
        pub fn convert(mut self) -> Self {
            self.convert = true;
            self
        }
    };
}

/// Accepts integers. Floats with no fractional part are accepted and
/// returned as integers.
///
/// ```rust
/// use scrutiny::{Checker, Schema};
/// use serde_json::json;
///
/// let age = Schema::int().range(0..=150);
/// assert_eq!(age.check(&json!(42)).unwrap(), json!(42));
/// assert_eq!(age.check(&json!(200)).unwrap_err().to_string(), "value is greater than 150");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Int {
    bounds: Bounds<i64>,
    convert: bool,
}

impl Int {
    /// Creates an unbounded integer checker.
    pub fn new() -> Self {
        Self::default()
    }

    bound_builders!(i64);

    fn fail(&self, message: impl Into<String>, code: &str, value: &Value) -> DataError {
        DataError::new(message)
            .with_code(code)
            .with_value(value.clone())
            .with_checker(self.describe())
    }

    fn to_integer(&self, value: &Value) -> Result<i64, DataError> {
        match value {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(i)
                } else if n.is_u64() {
                    // Above i64::MAX; the f64 path would saturate it.
                    Err(self.fail("value is not int", codes::IS_NOT_INT, value))
                } else {
                    // i64::MAX as f64 rounds up to 2^63, so the upper bound is strict.
                    match n.as_f64() {
                        Some(f) if f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 => {
                            Ok(f as i64)
                        }
                        _ => Err(self.fail("value is not int", codes::IS_NOT_INT, value)),
                    }
                }
            }
            Value::String(s) if self.convert => s
                .trim()
                .parse::<i64>()
                .map_err(|_| self.fail("value can't be converted to int", codes::IS_NOT_INT, value)),
            _ => Err(self.fail("value is not int", codes::IS_NOT_INT, value)),
        }
    }
}

impl Checker for Int {
    fn check_with_context(&self, value: &Value, _context: Option<&Value>) -> Result<Value, DataError> {
        let n = self.to_integer(value)?;
        if let Some((message, code)) = self.bounds.violation(n) {
            return Err(self.fail(message, code, value));
        }
        Ok(Value::from(n))
    }

    fn describe(&self) -> String {
        self.bounds.describe(if self.convert { "ToInt" } else { "Int" })
    }
}

/// Accepts any JSON number, returned as a float.
#[derive(Debug, Clone, Default)]
pub struct Float {
    bounds: Bounds<f64>,
    convert: bool,
}

impl Float {
    /// Creates an unbounded float checker.
    pub fn new() -> Self {
        Self::default()
    }

    bound_builders!(f64);

    fn fail(&self, message: impl Into<String>, code: &str, value: &Value) -> DataError {
        DataError::new(message)
            .with_code(code)
            .with_value(value.clone())
            .with_checker(self.describe())
    }

    fn to_float(&self, value: &Value) -> Result<f64, DataError> {
        match value {
            Value::Number(n) => n
                .as_f64()
                .ok_or_else(|| self.fail("value is not float", codes::WRONG_TYPE, value)),
            Value::String(s) if self.convert => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|f| f.is_finite())
                .ok_or_else(|| self.fail("value can't be converted to float", codes::IS_NOT_A_NUMBER, value)),
            _ => Err(self.fail("value is not float", codes::WRONG_TYPE, value)),
        }
    }
}

impl Checker for Float {
    fn check_with_context(&self, value: &Value, _context: Option<&Value>) -> Result<Value, DataError> {
        let f = self.to_float(value)?;
        if let Some((message, code)) = self.bounds.violation(f) {
            return Err(self.fail(message, code, value));
        }
        Number::from_f64(f)
            .map(Value::Number)
            .ok_or_else(|| self.fail("value is not float", codes::WRONG_TYPE, value))
    }

    fn describe(&self) -> String {
        self.bounds.describe(if self.convert { "ToFloat" } else { "Float" })
    }
}
