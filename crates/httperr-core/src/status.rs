use serde_json::Value;

use crate::error::ConstructError;

/// Status code used when none is supplied or the supplied one is unusable
pub const DEFAULT_STATUS: u16 = 500;

/// A status code as received from loosely-typed input
///
/// Callers forwarding arguments generically may hand over a number, a
/// string or nothing at all. Construction rejects anything that is not an
/// integer; composition falls back to [`DEFAULT_STATUS`] instead.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatusArg(Option<Value>);

impl StatusArg {
    /// No status supplied
    pub const ABSENT: Self = Self(None);

    /// Whether a value was supplied at all
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        self.0.is_none()
    }

    /// Numeric value, if the argument is an integer in the `u16` range
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::float_cmp)]
    pub fn as_u16(&self) -> Option<u16> {
        let Some(Value::Number(number)) = &self.0 else {
            return None;
        };

        if let Some(n) = number.as_u64() {
            return u16::try_from(n).ok();
        }

        // Integer-valued floats such as `404.0` are accepted
        let n = number.as_f64()?;
        if n.fract() == 0.0 && (0.0..=f64::from(u16::MAX)).contains(&n) {
            return Some(n as u16);
        }

        None
    }

    /// Resolve for composition: numeric values win, anything else is 500
    #[must_use]
    pub fn resolve(&self) -> u16 {
        self.as_u16().unwrap_or(DEFAULT_STATUS)
    }

    /// Resolve for construction: absent is 500, non-numeric is an error
    ///
    /// # Errors
    ///
    /// Returns [`ConstructError::BadStatusCode`] when a value was supplied
    /// but is not an integer status code
    pub fn try_resolve(&self) -> Result<u16, ConstructError> {
        let Some(value) = &self.0 else {
            return Ok(DEFAULT_STATUS);
        };

        self.as_u16().ok_or_else(|| ConstructError::BadStatusCode {
            kind: value_kind(value),
            value: value.to_string(),
        })
    }
}

const fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

macro_rules! status_from_integer {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for StatusArg {
                fn from(value: $ty) -> Self {
                    Self(Some(Value::from(value)))
                }
            }
        )*
    };
}

status_from_integer!(u16, i32, u32, i64, u64);

impl From<http::StatusCode> for StatusArg {
    fn from(value: http::StatusCode) -> Self {
        Self::from(value.as_u16())
    }
}

impl From<Option<u16>> for StatusArg {
    fn from(value: Option<u16>) -> Self {
        value.map_or(Self::ABSENT, Self::from)
    }
}

impl From<&str> for StatusArg {
    fn from(value: &str) -> Self {
        Self(Some(Value::String(value.to_owned())))
    }
}

impl From<String> for StatusArg {
    fn from(value: String) -> Self {
        Self(Some(Value::String(value)))
    }
}

impl From<Value> for StatusArg {
    fn from(value: Value) -> Self {
        Self(Some(value))
    }
}
