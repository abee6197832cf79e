use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A debug value attached to an [`HttpError`](crate::HttpError)
///
/// Params are loosely typed on purpose: anything serializable can be
/// attached, and the rendering used in display names is stable across
/// value kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Param(Value);

impl Param {
    /// Wrap an arbitrary JSON value
    #[must_use]
    pub const fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrow the underlying value
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// String content, if this param holds a string
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }

    /// Consume the param and return the underlying value
    #[must_use]
    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Strings render unquoted and `null` renders empty; everything else is
/// compact JSON
impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            Value::Null => Ok(()),
            other => write!(f, "{other}"),
        }
    }
}

impl From<Value> for Param {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_owned()))
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Self(Value::String(value))
    }
}

impl From<&String> for Param {
    fn from(value: &String) -> Self {
        Self(Value::String(value.clone()))
    }
}

impl From<bool> for Param {
    fn from(value: bool) -> Self {
        Self(Value::Bool(value))
    }
}

macro_rules! param_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Param {
                fn from(value: $ty) -> Self {
                    Self(Value::from(value))
                }
            }
        )*
    };
}

param_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

/// Join params the way display names list them
pub(crate) fn join(params: &[Param]) -> String {
    params.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
}
