//! Canonicalization of the heterogeneous "allowed" encodings found in grant rows.
//!
//! Grant flags have been written over time as booleans, integers and strings
//! such as `"Yes"`, `"1"` or `"TRUE"`. [`TruthyValue`] models what can appear
//! and [`TruthyValue::to_bool`] folds it into a single answer.

use serde_json::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum TruthyValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl TruthyValue {
    /// Returns `true` only for `true`, numeric one, or a string that trims
    /// and lowercases to `yes`, `1` or `true`. Everything else is `false`.
    #[must_use]
    pub fn to_bool(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Int(n) => *n == 1,
            Self::Float(f) => (*f - 1.0).abs() < f64::EPSILON,
            Self::Text(s) => is_truthy_str(s),
            Self::Null => false,
        }
    }
}

/// Shorthand for `TruthyValue::from(value).to_bool()`.
#[must_use]
pub fn to_bool(value: impl Into<TruthyValue>) -> bool {
    value.into().to_bool()
}

/// String form of the canonicalizer, for columns stored as text.
#[must_use]
pub fn is_truthy_str(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "yes" | "1" | "true"
    )
}

impl From<bool> for TruthyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for TruthyValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for TruthyValue {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<f64> for TruthyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<&str> for TruthyValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for TruthyValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<TruthyValue>> From<Option<T>> for TruthyValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl From<&Value> for TruthyValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) => n
                .as_i64()
                .map(Self::Int)
                .or_else(|| n.as_f64().map(Self::Float))
                .unwrap_or(Self::Null),
            Value::String(s) => Self::Text(s.clone()),
            Value::Null | Value::Array(_) | Value::Object(_) => Self::Null,
        }
    }
}
