//! Decoded value model.

use chrono::NaiveDateTime;
use serde::Serialize;
use smallvec::SmallVec;

use crate::time::Period;

/// One decoded filename field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Optional capture group absent and no default configured.
    Missing,
    Str(String),
    Int(i64),
    Float(f64),
    /// Canonical label of an enumerated field.
    Label(String),
    Time(NaiveDateTime),
    Span(Period),
}

/// An ordered tuple of decoded values, one per field, in field order.
///
/// A record's positional index is the sole correlation with its field; no
/// name lookup happens at match time.
pub type Record = SmallVec<[Value; 8]>;

impl Value {
    /// Variant name, used in encode type-mismatch diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Missing => "missing",
            Value::Str(_) => "string",
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Label(_) => "label",
            Value::Time(_) => "datetime",
            Value::Span(_) => "span",
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Missing => write!(f, ""),
            Value::Str(s) => write!(f, "{s}"),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Label(l) => write!(f, "{l}"),
            Value::Time(t) => write!(f, "{t}"),
            Value::Span(p) => write!(f, "{p}"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(t: NaiveDateTime) -> Self {
        Value::Time(t)
    }
}

impl From<Period> for Value {
    fn from(p: Period) -> Self {
        Value::Span(p)
    }
}
