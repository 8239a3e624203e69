//! Reference normalization and comparison against decoded values.

use chrono::{NaiveDate, NaiveDateTime};

use crate::codec::LabelSet;
use crate::time::Period;
use crate::value::Value;

/// A caller-supplied filter value, loose or canonical.
///
/// Callers hand these in when building a record filter; [`Tester::sanitize`]
/// normalizes the loose forms (`TimeStr`, open-ended `TimeRange`,
/// uncanonicalized labels) once at construction so matching stays cheap.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    Str(String),
    StrList(Vec<String>),
    Int(i64),
    IntList(Vec<i64>),
    /// Half-open integer range `start <= value < stop`.
    IntRange { start: i64, stop: i64 },
    Float(f64),
    Time(NaiveDateTime),
    /// Datetime given as an ISO string (`2024-01-01`, `2024-01-01T06:30:00`).
    TimeStr(String),
    /// Datetime range with optional open ends.
    TimeRange {
        start: Option<NaiveDateTime>,
        stop: Option<NaiveDateTime>,
    },
    Span(Period),
}

impl Reference {
    pub fn time_str(text: impl Into<String>) -> Self {
        Reference::TimeStr(text.into())
    }

    pub fn str(text: impl Into<String>) -> Self {
        Reference::Str(text.into())
    }
}

/// Comparison semantics for one field type.
#[derive(Debug, Clone)]
pub enum Tester {
    Str,
    Int,
    Float,
    Label(LabelSet),
    Time,
    Span,
}

impl Tester {
    /// Normalize a loose reference into this tester's canonical form.
    ///
    /// Idempotent: sanitizing an already-sanitized reference returns it
    /// unchanged. An ill-typed reference is rejected with a human reason.
    pub fn sanitize(&self, reference: Reference) -> Result<Reference, String> {
        match self {
            Tester::Str => match reference {
                r @ Reference::Str(_) => Ok(r),
                other => Err(type_error("a string", &other)),
            },
            Tester::Int => match reference {
                r @ (Reference::Int(_) | Reference::IntList(_) | Reference::IntRange { .. }) => {
                    Ok(r)
                }
                other => Err(type_error("an integer, a list, or a range", &other)),
            },
            Tester::Float => match reference {
                r @ Reference::Float(_) => Ok(r),
                Reference::Int(i) => Ok(Reference::Float(i as f64)),
                other => Err(type_error("a float", &other)),
            },
            Tester::Label(labels) => match reference {
                Reference::Str(s) => labels
                    .canonicalize(&s)
                    .map(Reference::Str)
                    .ok_or_else(|| unknown_label(&s, labels)),
                Reference::StrList(list) => list
                    .into_iter()
                    .map(|s| {
                        labels
                            .canonicalize(&s)
                            .ok_or_else(|| unknown_label(&s, labels))
                    })
                    .collect::<Result<Vec<_>, _>>()
                    .map(Reference::StrList),
                other => Err(type_error("a label or a list of labels", &other)),
            },
            Tester::Time | Tester::Span => match reference {
                r @ (Reference::Time(_) | Reference::Span(_)) => Ok(r),
                Reference::TimeStr(s) => parse_iso(&s)
                    .map(Reference::Time)
                    .ok_or_else(|| format!("'{s}' is not an ISO date")),
                Reference::TimeRange { start, stop } => Ok(Reference::Span(Period::new(
                    start.unwrap_or(NaiveDateTime::MIN),
                    stop.unwrap_or(NaiveDateTime::MAX),
                ))),
                other => Err(type_error("a datetime or a period", &other)),
            },
        }
    }

    /// Compare a sanitized reference with a decoded value.
    pub fn test(&self, reference: &Reference, value: &Value) -> bool {
        match (self, reference, value) {
            (Tester::Str, Reference::Str(r), Value::Str(v)) => r == v,
            (Tester::Int, Reference::Int(r), Value::Int(v)) => r == v,
            (Tester::Int, Reference::IntList(list), Value::Int(v)) => list.contains(v),
            (Tester::Int, Reference::IntRange { start, stop }, Value::Int(v)) => {
                start <= v && v < stop
            }
            (Tester::Float, Reference::Float(r), Value::Float(v)) => r == v,
            (Tester::Label(_), Reference::Str(r), Value::Label(v)) => r == v,
            (Tester::Label(_), Reference::StrList(list), Value::Label(v)) => list.contains(v),
            (Tester::Time, Reference::Time(r), Value::Time(v)) => r == v,
            (Tester::Time, Reference::Span(period), Value::Time(v)) => period.contains(*v),
            (Tester::Span, Reference::Time(r), Value::Span(period)) => period.contains(*r),
            (Tester::Span, Reference::Span(r), Value::Span(period)) => period.intersects(r),
            _ => false,
        }
    }

    /// User-facing sentence describing the accepted references.
    pub fn description(&self) -> String {
        match self {
            Tester::Str => "As a string field, it can be filtered by giving a reference \
                string; the decoded value is kept only if equal to it."
                .to_string(),
            Tester::Int => "As an integer field, it can be filtered by an integer, a list \
                of integers, or a half-open range; the decoded value is kept only if it \
                equals the integer, belongs to the list, or falls inside the range."
                .to_string(),
            Tester::Float => "As a float field, it can be filtered by a reference float \
                value; the decoded value is kept only if equal to it."
                .to_string(),
            Tester::Label(labels) => format!(
                "As an enumerated field, it can be filtered by a label or a list of \
                 labels. Possible values are: {:?}",
                labels.labels()
            ),
            Tester::Time => "As a datetime field, it can be filtered by a datetime or a \
                period; the decoded value is kept if equal to the datetime or contained \
                in the period. References can be given as ISO strings or as a pair of \
                optional ISO strings for an open-ended range."
                .to_string(),
            Tester::Span => "As a period field, it can be filtered by a datetime or a \
                period; the decoded value is kept if it contains the datetime or \
                intersects the period. References can be given as ISO strings or as a \
                pair of optional ISO strings for an open-ended range."
                .to_string(),
        }
    }
}

fn type_error(expected: &str, got: &Reference) -> String {
    format!("expected {expected}, got {got:?}")
}

fn unknown_label(text: &str, labels: &LabelSet) -> String {
    format!("'{text}' does not name any of the labels {:?}", labels.labels())
}

/// Parse an ISO date or datetime string.
fn parse_iso(text: &str) -> Option<NaiveDateTime> {
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}
