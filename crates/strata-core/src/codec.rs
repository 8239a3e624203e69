//! String⇄value codecs, one per semantic filename-field type.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::errors::{DecodeError, EncodeError};
use crate::time::{
    datetime_to_fractional_julian_day, datetime_to_julian_day, fractional_julian_day_to_datetime,
    julian_day_to_datetime, Period,
};
use crate::value::Value;

/// Case transformation applied around label decoding/encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseRule {
    Upper,
    Lower,
}

impl CaseRule {
    fn apply(self, text: &str) -> String {
        match self {
            CaseRule::Upper => text.to_uppercase(),
            CaseRule::Lower => text.to_lowercase(),
        }
    }
}

/// The label vocabulary of an enumerated field.
///
/// `decode_case` is applied to the input before looking up a label;
/// `encode_case` is applied to the label on the way out. Either can be
/// omitted when the filenames carry the labels verbatim.
#[derive(Debug, Clone)]
pub struct LabelSet {
    labels: Vec<String>,
    decode_case: Option<CaseRule>,
    encode_case: Option<CaseRule>,
}

impl LabelSet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            decode_case: None,
            encode_case: None,
        }
    }

    pub fn with_cases(mut self, decode: Option<CaseRule>, encode: Option<CaseRule>) -> Self {
        self.decode_case = decode;
        self.encode_case = encode;
        self
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Canonical label for the given text, honoring the decode case rule.
    pub fn canonicalize(&self, text: &str) -> Option<String> {
        let candidate = match self.decode_case {
            Some(rule) => rule.apply(text),
            None => text.to_string(),
        };
        self.labels.iter().find(|l| **l == candidate).cloned()
    }

    fn render(&self, label: &str) -> String {
        match self.encode_case {
            Some(rule) => rule.apply(label),
            None => label.to_string(),
        }
    }
}

/// How a julian-day field is written in a filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JulianFormat {
    /// `23831`
    Days,
    /// `23831_06`
    DaysHours,
    /// `23831.25`
    Fractional,
}

impl JulianFormat {
    fn name(self) -> &'static str {
        match self {
            JulianFormat::Days => "days",
            JulianFormat::DaysHours => "days_hours",
            JulianFormat::Fractional => "fractional",
        }
    }
}

/// Codec for a single datetime instant.
#[derive(Debug, Clone)]
pub enum TimeCodec {
    /// Calendar datetime; formats are tried in order.
    Calendar { formats: Vec<String> },
    /// Julian day count relative to a reference datetime.
    Julian {
        format: JulianFormat,
        reference: NaiveDateTime,
    },
}

impl TimeCodec {
    pub fn calendar<I, S>(formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TimeCodec::Calendar {
            formats: formats.into_iter().map(Into::into).collect(),
        }
    }

    pub fn julian(format: JulianFormat, reference: NaiveDateTime) -> Self {
        TimeCodec::Julian { format, reference }
    }

    pub(crate) fn decode_time(&self, text: &str) -> Result<NaiveDateTime, DecodeError> {
        match self {
            TimeCodec::Calendar { formats } => {
                for fmt in formats {
                    if let Some(ts) = parse_calendar(text, fmt) {
                        return Ok(ts);
                    }
                }
                Err(DecodeError::DateTime {
                    text: text.to_string(),
                    formats: formats.clone(),
                })
            }
            TimeCodec::Julian { format, reference } => {
                let bad = || DecodeError::Julian {
                    text: text.to_string(),
                    format: format.name().to_string(),
                };
                match format {
                    JulianFormat::DaysHours => {
                        let mut split = text.splitn(2, '_');
                        let days = split.next().and_then(|s| s.parse::<i64>().ok());
                        let hours = split.next().and_then(|s| s.parse::<i64>().ok());
                        match (days, hours) {
                            (Some(days), Some(hours)) => {
                                Ok(julian_day_to_datetime((days, hours, 0.0), *reference))
                            }
                            _ => Err(bad()),
                        }
                    }
                    JulianFormat::Days => text
                        .parse::<i64>()
                        .map(|days| julian_day_to_datetime((days, 0, 0.0), *reference))
                        .map_err(|_| bad()),
                    JulianFormat::Fractional => text
                        .parse::<f64>()
                        .map(|fractional| {
                            fractional_julian_day_to_datetime(fractional, *reference)
                        })
                        .map_err(|_| bad()),
                }
            }
        }
    }

    pub(crate) fn encode_time(&self, timestamp: NaiveDateTime) -> String {
        match self {
            TimeCodec::Calendar { formats } => {
                // The first format is the canonical one for generation.
                timestamp.format(&formats[0]).to_string()
            }
            TimeCodec::Julian { format, reference } => match format {
                JulianFormat::DaysHours => {
                    let (days, hours, _) = datetime_to_julian_day(timestamp, *reference);
                    format!("{days:0>5}_{hours:0>2}")
                }
                JulianFormat::Days => {
                    let (days, _, _) = datetime_to_julian_day(timestamp, *reference);
                    format!("{days:0>2}")
                }
                JulianFormat::Fractional => {
                    format!("{}", datetime_to_fractional_julian_day(timestamp, *reference))
                }
            },
        }
    }
}

/// Parse a calendar datetime, falling back to a bare date at midnight for
/// formats without time components.
fn parse_calendar(text: &str, fmt: &str) -> Option<NaiveDateTime> {
    if let Ok(ts) = NaiveDateTime::parse_from_str(text, fmt) {
        return Some(ts);
    }
    NaiveDate::parse_from_str(text, fmt)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// String⇄value conversion for one semantic filename-field type.
///
/// `decode` fails with a [`DecodeError`] when the text cannot be
/// interpreted under the configured format; `encode` is total for the
/// matching [`Value`] variant.
#[derive(Debug, Clone)]
pub enum Codec {
    Str,
    /// `width > 0` zero-pads the rendered integer.
    Int { width: usize },
    Float,
    Label(LabelSet),
    Time(TimeCodec),
    /// Start/stop datetime pair joined by a separator.
    Span { format: String, separator: String },
    /// A start instant plus a fixed duration.
    DeltaSpan {
        base: TimeCodec,
        delta: Duration,
        include_stop: bool,
    },
}

impl Codec {
    pub fn decode(&self, text: &str) -> Result<Value, DecodeError> {
        match self {
            Codec::Str => Ok(Value::Str(text.to_string())),
            Codec::Int { .. } => text
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| DecodeError::Integer {
                    text: text.to_string(),
                }),
            Codec::Float => text
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|_| DecodeError::Float {
                    text: text.to_string(),
                }),
            Codec::Label(labels) => labels
                .canonicalize(text)
                .map(Value::Label)
                .ok_or_else(|| DecodeError::Label {
                    text: text.to_string(),
                    labels: labels.labels.clone(),
                }),
            Codec::Time(codec) => codec.decode_time(text).map(Value::Time),
            Codec::Span { format, separator } => {
                let (start, stop) = split_span(text, format, separator)?;
                let formats = std::slice::from_ref(format);
                let decode_side = |side: &str| {
                    parse_calendar(side, format).ok_or_else(|| DecodeError::DateTime {
                        text: side.to_string(),
                        formats: formats.to_vec(),
                    })
                };
                Ok(Value::Span(Period::new(
                    decode_side(start)?,
                    decode_side(stop)?,
                )))
            }
            Codec::DeltaSpan {
                base,
                delta,
                include_stop,
            } => {
                let start = base.decode_time(text)?;
                Ok(Value::Span(Period {
                    start,
                    stop: start + *delta,
                    include_start: true,
                    include_stop: *include_stop,
                }))
            }
        }
    }

    pub fn encode(&self, value: &Value) -> Result<String, EncodeError> {
        let mismatch = |expected: &'static str| EncodeError {
            expected,
            got: value.kind(),
        };
        match (self, value) {
            (Codec::Str, Value::Str(s)) => Ok(s.clone()),
            (Codec::Str, _) => Err(mismatch("string")),
            (Codec::Int { width }, Value::Int(i)) => {
                let width = *width;
                Ok(format!("{i:0width$}"))
            }
            (Codec::Int { .. }, _) => Err(mismatch("integer")),
            (Codec::Float, Value::Float(x)) => Ok(format!("{x}")),
            (Codec::Float, Value::Int(i)) => Ok(format!("{i}")),
            (Codec::Float, _) => Err(mismatch("float")),
            (Codec::Label(labels), Value::Label(l) | Value::Str(l))
                if labels.labels.iter().any(|known| known == l) =>
            {
                Ok(labels.render(l))
            }
            (Codec::Label(_), _) => Err(mismatch("label")),
            (Codec::Time(codec), Value::Time(ts)) => Ok(codec.encode_time(*ts)),
            (Codec::Time(_), _) => Err(mismatch("datetime")),
            (Codec::Span { format, separator }, Value::Span(period)) => {
                let start = period.start.format(format).to_string();
                let stop = period.stop.format(format).to_string();
                Ok(format!("{start}{separator}{stop}"))
            }
            (Codec::Span { .. }, _) => Err(mismatch("span")),
            (Codec::DeltaSpan { base, .. }, Value::Span(period)) => {
                // The delta is configuration, only the start is written out.
                Ok(base.encode_time(period.start))
            }
            (Codec::DeltaSpan { .. }, _) => Err(mismatch("span")),
        }
    }
}

/// Split a span string into its start/stop sides.
///
/// When the separator also occurs inside the date format itself, the split
/// happens at the middle occurrence.
fn split_span<'t>(
    text: &'t str,
    format: &str,
    separator: &str,
) -> Result<(&'t str, &'t str), DecodeError> {
    let error = || DecodeError::SpanSeparator {
        text: text.to_string(),
        separator: separator.to_string(),
    };
    if format.contains(separator) {
        let positions: Vec<usize> = text.match_indices(separator).map(|(i, _)| i).collect();
        if positions.is_empty() {
            return Err(error());
        }
        let middle = positions[positions.len() / 2];
        Ok((&text[..middle], &text[middle + separator.len()..]))
    } else {
        let mut split = text.splitn(2, separator);
        match (split.next(), split.next()) {
            (Some(start), Some(stop)) if !start.is_empty() && !stop.is_empty() => {
                Ok((start, stop))
            }
            _ => Err(error()),
        }
    }
}
