//! A named filename field bundling a codec with a tester.

use chrono::{Duration, NaiveDateTime};

use crate::codec::{Codec, JulianFormat, LabelSet, TimeCodec};
use crate::errors::{DecodeError, EncodeError};
use crate::tester::{Reference, Tester};
use crate::value::Value;

/// The atomic unit of structured-filename matching.
///
/// A field pairs the codec that reads/writes its substring with the tester
/// that compares decoded values against caller references; the constructors
/// guarantee the two always agree on the value type.
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    default: Option<Value>,
    description: String,
    codec: Codec,
    tester: Tester,
}

impl Field {
    fn new(name: impl Into<String>, codec: Codec, tester: Tester) -> Self {
        Self {
            name: name.into(),
            default: None,
            description: String::new(),
            codec,
            tester,
        }
    }

    /// Free-form string field.
    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, Codec::Str, Tester::Str)
    }

    /// Integer field.
    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, Codec::Int { width: 0 }, Tester::Int)
    }

    /// Integer field zero-padded to `width` digits on generation.
    pub fn integer_padded(name: impl Into<String>, width: usize) -> Self {
        Self::new(name, Codec::Int { width }, Tester::Int)
    }

    /// Float field.
    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, Codec::Float, Tester::Float)
    }

    /// Enumerated field over a fixed label vocabulary.
    pub fn label(name: impl Into<String>, labels: LabelSet) -> Self {
        Self::new(name, Codec::Label(labels.clone()), Tester::Label(labels))
    }

    /// Calendar datetime field.
    pub fn datetime(name: impl Into<String>, format: impl Into<String>) -> Self {
        Self::datetime_multi(name, [format.into()])
    }

    /// Calendar datetime field trying several formats in order.
    pub fn datetime_multi<I, S>(name: impl Into<String>, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(name, Codec::Time(TimeCodec::calendar(formats)), Tester::Time)
    }

    /// Period field written as a start/stop datetime pair.
    pub fn span(
        name: impl Into<String>,
        format: impl Into<String>,
        separator: impl Into<String>,
    ) -> Self {
        Self::new(
            name,
            Codec::Span {
                format: format.into(),
                separator: separator.into(),
            },
            Tester::Span,
        )
    }

    /// Period field written as a start datetime plus a fixed duration.
    pub fn date_delta(
        name: impl Into<String>,
        format: impl Into<String>,
        delta: Duration,
        include_stop: bool,
    ) -> Self {
        Self::new(
            name,
            Codec::DeltaSpan {
                base: TimeCodec::calendar([format.into()]),
                delta,
                include_stop,
            },
            Tester::Span,
        )
    }

    /// Datetime field written as a julian day count.
    pub fn julian(
        name: impl Into<String>,
        format: JulianFormat,
        reference: NaiveDateTime,
    ) -> Self {
        Self::new(name, Codec::Time(TimeCodec::julian(format, reference)), Tester::Time)
    }

    /// Period field written as a julian day count plus a fixed duration.
    pub fn julian_delta(
        name: impl Into<String>,
        format: JulianFormat,
        reference: NaiveDateTime,
        delta: Duration,
        include_stop: bool,
    ) -> Self {
        Self::new(
            name,
            Codec::DeltaSpan {
                base: TimeCodec::julian(format, reference),
                delta,
                include_stop,
            },
            Tester::Span,
        )
    }

    /// Value substituted when the field's capture group is absent.
    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    /// Custom description (if any) followed by the tester's sentence.
    pub fn description(&self) -> String {
        if self.description.is_empty() {
            self.tester.description()
        } else {
            format!("{} {}", self.description, self.tester.description())
        }
    }

    pub fn decode(&self, text: &str) -> Result<Value, DecodeError> {
        self.codec.decode(text)
    }

    pub fn encode(&self, value: &Value) -> Result<String, EncodeError> {
        self.codec.encode(value)
    }

    pub fn sanitize(&self, reference: Reference) -> Result<Reference, String> {
        self.tester.sanitize(reference)
    }

    pub fn test(&self, reference: &Reference, value: &Value) -> bool {
        self.tester.test(reference, value)
    }
}
