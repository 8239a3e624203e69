//! Error types for the structured-filename engine.
//!
//! Decoding failures are recoverable (a candidate name is simply excluded);
//! construction-time inconsistencies are not and surface immediately.

/// A filename substring does not conform to its codec's configured format.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("'{text}' could not be converted to an integer")]
    Integer { text: String },

    #[error("'{text}' could not be converted to a float")]
    Float { text: String },

    #[error("'{text}' does not name any of the labels {labels:?}")]
    Label { text: String, labels: Vec<String> },

    #[error("'{text}' could not be converted to a datetime using formats {formats:?}")]
    DateTime { text: String, formats: Vec<String> },

    #[error("'{text}' could not be split into start/stop dates with separator '{separator}'")]
    SpanSeparator { text: String, separator: String },

    #[error("'{text}' is not a julian day matching format '{format}'")]
    Julian { text: String, format: String },
}

/// A value of the wrong variant was handed to a codec's `encode`.
#[derive(Debug, thiserror::Error)]
#[error("cannot encode a {got} value, expected {expected}")]
pub struct EncodeError {
    pub expected: &'static str,
    pub got: &'static str,
}

/// A convention's pattern, field list, and generation template are
/// mutually inconsistent, or a generation call cannot be satisfied.
#[derive(Debug, thiserror::Error)]
pub enum ConventionError {
    #[error("capture pattern misses groups for fields: {names:?}")]
    PatternMissingGroups { names: Vec<String> },

    #[error("missing field definitions for capture groups: {names:?}")]
    MissingFields { names: Vec<String> },

    #[error("duplicate field name '{name}'")]
    DuplicateField { name: String },

    #[error("generation template misses the fields: {names:?}")]
    TemplateMissingFields { names: Vec<String> },

    #[error("fields referenced by the generation template but not declared: {names:?}")]
    TemplateUnknownFields { names: Vec<String> },

    #[error("unbalanced braces in generation template '{template}'")]
    UnbalancedTemplate { template: String },

    #[error("convention is configured for parsing only, no generation template was given")]
    NoTemplate,

    #[error("missing argument '{field}' to generate a name")]
    MissingArgument { field: String },

    #[error("cannot encode field '{field}': {source}")]
    Encode {
        field: String,
        #[source]
        source: EncodeError,
    },
}

/// A record filter was built against references a convention cannot honor.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("tried to build a filter using unknown field names: {keys:?}")]
    UnknownKeys { keys: Vec<String> },

    #[error("invalid reference for field '{field}': {reason}")]
    InvalidReference { field: String, reason: String },
}
