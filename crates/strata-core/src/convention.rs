//! Naming convention: a capture pattern, its fields, and an optional
//! generation template.

use regex::{Captures, Regex};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::errors::ConventionError;
use crate::field::Field;
use crate::value::{Record, Value};

/// Field values keyed by field name, used for name generation.
pub type FieldValues = FxHashMap<String, Value>;

/// Parses and generates names following one naming level's convention.
///
/// The convention is expressed as both a capture pattern and a template so
/// it can drive parsing and generation; the template can be omitted for
/// parse-only conventions. Consistency between the pattern's named groups,
/// the field list, and the template placeholders is checked once at
/// construction, before any name is ever matched.
#[derive(Debug, Clone)]
pub struct Convention {
    pattern: Regex,
    fields: Vec<Field>,
    template: Option<Template>,
}

impl Convention {
    /// Parse-only convention.
    pub fn new(pattern: Regex, fields: Vec<Field>) -> Result<Self, ConventionError> {
        let convention = Self {
            pattern,
            fields,
            template: None,
        };
        convention.check_pattern()?;
        Ok(convention)
    }

    /// Convention that can also generate names from field values.
    pub fn with_template(
        pattern: Regex,
        fields: Vec<Field>,
        template: &str,
    ) -> Result<Self, ConventionError> {
        let template = Template::parse(template)?;
        let convention = Self {
            pattern,
            fields,
            template: Some(template),
        };
        convention.check_pattern()?;
        convention.check_template()?;
        Ok(convention)
    }

    /// Match a name against the capture pattern (search semantics).
    pub fn captures<'t>(&self, name: &'t str) -> Option<Captures<'t>> {
        self.pattern.captures(name)
    }

    /// Decode one record from a successful match.
    ///
    /// Each field decodes its capture group; an absent optional group
    /// substitutes the field's default (or [`Value::Missing`]).
    pub fn parse(&self, captures: &Captures<'_>) -> Result<Record, crate::errors::DecodeError> {
        self.fields
            .iter()
            .map(|field| match captures.name(field.name()) {
                Some(group) => field.decode(group.as_str()),
                None => Ok(field.default().cloned().unwrap_or(Value::Missing)),
            })
            .collect()
    }

    /// Match and decode in one step; any failure folds to `None`.
    pub fn parse_name(&self, name: &str) -> Option<Record> {
        let captures = self.captures(name)?;
        match self.parse(&captures) {
            Ok(record) => Some(record),
            Err(error) => {
                tracing::debug!(name, %error, "name matched but did not decode");
                None
            }
        }
    }

    /// Render a name from field values.
    ///
    /// Every placeholder is encoded through its field's codec, so composite
    /// values (periods, julian days) render exactly as they parse.
    pub fn generate(&self, values: &FieldValues) -> Result<String, ConventionError> {
        let template = self.template.as_ref().ok_or(ConventionError::NoTemplate)?;
        let mut out = String::new();
        for segment in &template.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(name) => {
                    let value =
                        values
                            .get(name)
                            .ok_or_else(|| ConventionError::MissingArgument {
                                field: name.clone(),
                            })?;
                    let field = self
                        .field(name)
                        .expect("template placeholders are checked against fields");
                    out.push_str(&field.encode(value).map_err(|source| {
                        ConventionError::Encode {
                            field: name.clone(),
                            source,
                        }
                    })?);
                }
            }
        }
        Ok(out)
    }

    /// Retrieve a field by name.
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(Field::name)
    }

    fn check_pattern(&self) -> Result<(), ConventionError> {
        let mut field_names = FxHashSet::default();
        for field in &self.fields {
            if !field_names.insert(field.name()) {
                return Err(ConventionError::DuplicateField {
                    name: field.name().to_string(),
                });
            }
        }
        let group_names: FxHashSet<&str> =
            self.pattern.capture_names().flatten().collect();

        let missing_groups = sorted_difference(&field_names, &group_names);
        if !missing_groups.is_empty() {
            return Err(ConventionError::PatternMissingGroups {
                names: missing_groups,
            });
        }
        let missing_fields = sorted_difference(&group_names, &field_names);
        if !missing_fields.is_empty() {
            return Err(ConventionError::MissingFields {
                names: missing_fields,
            });
        }
        Ok(())
    }

    fn check_template(&self) -> Result<(), ConventionError> {
        let template = self.template.as_ref().expect("called with a template");
        let placeholders: FxHashSet<&str> = template
            .segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Field(name) => Some(name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect();
        let field_names: FxHashSet<&str> = self.field_names().collect();

        let missing = sorted_difference(&field_names, &placeholders);
        if !missing.is_empty() {
            return Err(ConventionError::TemplateMissingFields { names: missing });
        }
        let unknown = sorted_difference(&placeholders, &field_names);
        if !unknown.is_empty() {
            return Err(ConventionError::TemplateUnknownFields { names: unknown });
        }
        Ok(())
    }
}

fn sorted_difference(left: &FxHashSet<&str>, right: &FxHashSet<&str>) -> Vec<String> {
    let mut names: Vec<String> = left.difference(right).map(|s| s.to_string()).collect();
    names.sort();
    names
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Field(String),
}

/// Generation template: literal text interleaved with `{field}`
/// placeholders; `{{` and `}}` escape literal braces.
#[derive(Debug, Clone)]
struct Template {
    segments: Vec<Segment>,
}

impl Template {
    fn parse(text: &str) -> Result<Self, ConventionError> {
        let unbalanced = || ConventionError::UnbalancedTemplate {
            template: text.to_string(),
        };
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '{' if chars.peek() == Some(&'{') => {
                    chars.next();
                    literal.push('{');
                }
                '}' if chars.peek() == Some(&'}') => {
                    chars.next();
                    literal.push('}');
                }
                '{' => {
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('}') => break,
                            Some(c) => name.push(c),
                            None => return Err(unbalanced()),
                        }
                    }
                    segments.push(Segment::Field(name));
                }
                '}' => return Err(unbalanced()),
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }
        Ok(Self { segments })
    }
}
