//! Record filtering over sanitized references.

use rustc_hash::FxHashMap;

use crate::errors::FilterError;
use crate::field::Field;
use crate::tester::Reference;
use crate::value::Record;

/// References keyed by field name, as supplied by a caller.
pub type FieldRefs = FxHashMap<String, Reference>;

/// A predicate over records, bound to a subset of a convention's fields.
///
/// References are sanitized once at construction; unknown field names and
/// ill-typed references fail immediately so a query never runs against a
/// broken filter. Records are tested positionally — the fields are passed
/// in convention order, which is also the record order.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    entries: Vec<Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    index: usize,
    field: Field,
    reference: Reference,
}

impl RecordFilter {
    pub fn new(fields: &[Field], references: &FieldRefs) -> Result<Self, FilterError> {
        let mut unknown: Vec<String> = references
            .keys()
            .filter(|key| !fields.iter().any(|f| f.name() == key.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            unknown.sort();
            return Err(FilterError::UnknownKeys { keys: unknown });
        }

        let mut entries = Vec::with_capacity(references.len());
        for (index, field) in fields.iter().enumerate() {
            let Some(reference) = references.get(field.name()) else {
                continue;
            };
            let reference = field.sanitize(reference.clone()).map_err(|reason| {
                FilterError::InvalidReference {
                    field: field.name().to_string(),
                    reason,
                }
            })?;
            entries.push(Entry {
                index,
                field: field.clone(),
                reference,
            });
        }
        Ok(Self { entries })
    }

    /// True if the record passes every bound reference.
    pub fn test(&self, record: &Record) -> bool {
        self.entries.iter().all(|entry| {
            record
                .get(entry.index)
                .is_some_and(|value| entry.field.test(&entry.reference, value))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
