//! Multi-level tree semantics: one convention per directory depth.

use rustc_hash::FxHashSet;
use strata_core::{Convention, ConventionError, FieldRefs, FieldValues, FilterError, Record,
    RecordFilter};

/// Immutable description of a homogeneous tree's per-level conventions.
///
/// The first convention matches the nodes directly under the root, the last
/// one the leaves. A layout carries no filter state: binding references
/// produces a [`LayoutQuery`], so a layout can be shared freely between
/// concurrent queries.
#[derive(Debug, Clone)]
pub struct Layout {
    conventions: Vec<Convention>,
}

impl Layout {
    pub fn new(conventions: Vec<Convention>) -> Self {
        Self { conventions }
    }

    /// Render one path segment per level and join them under `root`.
    pub fn generate(&self, root: &str, values: &FieldValues) -> Result<String, ConventionError> {
        let mut path = root.trim_end_matches('/').to_string();
        for convention in &self.conventions {
            // Each level only consumes the values its own fields declare.
            let level_values: FieldValues = convention
                .field_names()
                .filter_map(|name| values.get(name).map(|v| (name.to_string(), v.clone())))
                .collect();
            path.push('/');
            path.push_str(&convention.generate(&level_values)?);
        }
        Ok(path)
    }

    /// Union of the field names across all levels.
    pub fn names(&self) -> FxHashSet<String> {
        self.conventions
            .iter()
            .flat_map(|c| c.field_names().map(str::to_string))
            .collect()
    }

    /// Number of levels.
    pub fn depth(&self) -> usize {
        self.conventions.len()
    }

    pub fn conventions(&self) -> &[Convention] {
        &self.conventions
    }

    /// Bind references into a query against this layout.
    ///
    /// References are partitioned by the level that declares them, building
    /// one record filter per level. References no level declares are
    /// ignored with a diagnostic; ill-typed references fail.
    pub fn query(&self, references: &FieldRefs) -> Result<LayoutQuery, FilterError> {
        let mut unknown: FxHashSet<&str> = references.keys().map(String::as_str).collect();
        let mut filters = Vec::with_capacity(self.conventions.len());
        for (level, convention) in self.conventions.iter().enumerate() {
            let level_refs: FieldRefs = convention
                .field_names()
                .filter_map(|name| {
                    references.get(name).map(|reference| {
                        unknown.remove(name);
                        (name.to_string(), reference.clone())
                    })
                })
                .collect();
            tracing::debug!(level, keys = ?level_refs.keys().collect::<Vec<_>>(),
                "binding layout level filters");
            filters.push(RecordFilter::new(convention.fields(), &level_refs)?);
        }

        if !unknown.is_empty() {
            tracing::warn!(
                references = ?unknown,
                "layout query received references no level declares, ignoring them"
            );
        }

        Ok(LayoutQuery {
            conventions: self.conventions.clone(),
            filters,
        })
    }
}

/// Outcome of testing one node name at one level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LevelTest {
    Pass,
    Filtered,
    NoParse,
    OutOfRange,
}

/// A layout bound to one logical query's filters.
///
/// Cheap to clone; the walk shares it across branches behind an `Arc`.
#[derive(Debug, Clone)]
pub struct LayoutQuery {
    conventions: Vec<Convention>,
    filters: Vec<RecordFilter>,
}

impl LayoutQuery {
    /// Interpret a node name at the given layout level.
    ///
    /// The layout level of a node is its tree depth minus one: the root
    /// itself carries no semantics. Returns `None` when the level is out of
    /// range, the name does not match, or a group does not decode.
    pub fn parse_node(&self, level: usize, name: &str) -> Option<Record> {
        self.conventions.get(level)?.parse_name(name)
    }

    /// Apply the stored filter at the given level to a parsed record.
    pub fn test_record(&self, level: usize, record: &Record) -> bool {
        self.filters
            .get(level)
            .is_some_and(|filter| filter.test(record))
    }

    /// Parse and filter a node name in one step.
    ///
    /// A name that does not parse at an in-range level is reported as
    /// non-matching with a diagnostic: it usually means the tree drifted
    /// from its declared layout.
    pub fn test(&self, level: usize, name: &str) -> bool {
        match self.level_test(level, name) {
            LevelTest::Pass => true,
            LevelTest::NoParse => {
                tracing::warn!(level, name, "node does not parse under the layout convention");
                false
            }
            LevelTest::Filtered | LevelTest::OutOfRange => false,
        }
    }

    pub(crate) fn level_test(&self, level: usize, name: &str) -> LevelTest {
        if level >= self.conventions.len() {
            return LevelTest::OutOfRange;
        }
        match self.parse_node(level, name) {
            None => LevelTest::NoParse,
            Some(record) if self.test_record(level, &record) => LevelTest::Pass,
            Some(_) => LevelTest::Filtered,
        }
    }

    /// Union of the field names across all levels.
    pub fn names(&self) -> FxHashSet<String> {
        self.conventions
            .iter()
            .flat_map(|c| c.field_names().map(str::to_string))
            .collect()
    }

    pub fn depth(&self) -> usize {
        self.conventions.len()
    }

    pub fn conventions(&self) -> &[Convention] {
        &self.conventions
    }

    pub(crate) fn filter(&self, level: usize) -> Option<&RecordFilter> {
        self.filters.get(level)
    }
}
