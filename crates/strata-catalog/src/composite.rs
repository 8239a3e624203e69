//! Heterogeneous tree shapes: several layouts tried in order.
//!
//! A product whose directory structure gained an extra level in a later
//! version needs both shapes described at once. The composite tries its
//! children in order for generation and accepts a node as soon as any child
//! does.

use rustc_hash::FxHashSet;
use strata_core::{FieldRefs, FieldValues, FilterError};

use crate::errors::CatalogError;
use crate::layout::{Layout, LayoutQuery, LevelTest};

#[derive(Debug, Clone)]
pub struct CompositeLayout {
    layouts: Vec<Layout>,
}

impl CompositeLayout {
    /// Order matters: the first layout that can generate a path wins.
    pub fn new(layouts: Vec<Layout>) -> Self {
        Self { layouts }
    }

    pub fn layouts(&self) -> &[Layout] {
        &self.layouts
    }

    /// Union of the field names across all child layouts.
    pub fn names(&self) -> FxHashSet<String> {
        self.layouts
            .iter()
            .flat_map(|layout| layout.names())
            .collect()
    }

    /// Render a path with the first child layout that succeeds.
    pub fn generate(&self, root: &str, values: &FieldValues) -> Result<String, CatalogError> {
        for (index, layout) in self.layouts.iter().enumerate() {
            match layout.generate(root, values) {
                Ok(path) => {
                    tracing::debug!(layout = index, "path generation succeeded");
                    return Ok(path);
                }
                Err(error) => {
                    tracing::debug!(layout = index, %error, "path generation failed, trying next");
                }
            }
        }
        Err(CatalogError::NoLayoutGenerates)
    }

    /// Bind references into a query against every child layout.
    ///
    /// Each child only receives the references it declares, so a reference
    /// understood by any child never warns; references unknown to all of
    /// them are dropped with a diagnostic.
    pub fn query(&self, references: &FieldRefs) -> Result<CompositeQuery, FilterError> {
        let known = self.names();
        let unknown: Vec<&String> = references
            .keys()
            .filter(|key| !known.contains(*key))
            .collect();
        if !unknown.is_empty() {
            tracing::warn!(
                references = ?unknown,
                "composite layout received references no child declares, ignoring them"
            );
        }

        let queries = self
            .layouts
            .iter()
            .map(|layout| {
                let names = layout.names();
                let child_refs: FieldRefs = references
                    .iter()
                    .filter(|(key, _)| names.contains(key.as_str()))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect();
                layout.query(&child_refs)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CompositeQuery { queries })
    }
}

/// A composite layout bound to one logical query's filters.
#[derive(Debug, Clone)]
pub struct CompositeQuery {
    queries: Vec<LayoutQuery>,
}

impl CompositeQuery {
    /// True if any child layout accepts the node.
    ///
    /// A consensus diagnostic is emitted only when every child fails to
    /// parse the node at an in-range level; children whose depth the level
    /// exceeds simply do not apply to this branch and stay silent.
    pub fn test(&self, level: usize, name: &str) -> bool {
        let mut no_parse = 0;
        for query in &self.queries {
            match query.level_test(level, name) {
                LevelTest::Pass => return true,
                LevelTest::NoParse => no_parse += 1,
                LevelTest::Filtered | LevelTest::OutOfRange => {}
            }
        }
        if no_parse == self.queries.len() {
            tracing::warn!(
                level,
                name,
                "node does not parse under any layout, the tree may have drifted \
                 from its declared structure"
            );
        }
        false
    }

    pub fn queries(&self) -> &[LayoutQuery] {
        &self.queries
    }
}
