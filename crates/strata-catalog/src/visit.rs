//! Visit strategies driving the tree walk.
//!
//! A visitor interprets one node and hands the walk a [`VisitResult`]:
//! whether to keep exploring the branch, an optional payload, and — for
//! layout-aware visits — the set of layouts still valid below the node.
//! `advance` produces the visitor used for each child, which is what gives
//! every branch its own independently pruned view.

use std::sync::Arc;

use strata_core::{Convention, Record, RecordFilter, Value};

use crate::errors::CatalogError;
use crate::layout::LayoutQuery;
use crate::node::{DirNode, FileNode};
use crate::storage::Metadata;

/// Per-node outcome of a visit.
#[derive(Debug, Clone)]
pub struct VisitResult<P> {
    /// True if the branch below this node should still be explored.
    pub explore_next: bool,
    /// Post-processing result of the node, if any.
    pub payload: Option<P>,
    /// Layout queries still valid for the branch below this node.
    pub surviving: Vec<Arc<LayoutQuery>>,
}

impl<P> VisitResult<P> {
    /// Stop exploring, no payload.
    pub fn stop() -> Self {
        Self {
            explore_next: false,
            payload: None,
            surviving: Vec::new(),
        }
    }

    /// Keep exploring with the given surviving layout queries.
    pub fn explore(surviving: Vec<Arc<LayoutQuery>>) -> Self {
        Self {
            explore_next: true,
            payload: None,
            surviving,
        }
    }

    /// Stop exploring and emit a payload.
    pub fn leaf(payload: P) -> Self {
        Self {
            explore_next: false,
            payload: Some(payload),
            surviving: Vec::new(),
        }
    }
}

/// What to do with a node that matches no surviving layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MismatchPolicy {
    /// Silently stop exploring the branch.
    Ignore,
    /// Emit a diagnostic and stop exploring the branch.
    Warn,
    /// Abort the walk with [`CatalogError::LayoutMismatch`].
    Raise,
}

/// A visit strategy over directory and file nodes.
pub trait Visitor: Sized {
    type Payload;

    fn visit_dir(&self, node: &DirNode) -> Result<VisitResult<Self::Payload>, CatalogError>;

    fn visit_file(&self, node: &FileNode) -> Result<VisitResult<Self::Payload>, CatalogError>;

    /// Visitor to use for the children of the node that produced `result`.
    fn advance(&self, result: &VisitResult<Self::Payload>) -> Self;
}

/// One directory's listing, as produced by [`StandardVisitor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing {
    pub path: String,
    pub dirs: Vec<String>,
    pub files: Vec<String>,
}

/// Reproduces a plain recursive listing, one payload per directory.
#[derive(Debug, Clone, Default)]
pub struct StandardVisitor;

impl Visitor for StandardVisitor {
    type Payload = Listing;

    fn visit_dir(&self, node: &DirNode) -> Result<VisitResult<Listing>, CatalogError> {
        let mut dirs = Vec::new();
        let mut files = Vec::new();
        for child in node.children() {
            match &**child {
                crate::node::Node::Dir(dir) => dirs.push(dir.name.clone()),
                crate::node::Node::File(file) => files.push(file.name.clone()),
            }
        }
        Ok(VisitResult {
            explore_next: true,
            payload: Some(Listing {
                path: node.path.clone(),
                dirs,
                files,
            }),
            surviving: Vec::new(),
        })
    }

    fn visit_file(&self, _node: &FileNode) -> Result<VisitResult<Listing>, CatalogError> {
        Ok(VisitResult::stop())
    }

    fn advance(&self, _result: &VisitResult<Listing>) -> Self {
        // Stateless: advance without copy or state alteration.
        self.clone()
    }
}

/// Layout-aware visitor pruning branches that cannot satisfy the query.
#[derive(Debug, Clone)]
pub struct LayoutVisitor {
    queries: Vec<Arc<LayoutQuery>>,
    stat_fields: Vec<String>,
    on_mismatch_dir: MismatchPolicy,
    on_mismatch_file: MismatchPolicy,
}

impl LayoutVisitor {
    pub fn new(queries: Vec<Arc<LayoutQuery>>) -> Self {
        Self {
            queries,
            stat_fields: Vec::new(),
            on_mismatch_dir: MismatchPolicy::Raise,
            on_mismatch_file: MismatchPolicy::Ignore,
        }
    }

    /// Metadata fields appended to every payload record.
    pub fn with_stat_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stat_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn on_mismatch_dir(mut self, policy: MismatchPolicy) -> Self {
        self.on_mismatch_dir = policy;
        self
    }

    pub fn on_mismatch_file(mut self, policy: MismatchPolicy) -> Self {
        self.on_mismatch_file = policy;
        self
    }

    pub fn queries(&self) -> &[Arc<LayoutQuery>] {
        &self.queries
    }

    fn on_mismatch(
        &self,
        path: &str,
        policy: MismatchPolicy,
    ) -> Result<VisitResult<Record>, CatalogError> {
        match policy {
            MismatchPolicy::Ignore => {
                tracing::debug!(path, "outlier node, branch exploration stopped");
                Ok(VisitResult::stop())
            }
            MismatchPolicy::Warn => {
                tracing::warn!(path, "node does not match any layout");
                Ok(VisitResult::stop())
            }
            MismatchPolicy::Raise => Err(CatalogError::LayoutMismatch {
                path: path.to_string(),
            }),
        }
    }
}

impl Visitor for LayoutVisitor {
    type Payload = Record;

    /// The node name is parsed at the directory's layout level. Queries
    /// that fail to parse it are pruned for this branch; if none is left,
    /// the node is an outlier handled by the directory mismatch policy.
    /// If every surviving query filters the node out, the branch holds
    /// nothing of interest and exploration stops silently.
    fn visit_dir(&self, node: &DirNode) -> Result<VisitResult<Record>, CatalogError> {
        tracing::debug!(path = %node.path, "visiting directory");
        if node.depth == 0 {
            // No parsing nor filtering for the root node.
            return Ok(VisitResult::explore(self.queries.clone()));
        }

        let level = node.depth - 1;
        let mut surviving = Vec::new();
        let mut any_selected = false;
        for query in &self.queries {
            // Every query is probed so non-matching ones are pruned as
            // early as possible in the branch.
            if let Some(record) = query.parse_node(level, &node.name) {
                any_selected |= query.test_record(level, &record);
                surviving.push(Arc::clone(query));
            }
        }

        if surviving.is_empty() {
            return self.on_mismatch(&node.path, self.on_mismatch_dir);
        }
        if !any_selected {
            tracing::debug!(path = %node.path, "directory filtered out, branch exploration stopped");
            return Ok(VisitResult::stop());
        }
        Ok(VisitResult::explore(surviving))
    }

    /// The first query whose parsed record passes its filter contributes
    /// the payload. A record that parses but fails the filter settles the
    /// file immediately: leaf conventions agree across layouts, so probing
    /// the rest would not change the outcome.
    fn visit_file(&self, node: &FileNode) -> Result<VisitResult<Record>, CatalogError> {
        tracing::debug!(path = %node.path, "visiting file");
        let level = node.depth.saturating_sub(1);
        for query in &self.queries {
            match query.parse_node(level, &node.name) {
                Some(record) if query.test_record(level, &record) => {
                    let mut payload = record;
                    payload.push(Value::Str(node.path.clone()));
                    payload.extend(stat_values(&node.meta, &self.stat_fields, &node.path)?);
                    return Ok(VisitResult::leaf(payload));
                }
                Some(_) => return Ok(VisitResult::stop()),
                None => {}
            }
        }
        self.on_mismatch(&node.path, self.on_mismatch_file)
    }

    fn advance(&self, result: &VisitResult<Record>) -> Self {
        Self {
            queries: result.surviving.clone(),
            stat_fields: self.stat_fields.clone(),
            on_mismatch_dir: self.on_mismatch_dir,
            on_mismatch_file: self.on_mismatch_file,
        }
    }
}

/// Single-convention visitor without any hierarchical pruning.
///
/// Every directory is explored unconditionally; only files are
/// interpreted, and names the convention does not recognize are expected
/// and silently skipped.
#[derive(Debug, Clone)]
pub struct NoLayoutVisitor {
    convention: Convention,
    filter: RecordFilter,
    stat_fields: Vec<String>,
}

impl NoLayoutVisitor {
    pub fn new(convention: Convention, filter: RecordFilter) -> Self {
        Self {
            convention,
            filter,
            stat_fields: Vec::new(),
        }
    }

    /// Metadata fields appended to every payload record.
    pub fn with_stat_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stat_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

impl Visitor for NoLayoutVisitor {
    type Payload = Record;

    fn visit_dir(&self, _node: &DirNode) -> Result<VisitResult<Record>, CatalogError> {
        Ok(VisitResult::explore(Vec::new()))
    }

    fn visit_file(&self, node: &FileNode) -> Result<VisitResult<Record>, CatalogError> {
        tracing::debug!(path = %node.path, "visiting file");
        let Some(record) = self.convention.parse_name(&node.name) else {
            return Ok(VisitResult::stop());
        };
        if !self.filter.test(&record) {
            return Ok(VisitResult::stop());
        }
        let mut payload = record;
        payload.push(Value::Str(node.path.clone()));
        payload.extend(stat_values(&node.meta, &self.stat_fields, &node.path)?);
        Ok(VisitResult::leaf(payload))
    }

    fn advance(&self, _result: &VisitResult<Record>) -> Self {
        self.clone()
    }
}

/// Look up the requested metadata fields for a payload row.
fn stat_values(
    meta: &Metadata,
    stat_fields: &[String],
    path: &str,
) -> Result<Vec<Value>, CatalogError> {
    stat_fields
        .iter()
        .map(|field| {
            meta.get(field)
                .cloned()
                .ok_or_else(|| CatalogError::MissingMetadata {
                    field: field.clone(),
                    path: path.to_string(),
                })
        })
        .collect()
}
