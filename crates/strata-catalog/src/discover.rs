//! File discovery and metadata collection into tabular results.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use strata_core::{Convention, FieldRefs, Record, RecordFilter};

use crate::errors::CatalogError;
use crate::layout::{Layout, LayoutQuery};
use crate::node::{DirNode, FileNode, Node};
use crate::table::Table;
use crate::visit::{LayoutVisitor, NoLayoutVisitor, VisitResult, Visitor};
use crate::storage::Storage;
use crate::walk::walk;

/// Record predicate for criteria a convention cannot encode (for example a
/// geographic footprint looked up in auxiliary data). Receives the full
/// row: decoded fields, then the leaf path, then any stat fields.
pub type Predicate = Box<dyn Fn(&Record) -> bool>;

/// Options of one listing request.
#[derive(Default)]
pub struct ListRequest {
    /// References over the fields declared by the convention and layout.
    pub filters: FieldRefs,
    /// Extra record predicates applied after filtering.
    pub predicates: Vec<Predicate>,
    /// Storage metadata fields appended to every row.
    pub stat_fields: Vec<String>,
}

impl ListRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(
        mut self,
        name: impl Into<String>,
        reference: strata_core::Reference,
    ) -> Self {
        self.filters.insert(name.into(), reference);
        self
    }

    pub fn with_predicate(mut self, predicate: impl Fn(&Record) -> bool + 'static) -> Self {
        self.predicates.push(Box::new(predicate));
        self
    }

    pub fn with_stat_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stat_fields = fields.into_iter().map(Into::into).collect();
        self
    }
}

/// Discovers the files below a path that match a leaf convention.
///
/// An optional layout prunes directories during the walk; without one the
/// whole tree is scanned and only leaves are interpreted.
pub struct FileDiscoverer {
    convention: Convention,
    layout: Option<Layout>,
    storage: Arc<dyn Storage>,
}

impl FileDiscoverer {
    pub fn new(convention: Convention, storage: Arc<dyn Storage>) -> Self {
        Self {
            convention,
            layout: None,
            storage,
        }
    }

    /// Prune directories with the given layout during listing.
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.layout = Some(layout);
        self
    }

    /// List the matching files as a table of decoded fields, `filename`,
    /// and the requested stat fields.
    pub fn list(&self, path: &str, request: &ListRequest) -> Result<Table, CatalogError> {
        let convention_names: FxHashSet<&str> = self.convention.field_names().collect();
        let layout_names = self.layout.as_ref().map(Layout::names).unwrap_or_default();

        let mut file_refs = FieldRefs::default();
        let mut layout_refs = FieldRefs::default();
        let mut unknown: Vec<&str> = Vec::new();
        for (name, reference) in &request.filters {
            let mut recognized = false;
            if convention_names.contains(name.as_str()) {
                file_refs.insert(name.clone(), reference.clone());
                recognized = true;
            }
            if layout_names.contains(name) {
                layout_refs.insert(name.clone(), reference.clone());
                recognized = true;
            }
            if !recognized {
                unknown.push(name.as_str());
            }
        }
        if !unknown.is_empty() {
            unknown.sort();
            tracing::warn!(
                filters = ?unknown,
                "filters match neither the convention nor the layout, ignoring them"
            );
        }

        let record_filter = RecordFilter::new(self.convention.fields(), &file_refs)?;
        let visitor = LeafVisitor {
            pruning: self
                .layout
                .as_ref()
                .map(|layout| layout.query(&layout_refs))
                .transpose()?
                .map(Arc::new),
            leaf: NoLayoutVisitor::new(self.convention.clone(), record_filter)
                .with_stat_fields(request.stat_fields.clone()),
        };

        let root = Arc::new(Node::Dir(DirNode::root(path, Arc::clone(&self.storage))));
        let mut rows = Vec::new();
        for row in walk(root, visitor) {
            let row = row?;
            if request.predicates.iter().all(|predicate| predicate(&row)) {
                rows.push(row);
            }
        }

        let mut table = Table::new(result_columns(&self.convention, &request.stat_fields));
        for row in rows {
            table.push_row(row);
        }
        Ok(table)
    }
}

/// Internal visitor of [`FileDiscoverer`]: layout-pruned directories,
/// single-convention leaves.
#[derive(Clone)]
struct LeafVisitor {
    pruning: Option<Arc<LayoutQuery>>,
    leaf: NoLayoutVisitor,
}

impl Visitor for LeafVisitor {
    type Payload = Record;

    fn visit_dir(&self, node: &DirNode) -> Result<VisitResult<Record>, CatalogError> {
        if node.depth == 0 {
            return Ok(VisitResult::explore(Vec::new()));
        }
        if let Some(query) = &self.pruning {
            if !query.test(node.depth - 1, &node.name) {
                tracing::debug!(path = %node.path, "directory pruned");
                return Ok(VisitResult::stop());
            }
        }
        Ok(VisitResult::explore(Vec::new()))
    }

    fn visit_file(&self, node: &FileNode) -> Result<VisitResult<Record>, CatalogError> {
        self.leaf.visit_file(node)
    }

    fn advance(&self, _result: &VisitResult<Record>) -> Self {
        self.clone()
    }
}

/// Multi-level analogue of [`FileDiscoverer`] built on the layout visitor.
///
/// Layout pruning can be disabled to compare a query against a
/// ground-truth full listing.
pub struct FileSystemMetadataCollector {
    path: String,
    layouts: Vec<Layout>,
    storage: Arc<dyn Storage>,
}

impl FileSystemMetadataCollector {
    /// # Panics
    ///
    /// Panics when `layouts` is empty; a collector without tree semantics
    /// is a configuration error.
    pub fn new(
        path: impl Into<String>,
        layouts: Vec<Layout>,
        storage: Arc<dyn Storage>,
    ) -> Result<Self, CatalogError> {
        assert!(!layouts.is_empty(), "a metadata collector needs at least one layout");
        let path = path.into();
        if !storage.exists(&path)? {
            return Err(CatalogError::MissingRoot { path });
        }
        Ok(Self {
            path,
            layouts,
            storage,
        })
    }

    /// Collect the matching rows.
    ///
    /// With layouts enabled, directories are parsed and pruned during the
    /// walk — faster, but a tree that drifted from its declared layouts
    /// fails with [`CatalogError::LayoutMismatch`]. Disabled, the entire
    /// tree is scanned and only leaves are interpreted, using the last
    /// layout's leaf convention.
    pub fn discover(
        &self,
        request: &ListRequest,
        enable_layouts: bool,
    ) -> Result<Vec<Record>, CatalogError> {
        let root = Arc::new(Node::Dir(DirNode::root(
            self.path.clone(),
            Arc::clone(&self.storage),
        )));

        let rows = if enable_layouts {
            tracing::debug!("using layouts to speed up listing");
            let queries = self
                .layouts
                .iter()
                .map(|layout| layout.query(&request.filters).map(Arc::new))
                .collect::<Result<Vec<_>, _>>()?;
            let visitor =
                LayoutVisitor::new(queries).with_stat_fields(request.stat_fields.clone());
            walk(root, visitor).collect::<Result<Vec<_>, _>>()?
        } else {
            tracing::debug!("full scan, layouts disabled");
            let layout = self.layouts.last().expect("collector needs a layout");
            let query = layout.query(&request.filters)?;
            let convention = layout
                .conventions()
                .last()
                .expect("layouts have at least one level")
                .clone();
            let filter = query
                .filter(layout.depth() - 1)
                .expect("one filter per level")
                .clone();
            let visitor = NoLayoutVisitor::new(convention, filter)
                .with_stat_fields(request.stat_fields.clone());
            walk(root, visitor).collect::<Result<Vec<_>, _>>()?
        };

        Ok(rows
            .into_iter()
            .filter(|row| request.predicates.iter().all(|predicate| predicate(row)))
            .collect())
    }

    /// Collect into a table named after the leaf convention's fields,
    /// `filename`, and the requested stat fields.
    pub fn to_table(
        &self,
        request: &ListRequest,
        enable_layouts: bool,
    ) -> Result<Table, CatalogError> {
        let leaf_convention = self.layouts[0]
            .conventions()
            .last()
            .expect("layouts have at least one level");
        let mut table = Table::new(result_columns(leaf_convention, &request.stat_fields));
        for row in self.discover(request, enable_layouts)? {
            table.push_row(row);
        }
        Ok(table)
    }
}

fn result_columns(convention: &Convention, stat_fields: &[String]) -> Vec<String> {
    convention
        .field_names()
        .map(str::to_string)
        .chain(std::iter::once("filename".to_string()))
        .chain(stat_fields.iter().cloned())
        .collect()
}
