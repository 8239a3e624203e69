//! Tree node model over a storage backend.

use std::sync::{Arc, OnceLock};

use crate::errors::CatalogError;
use crate::storage::{leaf_name, EntryKind, Metadata, Storage};
use crate::visit::{VisitResult, Visitor};

/// A file or directory in the tree being walked.
#[derive(Debug)]
pub enum Node {
    Dir(DirNode),
    File(FileNode),
}

impl Node {
    /// Dispatch to the visitor's dir/file handler.
    pub fn accept<V: Visitor>(&self, visitor: &V) -> Result<VisitResult<V::Payload>, CatalogError> {
        match self {
            Node::Dir(dir) => visitor.visit_dir(dir),
            Node::File(file) => visitor.visit_file(file),
        }
    }

    /// Child nodes; empty for files.
    pub fn children(&self) -> &[Arc<Node>] {
        match self {
            Node::Dir(dir) => dir.children(),
            Node::File(_) => &[],
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Node::Dir(dir) => &dir.name,
            Node::File(file) => &file.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            Node::Dir(dir) => &dir.path,
            Node::File(file) => &file.path,
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            Node::Dir(dir) => dir.depth,
            Node::File(file) => file.depth,
        }
    }
}

/// A leaf of the tree.
#[derive(Debug)]
pub struct FileNode {
    pub name: String,
    pub path: String,
    pub meta: Metadata,
    pub depth: usize,
}

impl FileNode {
    pub fn new(path: impl Into<String>, meta: Metadata, depth: usize) -> Self {
        let path = path.into();
        Self {
            name: leaf_name(&path).to_string(),
            path,
            meta,
            depth,
        }
    }
}

/// A directory with lazily listed, cached children.
pub struct DirNode {
    pub name: String,
    pub path: String,
    pub meta: Metadata,
    pub depth: usize,
    storage: Arc<dyn Storage>,
    children: OnceLock<Vec<Arc<Node>>>,
}

impl std::fmt::Debug for DirNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirNode")
            .field("path", &self.path)
            .field("depth", &self.depth)
            .field("listed", &self.children.get().is_some())
            .finish()
    }
}

impl DirNode {
    pub fn new(
        path: impl Into<String>,
        meta: Metadata,
        storage: Arc<dyn Storage>,
        depth: usize,
    ) -> Self {
        let path = path.into();
        Self {
            name: leaf_name(&path).to_string(),
            path,
            meta,
            depth,
            storage,
            children: OnceLock::new(),
        }
    }

    /// Root node of a walk.
    pub fn root(path: impl Into<String>, storage: Arc<dyn Storage>) -> Self {
        Self::new(path, Metadata::default(), storage, 0)
    }

    /// Child nodes, listed from storage at most once per node.
    ///
    /// A listing failure degrades to an empty child set: an unreadable
    /// branch must not abort an entire catalog walk.
    pub fn children(&self) -> &[Arc<Node>] {
        self.children.get_or_init(|| self.compute_children())
    }

    fn compute_children(&self) -> Vec<Arc<Node>> {
        let listing = match self.storage.list(&self.path) {
            Ok(listing) => listing,
            Err(error) => {
                tracing::debug!(path = %self.path, %error, "listing failed, treating as empty");
                return Vec::new();
            }
        };

        listing
            .into_iter()
            .map(|entry| {
                let path = entry.path.trim_end_matches('/').to_string();
                let node = if entry.kind == EntryKind::Directory && path != self.path {
                    Node::Dir(DirNode::new(
                        path,
                        entry.meta,
                        Arc::clone(&self.storage),
                        self.depth + 1,
                    ))
                } else if path == self.path {
                    // Virtual directories on object stores list themselves;
                    // surface that as an unnamed file child.
                    Node::File(FileNode {
                        name: String::new(),
                        path,
                        meta: entry.meta,
                        depth: self.depth + 1,
                    })
                } else {
                    Node::File(FileNode::new(path, entry.meta, self.depth + 1))
                };
                Arc::new(node)
            })
            .collect()
    }
}
