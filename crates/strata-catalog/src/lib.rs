//! # strata-catalog
//!
//! Layout-pruned traversal over hierarchical storage. Associates each
//! directory depth with a naming convention so a query can discard whole
//! subtrees that cannot satisfy its filters, and collects the surviving
//! leaves into a tabular result.

pub mod composite;
pub mod discover;
pub mod errors;
pub mod layout;
pub mod node;
pub mod storage;
pub mod table;
pub mod visit;
pub mod walk;

// Re-export the most commonly used types at the crate root.
pub use composite::{CompositeLayout, CompositeQuery};
pub use discover::{FileDiscoverer, FileSystemMetadataCollector, ListRequest, Predicate};
pub use errors::{CatalogError, StorageError};
pub use layout::{Layout, LayoutQuery};
pub use node::{DirNode, FileNode, Node};
pub use storage::{Entry, EntryKind, LocalStorage, MemoryStorage, Metadata, Storage};
pub use table::Table;
pub use visit::{
    LayoutVisitor, Listing, MismatchPolicy, NoLayoutVisitor, StandardVisitor, VisitResult, Visitor,
};
pub use walk::{walk, Walk};
