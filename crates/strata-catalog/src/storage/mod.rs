//! Hierarchical-storage abstraction.
//!
//! Any backend that can report existence and list a directory with minimal
//! metadata is usable transparently: local disk, an in-memory tree, or an
//! object store behind the same trait.

mod local;
mod memory;

use rustc_hash::FxHashMap;
use strata_core::Value;

use crate::errors::StorageError;

pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// Metadata record attached to a listing entry.
///
/// Backends publish what they know (`size`, `type`, `modified`, ...);
/// consumers request fields by name.
pub type Metadata = FxHashMap<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
}

/// One child of a listed directory.
#[derive(Debug, Clone)]
pub struct Entry {
    /// Full path of the child.
    pub path: String,
    pub kind: EntryKind,
    pub meta: Metadata,
}

impl Entry {
    /// Last path component.
    pub fn name(&self) -> &str {
        leaf_name(&self.path)
    }
}

/// Minimal listing contract over a hierarchical store.
pub trait Storage: Send + Sync {
    fn exists(&self, path: &str) -> Result<bool, StorageError>;

    /// List the direct children of a directory, with metadata.
    fn list(&self, path: &str) -> Result<Vec<Entry>, StorageError>;
}

/// Last component of a `/`-separated path.
pub(crate) fn leaf_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    trimmed.rsplit('/').next().unwrap_or(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leaf_name() {
        assert_eq!(leaf_name("root/RED/LR_000"), "LR_000");
        assert_eq!(leaf_name("root/RED/"), "RED");
        assert_eq!(leaf_name("root"), "root");
    }
}
