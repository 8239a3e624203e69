//! In-memory storage backed by a set of file paths.
//!
//! Directories are implied by the paths. Useful for tests and for querying
//! small trees whose listing was obtained elsewhere.

use std::collections::BTreeSet;

use strata_core::Value;

use super::{Entry, EntryKind, Metadata, Storage};
use crate::errors::StorageError;

#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: BTreeSet<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding the given file paths.
    pub fn with_files<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut storage = Self::new();
        for path in paths {
            storage.touch(path);
        }
        storage
    }

    /// Register an empty file.
    pub fn touch(&mut self, path: impl Into<String>) {
        self.files.insert(path.into().trim_matches('/').to_string());
    }

    fn file_meta() -> Metadata {
        let mut meta = Metadata::default();
        meta.insert("size".to_string(), Value::Int(0));
        meta.insert("type".to_string(), Value::Str("file".to_string()));
        meta
    }

    fn dir_meta() -> Metadata {
        let mut meta = Metadata::default();
        meta.insert("size".to_string(), Value::Int(0));
        meta.insert("type".to_string(), Value::Str("directory".to_string()));
        meta
    }
}

impl Storage for MemoryStorage {
    fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let path = path.trim_matches('/');
        let prefix = format!("{path}/");
        Ok(self
            .files
            .iter()
            .any(|f| f.as_str() == path || f.starts_with(&prefix)))
    }

    fn list(&self, path: &str) -> Result<Vec<Entry>, StorageError> {
        let path = path.trim_matches('/');
        if !self.exists(path)? {
            return Err(StorageError::NotFound {
                path: path.to_string(),
            });
        }

        let prefix = format!("{path}/");
        let mut entries: Vec<Entry> = Vec::new();
        let mut seen_dirs: BTreeSet<&str> = BTreeSet::new();
        // BTreeSet iteration keeps the listing sorted and deterministic.
        for file in self.files.iter() {
            let Some(rest) = file.strip_prefix(&prefix) else {
                continue;
            };
            match rest.split_once('/') {
                None => entries.push(Entry {
                    path: file.clone(),
                    kind: EntryKind::File,
                    meta: Self::file_meta(),
                }),
                Some((dir, _)) => {
                    if seen_dirs.insert(dir) {
                        entries.push(Entry {
                            path: format!("{prefix}{dir}"),
                            kind: EntryKind::Directory,
                            meta: Self::dir_meta(),
                        });
                    }
                }
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> MemoryStorage {
        MemoryStorage::with_files([
            "root/RED/LR_000/a.txt",
            "root/RED/LR_001/b.txt",
            "root/top.txt",
        ])
    }

    #[test]
    fn test_exists() {
        let storage = storage();
        assert!(storage.exists("root").unwrap());
        assert!(storage.exists("root/RED").unwrap());
        assert!(storage.exists("root/top.txt").unwrap());
        assert!(!storage.exists("root/BLUE").unwrap());
    }

    #[test]
    fn test_list_mixes_dirs_and_files() {
        let storage = storage();
        let entries = storage.list("root").unwrap();
        let names: Vec<(&str, EntryKind)> =
            entries.iter().map(|e| (e.name(), e.kind)).collect();
        assert_eq!(
            names,
            vec![("RED", EntryKind::Directory), ("top.txt", EntryKind::File)]
        );
    }

    #[test]
    fn test_list_unknown_path() {
        assert!(matches!(
            storage().list("nowhere"),
            Err(StorageError::NotFound { .. })
        ));
    }
}
