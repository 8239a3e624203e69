//! Local-filesystem storage.

use std::path::Path;

use chrono::{DateTime, Utc};
use strata_core::Value;

use super::{Entry, EntryKind, Metadata, Storage};
use crate::errors::StorageError;

/// Storage over the local filesystem via `std::fs`.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Storage for LocalStorage {
    fn exists(&self, path: &str) -> Result<bool, StorageError> {
        Ok(Path::new(path).exists())
    }

    fn list(&self, path: &str) -> Result<Vec<Entry>, StorageError> {
        let io_error = |source: std::io::Error| {
            if source.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound {
                    path: path.to_string(),
                }
            } else {
                StorageError::Io {
                    path: path.to_string(),
                    source,
                }
            }
        };

        let mut entries = Vec::new();
        for dir_entry in std::fs::read_dir(path).map_err(io_error)? {
            let dir_entry = dir_entry.map_err(io_error)?;
            let stat = dir_entry.metadata().map_err(io_error)?;
            let kind = if stat.is_dir() {
                EntryKind::Directory
            } else {
                EntryKind::File
            };

            let mut meta = Metadata::default();
            meta.insert("size".to_string(), Value::Int(stat.len() as i64));
            meta.insert(
                "type".to_string(),
                Value::Str(
                    match kind {
                        EntryKind::Directory => "directory",
                        EntryKind::File => "file",
                    }
                    .to_string(),
                ),
            );
            if let Ok(modified) = stat.modified() {
                meta.insert(
                    "modified".to_string(),
                    Value::Time(DateTime::<Utc>::from(modified).naive_utc()),
                );
            }

            entries.push(Entry {
                path: dir_entry.path().to_string_lossy().into_owned(),
                kind,
                meta,
            });
        }
        // Sort for deterministic output.
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}
