use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A single directory entry produced by a
/// [`DirectoryAccessor`](crate::traits::DirectoryAccessor) or a deep search.
///
/// Immutable once returned. `path` is unique within one listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// The entry's file name.
    pub name: String,

    /// Full path to the entry.
    pub path: PathBuf,

    /// Whether this entry is a directory.
    pub is_dir: bool,

    /// Size in bytes. Always `0` for directories.
    pub size: u64,
}

impl Entry {
    /// A file entry.
    pub fn file(path: impl Into<PathBuf>, size: u64) -> Self {
        let path = path.into();
        Self {
            name: file_name_of(&path),
            path,
            is_dir: false,
            size,
        }
    }

    /// A directory entry.
    pub fn dir(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: file_name_of(&path),
            path,
            is_dir: true,
            size: 0,
        }
    }
}

fn file_name_of(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// An entry paired with its relevance score.
///
/// Only exists for scores above zero; discarded once a directory's matches
/// have been ordered.
#[derive(Debug, Clone)]
pub(crate) struct ScoredEntry {
    pub entry: Entry,
    pub score: i32,
}
