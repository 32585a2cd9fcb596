//! Local filesystem access.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ignore::WalkBuilder;

use crate::entry::Entry;
use crate::error::SeekError;
use crate::traits::DirectoryAccessor;

/// Lists local directories through `tokio::fs`.
///
/// Names starting with `.` count as hidden. Listings come back directories
/// first, then files, each group ordered by lower-cased name.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAccessor;

impl FsAccessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl DirectoryAccessor for FsAccessor {
    async fn list(&self, path: &Path, include_hidden: bool) -> Result<Vec<Entry>, SeekError> {
        let mut dir = tokio::fs::read_dir(path)
            .await
            .map_err(|e| SeekError::from_io(path, e))?;

        let mut contents = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(|e| SeekError::from_io(path, e))? {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !include_hidden && name.starts_with('.') {
                continue;
            }

            let entry_path = entry.path();
            let metadata = entry
                .metadata()
                .await
                .map_err(|e| SeekError::from_io(&entry_path, e))?;

            contents.push(Entry {
                name,
                path: entry_path,
                is_dir: metadata.is_dir(),
                size: if metadata.is_file() { metadata.len() } else { 0 },
            });
        }

        contents.sort_by(dirs_first);
        Ok(contents)
    }
}

/// Directories before files, then case-insensitive by name.
pub(crate) fn dirs_first(a: &Entry, b: &Entry) -> Ordering {
    match (a.is_dir, b.is_dir) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
    }
}

/// Total size in bytes of every file beneath `path`, hidden files included.
///
/// Unreadable entries are skipped. Runs on the blocking pool.
///
/// # Errors
///
/// Returns `InvalidSource` if `path` is not an existing directory.
pub async fn folder_size(path: impl Into<PathBuf>) -> Result<u64, SeekError> {
    let path = path.into();
    if !path.is_dir() {
        return Err(SeekError::InvalidSource(format!(
            "not a directory: {}",
            path.display()
        )));
    }

    tokio::task::spawn_blocking(move || {
        WalkBuilder::new(&path)
            .standard_filters(false)
            .hidden(false)
            .follow_links(false)
            .build()
            .filter_map(Result::ok)
            .filter_map(|entry| entry.metadata().ok())
            .filter(|meta| meta.is_file())
            .map(|meta| meta.len())
            .sum::<u64>()
    })
    .await
    .map_err(|e| SeekError::Backend(format!("folder size task failed: {e}")))
}
