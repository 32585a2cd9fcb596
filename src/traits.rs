use std::path::Path;

use async_trait::async_trait;

use crate::entry::Entry;
use crate::error::SeekError;
use crate::results::{DeepSearchResponse, DeepSearchStats};

/// Lists the immediate entries of one directory.
///
/// Implement this to make dirseek search anything directory-shaped: the local
/// filesystem ([`FsAccessor`](crate::fs::FsAccessor)), a remote share, an
/// archive, or an in-memory tree in tests.
///
/// # Thread Safety
///
/// `Send + Sync` are required. A session shares one accessor between the
/// baseline listing, every debounced quick search, and navigation.
///
/// # Error Handling
///
/// Return `Err` when the directory cannot be listed (permissions, a race with
/// deletion, transient IO). The walker logs it and treats the directory as
/// empty; it never aborts the walk.
///
/// # Example
///
/// ```rust
/// use std::path::Path;
/// use dirseek::{async_trait, DirectoryAccessor, Entry, SeekError};
///
/// struct Flat(Vec<Entry>);
///
/// #[async_trait]
/// impl DirectoryAccessor for Flat {
///     async fn list(&self, _path: &Path, _include_hidden: bool) -> Result<Vec<Entry>, SeekError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait DirectoryAccessor: Send + Sync {
    /// Immediate entries of `path`, in listing order.
    async fn list(&self, path: &Path, include_hidden: bool) -> Result<Vec<Entry>, SeekError>;
}

/// Maps an entry name and a query to a relevance score.
///
/// `None` excludes the entry. Scorers are name-only: files and directories
/// are scored identically.
///
/// # Example
///
/// ```rust
/// use dirseek::Scorer;
///
/// struct Suffix;
///
/// impl Scorer for Suffix {
///     fn score(&self, name: &str, query: &str) -> Option<i32> {
///         name.ends_with(query).then_some(50)
///     }
/// }
/// ```
pub trait Scorer: Send + Sync {
    fn score(&self, name: &str, query: &str) -> Option<i32>;
}

/// An exhaustive search backend, triggered by explicit submission.
#[async_trait]
pub trait DeepSearchGateway: Send + Sync {
    async fn deep_search(&self, start: &Path, query: &str)
        -> Result<DeepSearchResponse, SeekError>;
}

/// Persisted key-value settings.
pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> Result<(), SeekError>;
}

/// The presentation layer a [`SearchSession`](crate::session::SearchSession)
/// drives.
///
/// Both calls may arrive from a spawned task, never concurrently for one
/// session's latest generation.
pub trait Presenter: Send + Sync {
    /// Show `entries`. `stats` is present only for deep search results.
    fn render(&self, entries: &[Entry], stats: Option<&DeepSearchStats>);

    /// Show a status line. An empty string clears it.
    fn set_status(&self, text: &str);
}
