use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use async_trait::async_trait;
use ignore::{DirEntry, WalkBuilder, WalkState};

use crate::entry::Entry;
use crate::error::SeekError;
use crate::fs::dirs_first;
use crate::results::{DeepSearchResponse, DeepSearchStats};
use crate::traits::DeepSearchGateway;

/// Default cap on deep-search matches.
pub const DEFAULT_DEEP_LIMIT: usize = 1000;

// ---------------------------------------------------------------------------
// ParallelDeepSearch
// ---------------------------------------------------------------------------

/// An exhaustive local [`DeepSearchGateway`] built on `ignore`'s parallel
/// walker.
///
/// Matches names case-insensitively by substring. By default hidden entries
/// are skipped and `.gitignore` rules are honoured. Results are sorted
/// directories first, then by lower-cased name.
#[derive(Debug, Clone)]
pub struct ParallelDeepSearch {
    threads:           usize,
    limit:             usize,
    include_hidden:    bool,
    respect_gitignore: bool,
}

impl Default for ParallelDeepSearch {
    fn default() -> Self {
        Self {
            threads:           num_cpus(),
            limit:             DEFAULT_DEEP_LIMIT,
            include_hidden:    false,
            respect_gitignore: true,
        }
    }
}

impl ParallelDeepSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of walker threads. Defaults to the logical CPU count.
    pub fn threads(mut self, n: usize) -> Self {
        self.threads = n.max(1);
        self
    }

    /// Stop after `n` matches.
    pub fn limit(mut self, n: usize) -> Self {
        self.limit = n;
        self
    }

    pub fn include_hidden(mut self, yes: bool) -> Self {
        self.include_hidden = yes;
        self
    }

    pub fn respect_gitignore(mut self, yes: bool) -> Self {
        self.respect_gitignore = yes;
        self
    }

    /// The blocking search itself.
    fn search_blocking(&self, start: &Path, query: &str) -> DeepSearchResponse {
        let started = Instant::now();

        let walker = WalkBuilder::new(start)
            .hidden(!self.include_hidden)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .follow_links(false)
            .threads(self.threads)
            .build_parallel();

        // Shared state across threads
        let results  = Arc::new(Mutex::new(Vec::<Entry>::new()));
        let matches  = Arc::new(AtomicUsize::new(0));
        let indexed  = Arc::new(AtomicUsize::new(0));
        let needle   = query.to_lowercase();
        let limit    = self.limit;

        walker.run(|| {
            let results = Arc::clone(&results);
            let matches = Arc::clone(&matches);
            let indexed = Arc::clone(&indexed);
            let needle  = needle.clone();

            Box::new(move |res: Result<DirEntry, ignore::Error>| -> WalkState {
                let entry = match res {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::debug!(error = %e, "deep search skipped an entry");
                        return WalkState::Continue;
                    }
                };

                indexed.fetch_add(1, Ordering::Relaxed);

                if matches.load(Ordering::Relaxed) >= limit {
                    return WalkState::Quit;
                }

                // The start directory is not its own match.
                if entry.depth() == 0 {
                    return WalkState::Continue;
                }

                let name = entry.file_name().to_string_lossy().into_owned();
                if !name.to_lowercase().contains(&needle) {
                    return WalkState::Continue;
                }

                let metadata = match entry.metadata() {
                    Ok(m) => m,
                    Err(_) => return WalkState::Continue,
                };

                // Two guards: the counter can overshoot before Quit reaches
                // every thread.
                if matches.fetch_add(1, Ordering::Relaxed) < limit {
                    if let Ok(mut r) = results.lock() {
                        r.push(Entry {
                            name,
                            path:   entry.path().to_path_buf(),
                            is_dir: metadata.is_dir(),
                            size:   if metadata.is_file() { metadata.len() } else { 0 },
                        });
                    }
                }

                WalkState::Continue
            })
        });

        let mut found = Arc::try_unwrap(results).unwrap_or_default().into_inner().unwrap_or_default();
        found.sort_by(dirs_first);

        let stats = DeepSearchStats {
            elapsed_ms:    started.elapsed().as_millis() as u64,
            files_indexed: indexed.load(Ordering::Relaxed) as u64,
            matches_found: found.len() as u64,
        };

        DeepSearchResponse { results: found, stats }
    }
}

#[async_trait]
impl DeepSearchGateway for ParallelDeepSearch {
    async fn deep_search(&self, start: &Path, query: &str) -> Result<DeepSearchResponse, SeekError> {
        if !start.is_dir() {
            return Err(SeekError::Backend(format!(
                "cannot search {}: not a directory",
                start.display()
            )));
        }

        let this = self.clone();
        let start: PathBuf = start.to_path_buf();
        let query = query.to_owned();

        let response = tokio::task::spawn_blocking(move || this.search_blocking(&start, &query))
            .await
            .map_err(|e| SeekError::Backend(format!("deep search task failed: {e}")))?;

        tracing::debug!(
            matches = response.stats.matches_found,
            indexed = response.stats.files_indexed,
            elapsed_ms = response.stats.elapsed_ms,
            "deep search finished"
        );
        Ok(response)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Get the logical CPU count, with a safe fallback.
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}
