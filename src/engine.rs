use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::time::Instant;

use crate::config::SearchConfig;
use crate::entry::{Entry, ScoredEntry};
use crate::error::SeekError;
use crate::results::{QuickResults, ScanStats};
use crate::scorer::RelevanceScorer;
use crate::traits::{DirectoryAccessor, Scorer};

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Returns `true` once the walk's result can no longer be used.
pub type StaleCheck = dyn Fn() -> bool + Send + Sync;

// ---------------------------------------------------------------------------
// WalkOptions
// ---------------------------------------------------------------------------

/// Everything one walk needs, fixed for its whole duration.
///
/// `pub(crate)`: callers configure these through the builder (`.config()`,
/// `.depth()`, `.with_scorer()`, `.cancel_when()`).
pub(crate) struct WalkOptions<'a> {
    pub accessor:       &'a dyn DirectoryAccessor,
    pub scorer:         &'a dyn Scorer,
    pub config:         SearchConfig,
    pub depth:          u32,
    pub collect_errors: bool,
    pub stale:          Option<&'a StaleCheck>,
}

// ---------------------------------------------------------------------------
// Fold state
// ---------------------------------------------------------------------------

/// What one directory visit hands back to its parent.
struct Visit {
    entries:    Vec<Entry>,
    reached_cap: bool,
    cancelled:  bool,
}

impl Visit {
    fn empty() -> Self {
        Self { entries: Vec::new(), reached_cap: false, cancelled: false }
    }

    fn cancelled() -> Self {
        Self { cancelled: true, ..Self::empty() }
    }
}

/// Counters threaded through every visit.
#[derive(Default)]
struct Tally {
    dirs_listed:    usize,
    entries_scored: usize,
    errors:         Vec<SeekError>,
}

// ---------------------------------------------------------------------------
// run()
// ---------------------------------------------------------------------------

/// Walk `base` up to `opts.depth` levels down, scoring every entry.
///
/// Depth-first over sibling order, one directory at a time. Each directory's
/// own matches are ordered by descending score (listing order on ties) and
/// precede anything found beneath it. Once `max_results` matches have
/// accumulated no further directory is listed.
pub(crate) async fn run(base: &Path, query: &str, opts: WalkOptions<'_>) -> QuickResults {
    let start = Instant::now();
    let mut tally = Tally::default();

    tracing::debug!(
        base = %base.display(),
        query,
        depth = opts.depth,
        max_results = opts.config.max_results,
        "quick search started"
    );

    let visit = visit(&opts, base, query, opts.depth, &mut tally).await;

    let stats = ScanStats {
        dirs_listed:    tally.dirs_listed,
        entries_scored: tally.entries_scored,
        duration:       start.elapsed(),
    };

    tracing::debug!(
        matches = visit.entries.len(),
        dirs = stats.dirs_listed,
        reached_cap = visit.reached_cap,
        cancelled = visit.cancelled,
        elapsed_ms = stats.duration.as_millis() as u64,
        "quick search finished"
    );

    QuickResults {
        entries:     visit.entries,
        reached_cap: visit.reached_cap,
        cancelled:   visit.cancelled,
        stats,
        errors:      tally.errors,
    }
}

/// One directory: list, score, then recurse into subdirectories in listing
/// order while capacity remains.
fn visit<'a>(
    opts: &'a WalkOptions<'a>,
    dir: &'a Path,
    query: &'a str,
    depth: u32,
    tally: &'a mut Tally,
) -> BoxFuture<'a, Visit> {
    Box::pin(async move {
        if opts.stale.is_some_and(|stale| stale()) {
            return Visit::cancelled();
        }

        let listing = match opts.accessor.list(dir, opts.config.include_hidden).await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "skipping unreadable directory");
                if opts.collect_errors {
                    tally.errors.push(e);
                }
                return Visit::empty();
            }
        };

        tally.dirs_listed += 1;
        tally.entries_scored += listing.len();

        let cap = opts.config.max_results as usize;
        let mut entries = rank(&listing, query, opts.scorer);

        if entries.len() >= cap {
            entries.truncate(cap);
            return Visit { entries, reached_cap: true, cancelled: false };
        }

        if depth == 0 {
            return Visit { entries, reached_cap: false, cancelled: false };
        }

        for sub in listing.iter().filter(|e| e.is_dir) {
            let child = visit(opts, &sub.path, query, depth - 1, tally).await;
            entries.extend(child.entries);

            if entries.len() >= cap {
                entries.truncate(cap);
                return Visit { entries, reached_cap: true, cancelled: false };
            }
            if child.cancelled {
                return Visit { entries, reached_cap: false, cancelled: true };
            }
        }

        Visit { entries, reached_cap: false, cancelled: false }
    })
}

/// Score a listing and order the matches, best first. `sort_by` is stable,
/// so equal scores keep listing order.
fn rank(listing: &[Entry], query: &str, scorer: &dyn Scorer) -> Vec<Entry> {
    let mut scored: Vec<ScoredEntry> = listing
        .iter()
        .filter_map(|entry| {
            scorer
                .score(&entry.name, query)
                .filter(|&score| score > 0)
                .map(|score| ScoredEntry { entry: entry.clone(), score })
        })
        .collect();

    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.into_iter().map(|s| s.entry).collect()
}

// ---------------------------------------------------------------------------
// walk()
// ---------------------------------------------------------------------------

/// Quick-search `base` with the built-in scorer.
///
/// The bare form of [`SearchBuilder::run`](crate::SearchBuilder::run): no
/// stats, no error collection, no stale check. Directories that cannot be
/// listed are logged and contribute nothing.
pub async fn walk(
    accessor: &dyn DirectoryAccessor,
    base: &Path,
    query: &str,
    depth: u32,
    config: &SearchConfig,
) -> Vec<Entry> {
    let opts = WalkOptions {
        accessor,
        scorer: &RelevanceScorer,
        config: config.clone(),
        depth,
        collect_errors: false,
        stale: None,
    };
    run(base, query, opts).await.entries
}
