use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::entry::Entry;
use crate::error::SeekError;

/// The output of a completed quick search.
///
/// `errors` is opt-in, disabled by default. Enable it on the builder with
/// `.collect_errors(true)`.
#[derive(Debug)]
pub struct QuickResults {
    /// Matches in walk order: each directory's matches by descending score,
    /// earlier-visited directories first. Never longer than `max_results`.
    pub entries: Vec<Entry>,

    /// The walk stopped because `max_results` was reached.
    pub reached_cap: bool,

    /// The walk stopped because its stale check fired.
    pub cancelled: bool,

    /// Walk statistics.
    pub stats: ScanStats,

    /// Directories that could not be listed. Only populated if
    /// `.collect_errors(true)` was set on the builder.
    pub errors: Vec<SeekError>,
}

/// Statistics for one quick-search walk.
#[derive(Debug, Clone, Default)]
pub struct ScanStats {
    /// Directories successfully listed.
    pub dirs_listed: usize,

    /// Entries handed to the scorer.
    pub entries_scored: usize,

    /// Wall-clock time from walk start to completion.
    pub duration: Duration,
}

/// Reporting-only statistics from a deep search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeepSearchStats {
    pub elapsed_ms: u64,
    pub files_indexed: u64,
    pub matches_found: u64,
}

/// Results plus statistics returned by a
/// [`DeepSearchGateway`](crate::traits::DeepSearchGateway).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeepSearchResponse {
    pub results: Vec<Entry>,
    pub stats: DeepSearchStats,
}
