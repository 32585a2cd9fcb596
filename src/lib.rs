//! # dirseek
//!
//! Type-ahead search for file browsers.
//!
//! dirseek answers every keystroke with a *quick search*: a bounded,
//! depth-first walk of a shallow slice of the directory tree, scored by a
//! tiered name-relevance model and capped at a fixed number of results.
//! Exhaustive searches are delegated to a *deep search* backend on explicit
//! submission. A [`SearchSession`] ties both to a presentation layer, with
//! debouncing and last-keystroke-wins semantics.
//!
//! The engine is generic over where entries come from ([`DirectoryAccessor`])
//! and how they are ranked ([`Scorer`]). [`FsAccessor`] and
//! [`ParallelDeepSearch`] cover the local filesystem.
//!
//! # Quick Start
//!
//! ```rust
//! use std::path::Path;
//! use dirseek::{async_trait, DirectoryAccessor, Entry, SearchConfig, SeekError};
//!
//! // A single flat directory held in memory
//! struct Flat(Vec<Entry>);
//!
//! #[async_trait]
//! impl DirectoryAccessor for Flat {
//!     async fn list(&self, _path: &Path, _hidden: bool) -> Result<Vec<Entry>, SeekError> {
//!         Ok(self.0.clone())
//!     }
//! }
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let results = dirseek::quick_search()
//!     .accessor(Flat(vec![
//!         Entry::file("/docs/invoice_jan.txt", 120),
//!         Entry::file("/docs/Invoice.pdf", 2048),
//!         Entry::file("/docs/report.txt", 64),
//!     ]))
//!     .config(SearchConfig::default())
//!     .depth(0)
//!     .run("/docs", "invoice")
//!     .await
//!     .unwrap();
//!
//! let names: Vec<_> = results.entries.iter().map(|e| e.name.as_str()).collect();
//! assert_eq!(names, ["invoice_jan.txt", "Invoice.pdf"]);
//! # });
//! ```
//!
//! # Scoring
//!
//! See [`RelevanceScorer`] for the tier table. Implement [`Scorer`] to rank
//! differently:
//!
//! ```rust
//! use dirseek::Scorer;
//!
//! struct Extension;
//!
//! impl Scorer for Extension {
//!     fn score(&self, name: &str, query: &str) -> Option<i32> {
//!         name.rsplit_once('.')
//!             .filter(|(_, ext)| ext.eq_ignore_ascii_case(query))
//!             .map(|_| 1)
//!     }
//! }
//! ```

#![forbid(unsafe_code)]

pub mod engine;
pub mod fs;
pub mod session;

mod builder;
mod config;
mod deep;
mod entry;
mod error;
mod results;
mod scorer;
mod store;
mod traits;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use async_trait::async_trait;

pub use builder::SearchBuilder;
pub use config::{SearchConfig, CONFIG_KEY};
pub use deep::{ParallelDeepSearch, DEFAULT_DEEP_LIMIT};
pub use entry::Entry;
pub use error::SeekError;
pub use fs::{folder_size, FsAccessor};
pub use results::{DeepSearchResponse, DeepSearchStats, QuickResults, ScanStats};
pub use scorer::{score, RelevanceScorer};
pub use session::{Phase, SearchSession, SubmitOutcome};
pub use store::{JsonFileStore, MemoryStore};
pub use traits::{DeepSearchGateway, DirectoryAccessor, Presenter, Scorer, SettingsStore};

// ── Entry point ───────────────────────────────────────────────────────────────

/// Create a new [`SearchBuilder`] to configure and run a quick search.
///
/// # Example
///
/// ```rust,no_run
/// use dirseek::{FsAccessor, SearchConfig};
///
/// # async fn demo() -> Result<(), dirseek::SeekError> {
/// let results = dirseek::quick_search()
///     .accessor(FsAccessor::new())
///     .config(SearchConfig { quick_depth: 1, ..SearchConfig::default() })
///     .run("/home", "notes")
///     .await?;
///
/// for entry in &results.entries {
///     println!("{}", entry.path.display());
/// }
/// # Ok(())
/// # }
/// ```
pub fn quick_search() -> SearchBuilder {
    SearchBuilder::default()
}
