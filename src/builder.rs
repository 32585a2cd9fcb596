use std::path::Path;
use std::sync::Arc;

use crate::config::SearchConfig;
use crate::engine::{run, StaleCheck, WalkOptions};
use crate::error::SeekError;
use crate::results::QuickResults;
use crate::scorer::RelevanceScorer;
use crate::traits::{DirectoryAccessor, Scorer};

// ---------------------------------------------------------------------------
// SearchBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring and executing a quick search.
///
/// Created via [`dirseek::quick_search()`](crate::quick_search). Configure with
/// chained builder methods, then call [`run()`](SearchBuilder::run) to execute.
///
/// # Example
///
/// ```rust,ignore
/// let results = dirseek::quick_search()
///     .accessor(FsAccessor::new())
///     .config(config)
///     .depth(1)
///     .collect_errors(true)
///     .run(Path::new("/home/me"), "invoice")
///     .await?;
/// ```
pub struct SearchBuilder {
    accessor:       Option<Arc<dyn DirectoryAccessor>>,
    scorer:         Arc<dyn Scorer>,
    config:         SearchConfig,
    depth:          Option<u32>,
    collect_errors: bool,
    stale:          Option<Arc<StaleCheck>>,
}

impl Default for SearchBuilder {
    fn default() -> Self {
        Self {
            accessor:       None,
            scorer:         Arc::new(RelevanceScorer),
            config:         SearchConfig::default(),
            depth:          None,
            collect_errors: false,
            stale:          None,
        }
    }
}

impl SearchBuilder {
    // ── Accessor ──────────────────────────────────────────────────────────

    /// Set the directory accessor to walk with.
    pub fn accessor(mut self, a: impl DirectoryAccessor + 'static) -> Self {
        self.accessor = Some(Arc::new(a));
        self
    }

    /// Share an accessor that is already behind an `Arc`.
    pub fn shared_accessor(mut self, a: Arc<dyn DirectoryAccessor>) -> Self {
        self.accessor = Some(a);
        self
    }

    // ── Scorer ────────────────────────────────────────────────────────────

    /// Replace the built-in [`RelevanceScorer`].
    pub fn with_scorer(mut self, s: impl Scorer + 'static) -> Self {
        self.scorer = Arc::new(s);
        self
    }

    pub(crate) fn shared_scorer(mut self, s: Arc<dyn Scorer>) -> Self {
        self.scorer = s;
        self
    }

    // ── Options ───────────────────────────────────────────────────────────

    /// Use `config` for this walk. The builder owns its own copy.
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Override `config.quick_depth` for this walk.
    pub fn depth(mut self, d: u32) -> Self {
        self.depth = Some(d);
        self
    }

    /// Collect directories that could not be listed into
    /// [`QuickResults::errors`].
    ///
    /// Disabled by default. Failures are logged either way.
    pub fn collect_errors(mut self, yes: bool) -> Self {
        self.collect_errors = yes;
        self
    }

    /// Stop the walk before the next directory listing once `f` returns
    /// `true`. The result then reports `cancelled`.
    pub fn cancel_when(mut self, f: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        self.stale = Some(Arc::new(f));
        self
    }

    // ── Execute ───────────────────────────────────────────────────────────

    /// Execute the walk rooted at `base`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSource` when no accessor was provided. Failures to list
    /// individual directories are never fatal; see
    /// [`collect_errors`](SearchBuilder::collect_errors).
    pub async fn run(self, base: impl AsRef<Path>, query: &str) -> Result<QuickResults, SeekError> {
        let accessor = self
            .accessor
            .ok_or_else(|| SeekError::InvalidSource("no directory accessor provided".into()))?;

        let opts = WalkOptions {
            accessor:       accessor.as_ref(),
            scorer:         self.scorer.as_ref(),
            depth:          self.depth.unwrap_or(self.config.quick_depth),
            config:         self.config,
            collect_errors: self.collect_errors,
            stale:          self.stale.as_deref(),
        };

        Ok(run(base.as_ref(), query, opts).await)
    }
}
