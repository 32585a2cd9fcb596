//! The search session controller.
//!
//! A [`SearchSession`] sits between the presentation layer and the engines.
//! It owns the current directory and its baseline listing, debounces
//! keystrokes into quick searches, guards deep searches with an in-flight
//! flag, and makes sure only the newest request ever reaches the
//! [`Presenter`].
//!
//! Every query change and every navigation bumps a generation counter.
//! Debounce timers, walks and deep searches remember the generation they
//! started under and drop their output if it has moved on.
//!
//! Navigations carry a separate token: only a newer navigation supersedes a
//! listing that is still loading. Keystrokes typed meanwhile are discarded
//! when the new directory is committed.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use tokio::task::JoinHandle;

use crate::builder::SearchBuilder;
use crate::config::SearchConfig;
use crate::entry::Entry;
use crate::error::SeekError;
use crate::results::DeepSearchResponse;
use crate::scorer::RelevanceScorer;
use crate::traits::{DeepSearchGateway, DirectoryAccessor, Presenter, Scorer, SettingsStore};

/// What the session is currently doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No query; the baseline listing is shown.
    Idle,
    /// A query is active and answered by debounced quick searches.
    QuickSearching,
    /// A deep search is in flight.
    DeepSearching,
}

/// How a [`SearchSession::submit`] call ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Results were rendered.
    Rendered,
    /// The backend failed; the error is on the status line.
    Failed,
    /// A newer query or navigation arrived first; nothing was rendered.
    Superseded,
    /// The trimmed query was empty.
    Empty,
    /// Another deep search is still running.
    AlreadyInFlight,
}

struct State {
    current_path: PathBuf,
    baseline:     Vec<Entry>,
    query:        String,
}

pub struct SearchSession {
    accessor:   Arc<dyn DirectoryAccessor>,
    gateway:    Arc<dyn DeepSearchGateway>,
    presenter:  Arc<dyn Presenter>,
    scorer:     Arc<dyn Scorer>,
    store:      Option<Arc<dyn SettingsStore>>,
    config:     RwLock<SearchConfig>,
    state:      Mutex<State>,
    generation: Arc<AtomicU64>,
    navigation: AtomicU64,
    in_flight:  AtomicBool,
}

impl SearchSession {
    pub fn new(
        accessor: Arc<dyn DirectoryAccessor>,
        gateway: Arc<dyn DeepSearchGateway>,
        presenter: Arc<dyn Presenter>,
    ) -> Self {
        Self {
            accessor,
            gateway,
            presenter,
            scorer:     Arc::new(RelevanceScorer),
            store:      None,
            config:     RwLock::new(SearchConfig::default()),
            state:      Mutex::new(State {
                current_path: PathBuf::new(),
                baseline:     Vec::new(),
                query:        String::new(),
            }),
            generation: Arc::new(AtomicU64::new(0)),
            navigation: AtomicU64::new(0),
            in_flight:  AtomicBool::new(false),
        }
    }

    /// Persist settings in `store`, loading the current config from it.
    pub fn with_store(mut self, store: Arc<dyn SettingsStore>) -> Self {
        *self.config.get_mut().unwrap_or_else(PoisonError::into_inner) = SearchConfig::load(store.as_ref());
        self.store = Some(store);
        self
    }

    pub fn with_config(mut self, config: SearchConfig) -> Self {
        *self.config.get_mut().unwrap_or_else(PoisonError::into_inner) = config;
        self
    }

    /// Replace the built-in relevance scorer for quick searches.
    pub fn with_scorer(mut self, scorer: impl Scorer + 'static) -> Self {
        self.scorer = Arc::new(scorer);
        self
    }

    // ── State ─────────────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        if self.is_in_flight() {
            Phase::DeepSearching
        } else if self.lock_state().query.trim().is_empty() {
            Phase::Idle
        } else {
            Phase::QuickSearching
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn current_path(&self) -> PathBuf {
        self.lock_state().current_path.clone()
    }

    /// The unfiltered listing of the current directory.
    pub fn baseline(&self) -> Vec<Entry> {
        self.lock_state().baseline.clone()
    }

    pub fn query(&self) -> String {
        self.lock_state().query.clone()
    }

    /// A snapshot of the active configuration.
    pub fn config(&self) -> SearchConfig {
        self.config.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    // ── Navigation ────────────────────────────────────────────────────────

    /// Make `path` the current directory: clear the query, drop anything
    /// pending for the old directory, and show the new baseline listing.
    ///
    /// # Errors
    ///
    /// Returns the accessor's error if `path` cannot be listed. The session
    /// stays on its previous directory and the error goes to the status line.
    pub async fn navigate(&self, path: impl AsRef<Path>) -> Result<(), SeekError> {
        let path = path.as_ref();
        let ticket = self.navigation.fetch_add(1, Ordering::SeqCst) + 1;
        self.bump();
        let include_hidden = self.config().include_hidden;

        let listing = match self.accessor.list(path, include_hidden).await {
            Ok(listing) => listing,
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to load directory");
                if self.navigation.load(Ordering::SeqCst) == ticket {
                    self.presenter.set_status(&format!("Error loading directory: {e}"));
                }
                return Err(e);
            }
        };

        {
            let mut state = self.lock_state();
            if self.navigation.load(Ordering::SeqCst) != ticket {
                tracing::debug!(path = %path.display(), "navigation superseded, dropping listing");
                return Ok(());
            }
            // Anything typed while the listing loaded targeted the old directory.
            self.bump();
            state.current_path = path.to_path_buf();
            state.baseline = listing.clone();
            state.query.clear();
        }

        tracing::info!(path = %path.display(), entries = listing.len(), "navigated");
        self.presenter.set_status("");
        self.presenter.render(&listing, None);
        Ok(())
    }

    /// An entry was activated in any result set. Directories are navigated
    /// into; files are left to the caller. Returns whether navigation happened.
    pub async fn activate_entry(&self, entry: &Entry) -> Result<bool, SeekError> {
        if !entry.is_dir {
            return Ok(false);
        }
        self.navigate(&entry.path).await?;
        Ok(true)
    }

    // ── Quick search ──────────────────────────────────────────────────────

    /// The query text changed.
    ///
    /// An empty query restores the baseline listing immediately. Otherwise a
    /// quick search is scheduled after the debounce window; any keystroke
    /// before it fires supersedes it. Returns the debounce task, if one was
    /// scheduled.
    pub fn query_changed(self: &Arc<Self>, text: &str) -> Option<JoinHandle<()>> {
        let generation = self.bump();

        let baseline = {
            let mut state = self.lock_state();
            state.query = text.to_owned();
            if !text.trim().is_empty() {
                None
            } else {
                Some(state.baseline.clone())
            }
        };

        if let Some(baseline) = baseline {
            self.presenter.set_status("");
            self.presenter.render(&baseline, None);
            return None;
        }

        let delay = self.config().debounce();
        let query = text.trim().to_owned();
        let this = Arc::clone(self);

        Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if !this.is_current(generation) {
                tracing::debug!(query = %query, "debounced query superseded");
                return;
            }
            this.run_quick(generation, &query).await;
        }))
    }

    /// Run a quick search for `query` under `generation` and render it if
    /// nothing newer has arrived meanwhile.
    async fn run_quick(&self, generation: u64, query: &str) {
        let base = self.current_path();
        if base.as_os_str().is_empty() {
            return;
        }

        let counter = Arc::clone(&self.generation);
        let results = SearchBuilder::default()
            .shared_accessor(Arc::clone(&self.accessor))
            .shared_scorer(Arc::clone(&self.scorer))
            .config(self.config())
            .cancel_when(move || counter.load(Ordering::SeqCst) != generation)
            .run(&base, query)
            .await;

        let results = match results {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(query, error = %e, "quick search failed");
                return;
            }
        };

        if results.cancelled || !self.is_current(generation) {
            tracing::debug!(query, "dropping stale quick search results");
            return;
        }

        self.presenter.render(&results.entries, None);
        self.presenter.set_status(&format!(
            "Found {} results for \"{}\"",
            results.entries.len(),
            query
        ));
    }

    // ── Deep search ───────────────────────────────────────────────────────

    /// Explicit submission: run a deep search from the current directory.
    ///
    /// Refused while another deep search is in flight. Results that arrive
    /// after a newer query or navigation are dropped.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let query = text.trim();
        if query.is_empty() {
            return SubmitOutcome::Empty;
        }

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!(query, "deep search already in flight");
            return SubmitOutcome::AlreadyInFlight;
        }

        let generation = self.bump();
        let start = {
            let mut state = self.lock_state();
            state.query = text.to_owned();
            state.current_path.clone()
        };

        self.presenter.set_status("Searching...");
        let response = self.gateway.deep_search(&start, query).await;
        self.in_flight.store(false, Ordering::SeqCst);

        if !self.is_current(generation) {
            tracing::debug!(query, "dropping stale deep search response");
            return SubmitOutcome::Superseded;
        }

        match response {
            Ok(DeepSearchResponse { results, stats }) => {
                self.presenter.render(&results, Some(&stats));
                self.presenter.set_status(&format!(
                    "Found {} results for \"{}\" in {} ms ({} entries indexed)",
                    results.len(),
                    query,
                    stats.elapsed_ms,
                    stats.files_indexed
                ));
                SubmitOutcome::Rendered
            }
            Err(e) => {
                tracing::warn!(query, error = %e, "deep search failed");
                self.presenter.set_status(&format!("Error searching: {e}"));
                SubmitOutcome::Failed
            }
        }
    }

    // ── Settings ──────────────────────────────────────────────────────────

    /// Replace the configuration. Walks already running keep their snapshot.
    pub fn apply_config(&self, config: SearchConfig) {
        tracing::info!(?config, "applying search config");

        if let Some(store) = &self.store {
            if let Err(e) = config.save(store.as_ref()) {
                tracing::warn!(error = %e, "failed to persist search config");
            }
        }

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn lock_state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
