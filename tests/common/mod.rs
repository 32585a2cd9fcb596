#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dirseek::{
    async_trait, DeepSearchGateway, DeepSearchResponse, DeepSearchStats, DirectoryAccessor, Entry,
    Presenter, SeekError,
};
use tokio::sync::Notify;

// ---------------------------------------------------------------------------
// MemTree: an in-memory DirectoryAccessor
// ---------------------------------------------------------------------------

/// A directory tree held in memory.
///
/// Records every `list()` call so tests can assert on traversal order and
/// count. Paths registered with `fail()` return a permission error; a path
/// registered with `gate_once()` blocks its first listing until released.
#[derive(Default)]
pub struct MemTree {
    dirs:   HashMap<PathBuf, Vec<Entry>>,
    failing: HashSet<PathBuf>,
    calls:  Mutex<Vec<(PathBuf, bool)>>,
    gate:   Mutex<Option<(PathBuf, Arc<Notify>)>>,
}

impl MemTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `dir` with `entries` in listing order.
    pub fn dir(mut self, dir: &str, entries: Vec<Entry>) -> Self {
        self.dirs.insert(PathBuf::from(dir), entries);
        self
    }

    pub fn fail(mut self, dir: &str) -> Self {
        self.failing.insert(PathBuf::from(dir));
        self
    }

    /// Block the first listing of `dir` until the returned `Notify` fires.
    pub fn gate_once(&self, dir: &str) -> Arc<Notify> {
        let notify = Arc::new(Notify::new());
        *self.gate.lock().unwrap() = Some((PathBuf::from(dir), Arc::clone(&notify)));
        notify
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().iter().map(|(p, _)| p.clone()).collect()
    }

    pub fn hidden_flags(&self) -> Vec<bool> {
        self.calls.lock().unwrap().iter().map(|(_, h)| *h).collect()
    }
}

#[async_trait]
impl DirectoryAccessor for MemTree {
    async fn list(&self, path: &Path, include_hidden: bool) -> Result<Vec<Entry>, SeekError> {
        self.calls.lock().unwrap().push((path.to_path_buf(), include_hidden));

        let gate = {
            let mut gate = self.gate.lock().unwrap();
            let hit = matches!(gate.as_ref(), Some((p, _)) if p.as_path() == path);
            if hit {
                gate.take().map(|(_, n)| n)
            } else {
                None
            }
        };
        if let Some(notify) = gate {
            notify.notified().await;
        }

        if self.failing.contains(path) {
            return Err(SeekError::from_io(
                path,
                io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
            ));
        }
        self.dirs
            .get(path)
            .cloned()
            .ok_or_else(|| SeekError::NotFound(path.to_path_buf()))
    }
}

pub fn file(path: &str) -> Entry {
    Entry::file(path, 10)
}

pub fn dir(path: &str) -> Entry {
    Entry::dir(path)
}

pub fn names(entries: &[Entry]) -> Vec<String> {
    entries.iter().map(|e| e.name.clone()).collect()
}

// ---------------------------------------------------------------------------
// Recorder: a Presenter that remembers everything
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Render { entries: Vec<Entry>, stats: Option<DeepSearchStats> },
    Status(String),
}

#[derive(Default)]
pub struct Recorder {
    events: Mutex<Vec<Event>>,
}

impl Recorder {
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn renders(&self) -> Vec<(Vec<Entry>, Option<DeepSearchStats>)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Render { entries, stats } => Some((entries, stats)),
                Event::Status(_) => None,
            })
            .collect()
    }

    pub fn last_render(&self) -> Option<Vec<Entry>> {
        self.renders().pop().map(|(entries, _)| entries)
    }

    pub fn last_status(&self) -> Option<String> {
        self.events().into_iter().rev().find_map(|e| match e {
            Event::Status(s) => Some(s),
            Event::Render { .. } => None,
        })
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }
}

impl Presenter for Recorder {
    fn render(&self, entries: &[Entry], stats: Option<&DeepSearchStats>) {
        self.events.lock().unwrap().push(Event::Render {
            entries: entries.to_vec(),
            stats:   stats.cloned(),
        });
    }

    fn set_status(&self, text: &str) {
        self.events.lock().unwrap().push(Event::Status(text.to_owned()));
    }
}

// ---------------------------------------------------------------------------
// Scripted: a DeepSearchGateway with a canned answer
// ---------------------------------------------------------------------------

pub struct Scripted {
    answer:  Result<Vec<Entry>, String>,
    release: Option<Arc<Notify>>,
    pub seen: Mutex<Vec<(PathBuf, String)>>,
}

impl Scripted {
    pub fn ok(results: Vec<Entry>) -> Self {
        Self { answer: Ok(results), release: None, seen: Mutex::new(Vec::new()) }
    }

    pub fn err(message: &str) -> Self {
        Self { answer: Err(message.to_owned()), release: None, seen: Mutex::new(Vec::new()) }
    }

    /// Hold every answer until the returned `Notify` fires.
    pub fn held(mut self) -> (Self, Arc<Notify>) {
        let notify = Arc::new(Notify::new());
        self.release = Some(Arc::clone(&notify));
        (self, notify)
    }
}

#[async_trait]
impl DeepSearchGateway for Scripted {
    async fn deep_search(&self, start: &Path, query: &str) -> Result<DeepSearchResponse, SeekError> {
        self.seen.lock().unwrap().push((start.to_path_buf(), query.to_owned()));
        if let Some(release) = &self.release {
            release.notified().await;
        }
        match &self.answer {
            Ok(results) => Ok(DeepSearchResponse {
                results: results.clone(),
                stats:   DeepSearchStats {
                    elapsed_ms:    12,
                    files_indexed: 340,
                    matches_found: results.len() as u64,
                },
            }),
            Err(message) => Err(SeekError::Backend(message.clone())),
        }
    }
}
