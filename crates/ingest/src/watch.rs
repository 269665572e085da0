//! Filesystem watch service.
//!
//! One recursive subscription per top-level ingested directory. The notify
//! backend delivers raw events on its own thread; this layer only filters
//! and translates them into [`ChangeRequest`]s for whatever dispatch
//! function it was built with — it never touches the store.

use crate::error::Result;
use notify::{
    Config as NotifyConfig, Event, EventKind, PollWatcher, RecommendedWatcher, RecursiveMode,
    Watcher,
};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File extensions the watch layer reacts to. Descriptor xml files are
/// deliberately absent: they are generated artifacts, not edited in place.
const WATCHED_EXTENSIONS: &[&str] = &["robot", "txt", "py", "tsv"];

/// Which notification mechanism backs the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchBackend {
    /// OS-event-driven watcher.
    Native,
    /// Fallback polling watcher.
    Polling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Created,
    Modified,
    Removed,
}

/// One translated filesystem event, ready for the writer thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRequest {
    pub path: PathBuf,
    pub kind: ChangeKind,
}

enum Backend {
    Native(RecommendedWatcher),
    Polling(PollWatcher),
}

impl Backend {
    fn watch(&mut self, path: &Path, mode: RecursiveMode) -> notify::Result<()> {
        match self {
            Backend::Native(watcher) => watcher.watch(path, mode),
            Backend::Polling(watcher) => watcher.watch(path, mode),
        }
    }
}

/// Maintains the set of watched directory roots and the backend
/// subscription for each.
pub struct WatchService {
    backend: Backend,
    watched: HashSet<PathBuf>,
}

impl WatchService {
    /// Build a watch service that hands every relevant [`ChangeRequest`]
    /// to `dispatch`. `dispatch` runs on the notification thread and must
    /// only enqueue.
    pub fn new<F>(backend: WatchBackend, poll_interval: Duration, mut dispatch: F) -> Result<Self>
    where
        F: FnMut(ChangeRequest) + Send + 'static,
    {
        let handler = move |result: notify::Result<Event>| match result {
            Ok(event) => {
                for request in translate(&event) {
                    dispatch(request);
                }
            }
            Err(err) => log::warn!("watch backend error: {err}"),
        };
        let config = NotifyConfig::default().with_poll_interval(poll_interval);
        let backend = match backend {
            WatchBackend::Native => Backend::Native(RecommendedWatcher::new(handler, config)?),
            WatchBackend::Polling => Backend::Polling(PollWatcher::new(handler, config)?),
        };
        Ok(Self {
            backend,
            watched: HashSet::new(),
        })
    }

    /// Subscribe to recursive change notification for `dir`. Registering
    /// an already-watched root (or one given under a different spelling of
    /// the same canonical path) is a no-op, so overlapping `add` calls
    /// don't stack subscriptions.
    pub fn watch(&mut self, dir: &Path) -> Result<()> {
        let dir = std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        if self.watched.contains(&dir) {
            return Ok(());
        }
        self.backend.watch(&dir, RecursiveMode::Recursive)?;
        log::debug!("watching {}", dir.display());
        self.watched.insert(dir);
        Ok(())
    }

    pub fn watched_count(&self) -> usize {
        self.watched.len()
    }
}

fn translate(event: &Event) -> Vec<ChangeRequest> {
    let kind = match event.kind {
        EventKind::Create(_) => ChangeKind::Created,
        EventKind::Modify(_) => ChangeKind::Modified,
        EventKind::Remove(_) => ChangeKind::Removed,
        _ => return Vec::new(),
    };
    event
        .paths
        .iter()
        .filter(|path| is_watched_file(path))
        .map(|path| ChangeRequest {
            path: path.clone(),
            kind,
        })
        .collect()
}

fn is_watched_file(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| {
            WATCHED_EXTENSIONS
                .iter()
                .any(|watched| ext.eq_ignore_ascii_case(watched))
        })
}
