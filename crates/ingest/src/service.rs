//! Catalog service: store + extractor + watch, one writer thread.
//!
//! Watch callbacks never mutate the store. The notification thread
//! enqueues [`ChangeRequest`]s; a single writer thread owned by the
//! service drains the queue and performs every watch-triggered mutation.
//! The control thread's own ingestion calls write directly; both paths
//! serialize on the store's connection lock.

use crate::classify::is_hidden;
use crate::error::Result;
use crate::manifest::ModuleManifest;
use crate::pipeline::Ingestor;
use crate::report::IngestReport;
use crate::watch::{ChangeKind, ChangeRequest, WatchBackend, WatchService};
use hub_extract::DocExtractor;
use hub_store::CatalogStore;
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);

enum ServiceMessage {
    Change(ChangeRequest),
    Shutdown,
}

/// Process-wide catalog façade, constructed once and passed by reference:
/// holds the store handle and the watch subscriptions, no ambient globals.
pub struct CatalogService {
    store: Arc<CatalogStore>,
    ingestor: Arc<Ingestor>,
    watch: Mutex<WatchService>,
    tx: Sender<ServiceMessage>,
    writer: Option<JoinHandle<()>>,
}

impl CatalogService {
    pub fn new(
        store: Arc<CatalogStore>,
        extractor: Arc<dyn DocExtractor>,
        manifest: Arc<dyn ModuleManifest>,
        backend: WatchBackend,
    ) -> Result<Self> {
        Self::with_poll_interval(store, extractor, manifest, backend, DEFAULT_POLL_INTERVAL)
    }

    pub fn with_poll_interval(
        store: Arc<CatalogStore>,
        extractor: Arc<dyn DocExtractor>,
        manifest: Arc<dyn ModuleManifest>,
        backend: WatchBackend,
        poll_interval: Duration,
    ) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        let watch_tx = tx.clone();
        let watch = WatchService::new(backend, poll_interval, move |request| {
            // Notification thread: enqueue only.
            let _ = watch_tx.send(ServiceMessage::Change(request));
        })?;
        let ingestor = Arc::new(Ingestor::new(store.clone(), extractor, manifest));
        let writer = spawn_writer(ingestor.clone(), rx);
        Ok(Self {
            store,
            ingestor,
            watch: Mutex::new(watch),
            tx,
            writer: Some(writer),
        })
    }

    /// Ingest one locator. When it is a (non-hidden) directory and
    /// `monitor` is true, its canonical form is registered for recursive
    /// change notification after the walk.
    pub fn add(&self, locator: &str, monitor: bool) -> IngestReport {
        let report = self.ingestor.add(locator);
        let path = Path::new(locator);
        if monitor && path.is_dir() && !is_hidden(path) {
            match self.watch.lock() {
                Ok(mut watch) => {
                    if let Err(err) = watch.watch(path) {
                        log::warn!("cannot watch {locator}: {err}");
                    }
                }
                Err(_) => log::warn!("watch lock poisoned; {locator} not monitored"),
            }
        }
        report
    }

    /// Sweep a well-known library directory for installed libraries.
    pub fn add_installed_libraries(&self, libdir: &Path) -> IngestReport {
        self.ingestor.add_installed_libraries(libdir)
    }

    /// Enqueue a change as if the watch backend had reported it. The
    /// writer thread picks it up in arrival order.
    pub fn notify_change(&self, request: ChangeRequest) {
        let _ = self.tx.send(ServiceMessage::Change(request));
    }

    pub fn store(&self) -> &Arc<CatalogStore> {
        &self.store
    }

    pub fn watched_count(&self) -> usize {
        self.watch.lock().map(|w| w.watched_count()).unwrap_or(0)
    }

    /// Stop consuming watch events and join the writer thread. Events
    /// still queued are drained first; storage outlives the writer.
    pub fn shutdown(&mut self) {
        let _ = self.tx.send(ServiceMessage::Shutdown);
        if let Some(writer) = self.writer.take() {
            let _ = writer.join();
        }
    }
}

impl Drop for CatalogService {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn spawn_writer(ingestor: Arc<Ingestor>, rx: Receiver<ServiceMessage>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        while let Ok(message) = rx.recv() {
            match message {
                ServiceMessage::Shutdown => break,
                ServiceMessage::Change(request) => dispatch_change(&ingestor, request),
            }
        }
    })
}

fn dispatch_change(ingestor: &Ingestor, request: ChangeRequest) {
    match request.kind {
        // The ancestor subscription already covers created files; ingest
        // without registering anything new.
        ChangeKind::Created => {
            let report = ingestor.add(&request.path.to_string_lossy());
            log::debug!("created {}: {report}", request.path.display());
        }
        ChangeKind::Modified => {
            let report = ingestor.on_change(&request.path);
            log::debug!("modified {}: {report}", request.path.display());
        }
        // Deletion is deferred: stale collection/keyword rows persist
        // until the next catalog reset.
        ChangeKind::Removed => {
            log::debug!("ignoring delete event for {}", request.path.display());
        }
    }
}
