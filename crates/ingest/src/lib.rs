//! # Catalog Ingestion
//!
//! Feeds the keyword catalog from the filesystem.
//!
//! ## Pipeline
//!
//! ```text
//! Path / logical name
//!     │
//!     ├──> Classifier (directory / resource / library / descriptor)
//!     │      └─> Documentation Extractor (external)
//!     │             └─> Catalog Store (collections + keywords)
//!     │
//!     └──> Watch Service (notify, one subscription per ingested root)
//!            └─> ChangeRequest channel ──> writer thread ──> reindex
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use hub_ingest::{CatalogService, SourceClassScanner, WatchBackend};
//! use hub_store::CatalogStore;
//! use std::sync::Arc;
//!
//! fn main() -> hub_ingest::Result<()> {
//!     let store = Arc::new(CatalogStore::open_in_memory()?);
//!     let extractor: Arc<dyn hub_extract::DocExtractor> = unimplemented!();
//!     let service = CatalogService::new(
//!         store,
//!         extractor,
//!         Arc::new(SourceClassScanner),
//!         WatchBackend::Native,
//!     )?;
//!     let report = service.add("/path/to/keywords", true);
//!     println!("{report}");
//!     Ok(())
//! }
//! ```

mod classify;
mod error;
mod ignorefile;
mod manifest;
mod pipeline;
mod report;
mod service;
mod watch;

pub use classify::{classify, Artifact, INGEST_EXTENSIONS};
pub use error::{IngestError, Result};
pub use ignorefile::{read_ignore_patterns, IGNORE_FILE_NAME};
pub use manifest::{ModuleManifest, SourceClassScanner};
pub use pipeline::Ingestor;
pub use report::{IngestItem, IngestOutcome, IngestReport};
pub use service::CatalogService;
pub use watch::{ChangeKind, ChangeRequest, WatchBackend, WatchService};
