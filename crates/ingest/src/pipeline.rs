//! Ingestion pipeline: classification → extraction → store population.

use crate::classify::{classify, Artifact, INGEST_EXTENSIONS};
use crate::error::IngestError;
use crate::ignorefile::read_ignore_patterns;
use crate::manifest::ModuleManifest;
use crate::report::{IngestOutcome, IngestReport};
use hub_extract::{DocExtractor, LibraryDoc, Locator, PLACEHOLDER_DOC_PREFIX};
use hub_store::{CatalogStore, NewCollection};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

/// Logical library names never ingested by the installed-library sweep:
/// internal, deprecated, and reserved modules that live in the library
/// directory without being loadable libraries.
const DENYLIST: &[&str] = &[
    "remote",
    "reserved",
    "easter",
    "dialogs_py",
    "dialogs_ipy",
    "dialogs_jy",
];

/// Orchestrates ingestion of one locator (or a directory tree of them)
/// into the catalog store. Extraction failures are recorded per item and
/// never abort a batch.
pub struct Ingestor {
    store: Arc<CatalogStore>,
    extractor: Arc<dyn DocExtractor>,
    manifest: Arc<dyn ModuleManifest>,
}

impl Ingestor {
    pub fn new(
        store: Arc<CatalogStore>,
        extractor: Arc<dyn DocExtractor>,
        manifest: Arc<dyn ModuleManifest>,
    ) -> Self {
        Self {
            store,
            extractor,
            manifest,
        }
    }

    /// Idempotent best-effort ingestion of one locator: a directory, a
    /// resource/descriptor/library file, or a logical library name.
    pub fn add(&self, locator: &str) -> IngestReport {
        let mut report = IngestReport::default();
        self.add_into(locator, &mut report);
        report
    }

    fn add_into(&self, locator: &str, report: &mut IngestReport) {
        let path = Path::new(locator);
        match classify(path) {
            Artifact::Directory => self.add_dir(path, report),
            Artifact::Resource | Artifact::DocDescriptor => {
                self.add_file(path, report);
            }
            Artifact::Library => {
                self.add_file(path, report);
                self.add_module_classes(path, report);
            }
            Artifact::LogicalLibrary => {
                self.add_library(locator, report);
            }
            Artifact::Ignored => report.record(
                locator,
                IngestOutcome::Skipped {
                    reason: "not a catalog artifact".to_string(),
                },
            ),
        }
    }

    /// Recursively ingest every readable child with a recognized
    /// extension, pruning hidden subdirectories. Ignore-file patterns are
    /// collected per visited directory.
    fn add_dir(&self, dir: &Path, report: &mut IngestReport) {
        let walker = WalkDir::new(dir)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                !(entry.depth() > 0
                    && entry.file_type().is_dir()
                    && entry
                        .file_name()
                        .to_str()
                        .is_some_and(|name| name.starts_with('.')))
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    // Unreadable entries are skipped, never fatal.
                    log::warn!("unreadable entry under {}: {err}", dir.display());
                    continue;
                }
            };
            if entry.file_type().is_dir() {
                report
                    .ignore_patterns
                    .extend(read_ignore_patterns(entry.path()));
                continue;
            }
            if !has_ingest_extension(entry.path()) {
                continue;
            }
            self.add_into(&entry.path().to_string_lossy(), report);
        }
    }

    /// Extract a file artifact and load it as a collection when it yields
    /// at least one keyword.
    fn add_file(&self, path: &Path, report: &mut IngestReport) {
        let locator = Locator::Path(path.to_path_buf());
        match self.extractor.extract(&locator) {
            Ok(mut doc) => {
                if doc.keywords.is_empty() {
                    report.record(
                        locator.to_string(),
                        IngestOutcome::Skipped {
                            reason: "no keywords".to_string(),
                        },
                    );
                    return;
                }
                // Some extractors substitute boilerplate when the file has
                // no file-level documentation; it carries no information
                // and would pollute search.
                if doc.doc.starts_with(PLACEHOLDER_DOC_PREFIX) {
                    doc.doc.clear();
                }
                let outcome = self.load_collection(Some(path), &doc);
                report.record(locator.to_string(), outcome);
            }
            Err(err) => {
                report.record(
                    locator.to_string(),
                    IngestOutcome::Failed {
                        reason: err.to_string(),
                    },
                );
            }
        }
    }

    /// Ingest a library by logical name. The resulting collection carries
    /// no source path. Returns true when a collection was loaded.
    fn add_library(&self, name: &str, report: &mut IngestReport) -> bool {
        match self.extractor.extract(&Locator::Name(name.to_string())) {
            Ok(doc) => {
                if doc.keywords.is_empty() {
                    report.record(
                        name,
                        IngestOutcome::Skipped {
                            reason: "no keywords".to_string(),
                        },
                    );
                    return false;
                }
                let outcome = self.load_collection(None, &doc);
                let loaded = matches!(outcome, IngestOutcome::Loaded { .. });
                report.record(name, outcome);
                loaded
            }
            Err(err) => {
                report.record(
                    name,
                    IngestOutcome::Failed {
                        reason: err.to_string(),
                    },
                );
                false
            }
        }
    }

    /// Each class a library module defines is its own logical library; one
    /// bad class must not abort ingestion of its siblings.
    fn add_module_classes(&self, path: &Path, report: &mut IngestReport) {
        let names = match self.manifest.logical_names(path) {
            Ok(names) => names,
            Err(err) => {
                report.record(
                    path.to_string_lossy(),
                    IngestOutcome::Failed {
                        reason: format!("module manifest: {err}"),
                    },
                );
                return;
            }
        };
        for name in names {
            self.add_library(&name, report);
        }
    }

    /// Sweep a well-known library directory: candidate names come from
    /// module filenames, minus names already loaded (case-insensitive,
    /// seeded from the catalog so repeat sweeps stay idempotent) and
    /// denylisted names.
    pub fn add_installed_libraries(&self, libdir: &Path) -> IngestReport {
        let mut report = IngestReport::default();
        let entries = match std::fs::read_dir(libdir) {
            Ok(entries) => entries,
            Err(err) => {
                report.record(
                    libdir.to_string_lossy(),
                    IngestOutcome::Failed {
                        reason: format!("library directory: {err}"),
                    },
                );
                return report;
            }
        };

        let mut loaded: HashSet<String> = match self.store.list_collections("*", "*") {
            Ok(existing) => existing
                .into_iter()
                .map(|summary| summary.name.to_lowercase())
                .collect(),
            Err(err) => {
                report.record(
                    libdir.to_string_lossy(),
                    IngestOutcome::Failed {
                        reason: err.to_string(),
                    },
                );
                return report;
            }
        };
        let mut candidates: Vec<String> = entries
            .flatten()
            .filter_map(|entry| {
                let name = entry.file_name();
                let name = name.to_str()?;
                if !(name.ends_with(".py") || name.ends_with(".pyc")) {
                    return None;
                }
                Path::new(name)
                    .file_stem()
                    .and_then(OsStr::to_str)
                    .map(str::to_string)
            })
            .collect();
        candidates.sort();

        for libname in candidates {
            let lower = libname.to_lowercase();
            if loaded.contains(&lower) {
                report.record(
                    libname.as_str(),
                    IngestOutcome::Skipped {
                        reason: "already loaded".to_string(),
                    },
                );
                continue;
            }
            if should_ignore(&libname) {
                report.record(
                    libname.as_str(),
                    IngestOutcome::Skipped {
                        reason: "denylisted".to_string(),
                    },
                );
                continue;
            }
            if self.add_library(&libname, &mut report) {
                loaded.insert(lower);
            }
        }
        report
    }

    /// Incremental reindex for a modified file: every collection tracking
    /// this path has its keywords deleted and re-extracted in place. The
    /// collection's own metadata row is left untouched.
    pub fn on_change(&self, path: &Path) -> IngestReport {
        let mut report = IngestReport::default();
        let ids = match self.store.collections_with_path(path) {
            Ok(ids) => ids,
            Err(err) => {
                report.record(
                    path.to_string_lossy(),
                    IngestOutcome::Failed {
                        reason: err.to_string(),
                    },
                );
                return report;
            }
        };
        if ids.is_empty() {
            report.record(
                path.to_string_lossy(),
                IngestOutcome::Skipped {
                    reason: "no collection tracks this path".to_string(),
                },
            );
            return report;
        }
        for collection_id in ids {
            let outcome = self.reload_keywords(collection_id, path);
            report.record(path.to_string_lossy(), outcome);
        }
        report
    }

    fn reload_keywords(&self, collection_id: i64, path: &Path) -> IngestOutcome {
        if let Err(err) = self.store.delete_keywords(collection_id) {
            return IngestOutcome::Failed {
                reason: err.to_string(),
            };
        }
        match self.extractor.extract(&Locator::Path(path.to_path_buf())) {
            Ok(doc) => match self.insert_keywords(collection_id, &doc) {
                Ok(count) => IngestOutcome::Loaded {
                    collection_id,
                    keywords: count,
                },
                Err(err) => IngestOutcome::Failed {
                    reason: err.to_string(),
                },
            },
            Err(err) => IngestOutcome::Failed {
                reason: err.to_string(),
            },
        }
    }

    fn load_collection(&self, path: Option<&Path>, doc: &LibraryDoc) -> IngestOutcome {
        let inserted = self
            .store
            .add_collection(&NewCollection {
                name: &doc.name,
                kind: &doc.kind,
                version: &doc.version,
                scope: &doc.scope,
                named_args: doc.named_args,
                path,
                doc: &doc.doc,
                doc_format: &doc.doc_format,
            })
            .map_err(IngestError::from)
            .and_then(|id| Ok((id, self.insert_keywords(id, doc)?)));
        match inserted {
            Ok((collection_id, keywords)) => IngestOutcome::Loaded {
                collection_id,
                keywords,
            },
            Err(err) => IngestOutcome::Failed {
                reason: err.to_string(),
            },
        }
    }

    fn insert_keywords(
        &self,
        collection_id: i64,
        doc: &LibraryDoc,
    ) -> Result<usize, IngestError> {
        for keyword in &doc.keywords {
            self.store
                .add_keyword(collection_id, &keyword.name, &keyword.doc, &keyword.args)?;
        }
        Ok(doc.keywords.len())
    }
}

fn has_ingest_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| INGEST_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

fn should_ignore(name: &str) -> bool {
    let name = name.to_lowercase();
    name.starts_with("deprecated")
        || name.starts_with('_')
        || DENYLIST.contains(&name.as_str())
}
