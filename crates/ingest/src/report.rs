//! Batch ingest report.
//!
//! Per-item outcomes replace silently swallowed exceptions: a failing
//! artifact is recorded with its reason and the batch moves on, so callers
//! can observe skip and failure counts without being able to crash the
//! sweep.

use serde::Serialize;

/// Outcome of ingesting one locator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// A collection was created (or reloaded) with this many keywords.
    Loaded { collection_id: i64, keywords: usize },
    /// Nothing to store: not an artifact, no keywords, or already loaded.
    Skipped { reason: String },
    /// Extraction or storage failed; siblings were not affected.
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestItem {
    pub locator: String,
    #[serde(flatten)]
    pub outcome: IngestOutcome,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct IngestReport {
    pub items: Vec<IngestItem>,
    /// Exclusion patterns collected from ignore files during the walk.
    /// Parsed but not applied; see DESIGN.md.
    pub ignore_patterns: Vec<String>,
}

impl IngestReport {
    pub fn record(&mut self, locator: impl Into<String>, outcome: IngestOutcome) {
        let locator = locator.into();
        match &outcome {
            IngestOutcome::Loaded { keywords, .. } => {
                log::info!("loaded {locator} ({keywords} keywords)");
            }
            IngestOutcome::Skipped { reason } => log::debug!("skipped {locator}: {reason}"),
            IngestOutcome::Failed { reason } => log::warn!("failed {locator}: {reason}"),
        }
        self.items.push(IngestItem { locator, outcome });
    }

    pub fn loaded(&self) -> usize {
        self.count(|o| matches!(o, IngestOutcome::Loaded { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, IngestOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, IngestOutcome::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&IngestOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| pred(&item.outcome)).count()
    }
}

impl std::fmt::Display for IngestReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "loaded: {}, skipped: {}, failed: {}",
            self.loaded(),
            self.skipped(),
            self.failed()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn counts_by_outcome() {
        let mut report = IngestReport::default();
        report.record(
            "a.robot",
            IngestOutcome::Loaded {
                collection_id: 1,
                keywords: 3,
            },
        );
        report.record(
            "b.txt",
            IngestOutcome::Skipped {
                reason: "no keywords".into(),
            },
        );
        report.record(
            "c.py",
            IngestOutcome::Failed {
                reason: "boom".into(),
            },
        );

        assert_eq!(report.loaded(), 1);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(report.to_string(), "loaded: 1, skipped: 1, failed: 1");
    }
}
