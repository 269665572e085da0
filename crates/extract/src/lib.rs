//! Documentation-extractor contract.
//!
//! The catalog engine never parses artifacts itself; it hands a [`Locator`]
//! to a [`DocExtractor`] and stores whatever [`LibraryDoc`] comes back.
//! Concrete extractors (libdoc XML readers, resource-file parsers, remote
//! library inspectors) live outside the core crates and plug in through
//! this trait.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Boilerplate doc text some extractors substitute when a resource file has
/// no file-level documentation. The ingestion pipeline normalizes it away.
pub const PLACEHOLDER_DOC_PREFIX: &str = "Documentation for resource file";

pub type Result<T> = std::result::Result<T, ExtractError>;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported artifact: {0}")]
    Unsupported(String),

    #[error("missing attribute: {0}")]
    MissingAttribute(String),

    #[error("invalid documentation data: {0}")]
    Data(String),
}

/// What to extract documentation from: a file on disk, or a library
/// resolvable by logical name alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    Path(PathBuf),
    Name(String),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Path(path) => write!(f, "{}", path.display()),
            Locator::Name(name) => write!(f, "{name}"),
        }
    }
}

/// One documented operation as reported by an extractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordDoc {
    pub name: String,
    pub doc: String,
    /// Ordered argument tokens, e.g. `"locator"` or `"timeout=5"`.
    pub args: Vec<String>,
}

/// Structured documentation for one artifact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LibraryDoc {
    pub name: String,
    /// Kind tag, e.g. `"LIBRARY"` or `"RESOURCE"`.
    pub kind: String,
    pub version: String,
    pub scope: String,
    pub named_args: bool,
    pub doc: String,
    pub doc_format: String,
    pub keywords: Vec<KeywordDoc>,
}

impl LibraryDoc {
    /// New doc with the field defaults extractors fall back to when an
    /// artifact carries no explicit metadata.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            version: "unknown".to_string(),
            scope: String::new(),
            named_args: true,
            doc: String::new(),
            doc_format: "ROBOT".to_string(),
            keywords: Vec::new(),
        }
    }
}

/// Produces structured documentation for a locator.
///
/// Implementations must be callable from the watch writer thread as well as
/// the control thread, hence `Send + Sync`.
pub trait DocExtractor: Send + Sync {
    fn extract(&self, locator: &Locator) -> Result<LibraryDoc>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locator_display() {
        assert_eq!(Locator::Name("BuiltIn".into()).to_string(), "BuiltIn");
        assert_eq!(
            Locator::Path(PathBuf::from("/a/b.robot")).to_string(),
            "/a/b.robot"
        );
    }

    #[test]
    fn library_doc_defaults() {
        let doc = LibraryDoc::new("Login", "RESOURCE");
        assert_eq!(doc.version, "unknown");
        assert!(doc.named_args);
        assert_eq!(doc.doc_format, "ROBOT");
        assert!(doc.keywords.is_empty());
    }
}
