//! Artifact classification.
//!
//! Cheap sniffing decides what an incoming path is before any extractor
//! runs: descriptor files are recognized by a marker token in their first
//! bytes, resource files by their table headers, so obviously unrelated
//! files never reach a full parse.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ffi::OsStr;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// File extensions considered during directory ingestion.
pub const INGEST_EXTENSIONS: &[&str] = &["xml", "robot", "txt", "py", "tsv"];

/// Extensions of structured-text resource/suite files.
const RESOURCE_EXTENSIONS: &[&str] = &["robot", "txt", "tsv"];

/// Marker token identifying a generated documentation descriptor.
const DESCRIPTOR_MARKER: &str = "<keywordspec ";

/// How many leading bytes the descriptor sniff reads.
const SNIFF_LEN: usize = 200;

static TABLE_HEADER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?mi)^\*+\s*(Test Cases?|(?:User )?Keywords?)").expect("table header regex")
});

static INIT_FILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__init__\.(txt|robot|html|tsv)$").expect("init file regex"));

/// What a locator turned out to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// Filesystem directory, recursed into.
    Directory,
    /// Structured-text file with a keyword table and no test-case table.
    Resource,
    /// Library module file.
    Library,
    /// Pre-generated documentation descriptor.
    DocDescriptor,
    /// Not an existing path; resolved by logical name alone.
    LogicalLibrary,
    /// Nothing the catalog cares about.
    Ignored,
}

/// Classify one locator.
pub fn classify(path: &Path) -> Artifact {
    if path.is_dir() {
        if is_hidden(path) {
            Artifact::Ignored
        } else {
            Artifact::Directory
        }
    } else if path.is_file() {
        if looks_like_descriptor(path) {
            Artifact::DocDescriptor
        } else if looks_like_resource(path) {
            Artifact::Resource
        } else if has_extension(path, &["py"]) {
            Artifact::Library
        } else {
            Artifact::Ignored
        }
    } else {
        Artifact::LogicalLibrary
    }
}

pub(crate) fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .is_some_and(|name| name.starts_with('.'))
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| extensions.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// A descriptor is an `.xml` file whose first bytes carry the generated
/// marker token. Reading a fixed prefix keeps the sniff cheap for xml
/// files that are not descriptors at all.
fn looks_like_descriptor(path: &Path) -> bool {
    if !has_extension(path, &["xml"]) {
        return false;
    }
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut buf = [0u8; SNIFF_LEN];
    let mut read = 0;
    while read < SNIFF_LEN {
        match file.read(&mut buf[read..]) {
            Ok(0) => break,
            Ok(n) => read += n,
            Err(_) => return false,
        }
    }
    String::from_utf8_lossy(&buf[..read])
        .to_lowercase()
        .contains(DESCRIPTOR_MARKER)
}

/// A resource file has a keyword table but no test-case table. A file with
/// both is a test suite, not a reusable resource. `__init__` files are
/// never resources regardless of content.
fn looks_like_resource(path: &Path) -> bool {
    if !has_extension(path, RESOURCE_EXTENSIONS) {
        return false;
    }
    let Some(name) = path.file_name().and_then(OsStr::to_str) else {
        return false;
    };
    if INIT_FILE.is_match(&name.to_lowercase()) {
        return false;
    }
    let Ok(data) = std::fs::read_to_string(path) else {
        return false;
    };

    let mut found_keyword_table = false;
    for caps in TABLE_HEADER.captures_iter(&data) {
        if caps[1].to_lowercase().starts_with("test case") {
            return false;
        }
        found_keyword_table = true;
    }
    found_keyword_table
}
