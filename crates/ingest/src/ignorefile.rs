//! Per-directory ignore file.
//!
//! Each ingested directory may carry an ignore file with one exclusion
//! pattern per line. The patterns are collected into the ingest report but
//! are not yet applied during recursion — the matching semantic (basename,
//! full path, or glob) is undecided; see DESIGN.md.

use std::fs;
use std::path::Path;

pub const IGNORE_FILE_NAME: &str = ".rfhubignore";

/// Read the ignore file in `dir`, if any. Lines whose first non-whitespace
/// character is `#` and blank lines are skipped. A missing or unreadable
/// file yields no patterns.
pub fn read_ignore_patterns(dir: &Path) -> Vec<String> {
    let Ok(data) = fs::read_to_string(dir.join(IGNORE_FILE_NAME)) else {
        return Vec::new();
    };
    data.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
