//! Module manifest: which logical sub-libraries a module artifact defines.
//!
//! A single library module can hold several classes, each loadable as its
//! own library. The pipeline only sees this trait; the concrete mechanism
//! (static source analysis here, dynamic reflection elsewhere) stays an
//! implementation choice.

use once_cell::sync::Lazy;
use regex::Regex;
use std::ffi::OsStr;
use std::io;
use std::path::Path;

/// Enumerates the logical-reference names a module artifact contributes.
pub trait ModuleManifest: Send + Sync {
    /// Zero or more logical names of the form `module.Class` for the
    /// module at `path`.
    fn logical_names(&self, path: &Path) -> io::Result<Vec<String>>;
}

static CLASS_DEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*class\s+([A-Za-z_][A-Za-z0-9_]*)").expect("class regex"));

/// Finds class definitions with a static scan of the module source. The
/// module itself is never loaded or executed.
pub struct SourceClassScanner;

impl ModuleManifest for SourceClassScanner {
    fn logical_names(&self, path: &Path) -> io::Result<Vec<String>> {
        let source = std::fs::read_to_string(path)?;
        let stem = path
            .file_stem()
            .and_then(OsStr::to_str)
            .unwrap_or_default();
        Ok(CLASS_DEF
            .captures_iter(&source)
            .map(|caps| format!("{stem}.{}", &caps[1]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn finds_all_class_definitions() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("CustomLib.py");
        fs::write(
            &path,
            "import os\n\nclass First:\n    pass\n\nclass Second:\n    class Inner:\n        pass\n",
        )
        .unwrap();

        let names = SourceClassScanner.logical_names(&path).unwrap();
        assert_eq!(
            names,
            vec![
                "CustomLib.First".to_string(),
                "CustomLib.Second".to_string(),
                "CustomLib.Inner".to_string(),
            ]
        );
    }

    #[test]
    fn module_without_classes_yields_nothing() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("helpers.py");
        fs::write(&path, "def keyword():\n    pass\n").unwrap();
        assert!(SourceClassScanner.logical_names(&path).unwrap().is_empty());
    }

    #[test]
    fn missing_module_propagates_io_error() {
        assert!(SourceClassScanner
            .logical_names(Path::new("/nonexistent/mod.py"))
            .is_err());
    }
}
