//! Shared test doubles for the ingestion suites.

use hub_extract::{DocExtractor, ExtractError, KeywordDoc, LibraryDoc, Locator};
use std::collections::HashMap;
use std::path::Path;

/// Deterministic extractor for tests.
///
/// File locators are parsed with a toy grammar: a line starting `# doc:`
/// sets the artifact doc; in `.py` files every `def name(` is a keyword;
/// in anything else every unindented line outside table headers is a
/// keyword. Logical names resolve against a canned map; unknown names fail
/// with a data error, like a real extractor facing an unloadable library.
#[derive(Default)]
pub struct FakeExtractor {
    libraries: HashMap<String, LibraryDoc>,
}

impl FakeExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_library(mut self, name: &str, keywords: &[&str]) -> Self {
        let mut doc = LibraryDoc::new(name, "LIBRARY");
        doc.keywords = keywords
            .iter()
            .map(|kw| KeywordDoc {
                name: (*kw).to_string(),
                doc: format!("Does {kw}."),
                args: vec!["arg".to_string()],
            })
            .collect();
        self.libraries.insert(name.to_string(), doc);
        self
    }
}

impl DocExtractor for FakeExtractor {
    fn extract(&self, locator: &Locator) -> hub_extract::Result<LibraryDoc> {
        match locator {
            Locator::Path(path) => extract_file(path),
            Locator::Name(name) => self
                .libraries
                .get(name)
                .cloned()
                .ok_or_else(|| ExtractError::Data(format!("unknown library: {name}"))),
        }
    }
}

fn extract_file(path: &Path) -> hub_extract::Result<LibraryDoc> {
    let text = std::fs::read_to_string(path)?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");
    let is_module = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("py"));

    let mut doc = LibraryDoc::new(stem, if is_module { "LIBRARY" } else { "RESOURCE" });
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("# doc: ") {
            doc.doc = rest.to_string();
            continue;
        }
        let name = if is_module {
            line.strip_prefix("def ")
                .and_then(|rest| rest.split('(').next())
                .map(str::to_string)
        } else if !line.starts_with("***")
            && !line.starts_with(' ')
            && !line.starts_with('#')
            && !line.trim().is_empty()
        {
            Some(line.trim().to_string())
        } else {
            None
        };
        if let Some(name) = name {
            doc.keywords.push(KeywordDoc {
                doc: format!("Does {name}."),
                name,
                args: Vec::new(),
            });
        }
    }
    Ok(doc)
}
