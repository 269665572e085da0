//! Demo extractor for structured-text resource files.
//!
//! Good enough to make the binary useful end to end: it reads `Keywords`
//! tables (keyword rows with `[Arguments]` and `[Documentation]` settings)
//! and the `Documentation` row of a `Settings` table. Anything that is not
//! a resource file on disk is rejected; richer extraction belongs in a
//! real extractor behind the same trait.

use hub_extract::{DocExtractor, ExtractError, KeywordDoc, LibraryDoc, Locator};
use std::path::Path;

pub struct ResourceExtractor;

#[derive(PartialEq)]
enum Table {
    Settings,
    Keywords,
    Other,
}

impl DocExtractor for ResourceExtractor {
    fn extract(&self, locator: &Locator) -> hub_extract::Result<LibraryDoc> {
        let path = match locator {
            Locator::Path(path) => path,
            Locator::Name(name) => {
                return Err(ExtractError::Unsupported(format!(
                    "logical library {name} (this extractor only reads resource files)"
                )))
            }
        };
        let text = std::fs::read_to_string(path)?;
        Ok(parse_resource(path, &text))
    }
}

fn parse_resource(path: &Path, text: &str) -> LibraryDoc {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unnamed");
    let mut doc = LibraryDoc::new(stem, "RESOURCE");

    let mut table = Table::Other;
    let mut current: Option<KeywordDoc> = None;
    for line in text.lines() {
        if let Some(header) = table_header(line) {
            if let Some(keyword) = current.take() {
                doc.keywords.push(keyword);
            }
            table = header;
            continue;
        }
        match table {
            Table::Settings => {
                let mut cells = split_cells(line);
                if cells.first().map(String::as_str) == Some("Documentation") {
                    doc.doc = cells.split_off(1).join(" ");
                }
            }
            Table::Keywords => {
                if !line.starts_with(' ') && !line.starts_with('\t') {
                    if let Some(keyword) = current.take() {
                        doc.keywords.push(keyword);
                    }
                    let name = line.trim();
                    if !name.is_empty() && !name.starts_with('#') {
                        current = Some(KeywordDoc {
                            name: name.to_string(),
                            doc: String::new(),
                            args: Vec::new(),
                        });
                    }
                } else if let Some(keyword) = current.as_mut() {
                    let mut cells = split_cells(line);
                    match cells.first().map(String::as_str) {
                        Some("[Arguments]") => keyword.args = cells.split_off(1),
                        Some("[Documentation]") => keyword.doc = cells.split_off(1).join(" "),
                        _ => {}
                    }
                }
            }
            Table::Other => {}
        }
    }
    if let Some(keyword) = current.take() {
        doc.keywords.push(keyword);
    }
    doc
}

fn table_header(line: &str) -> Option<Table> {
    if !line.starts_with('*') {
        return None;
    }
    let name = line.trim_matches(|c: char| c == '*' || c.is_whitespace());
    Some(match name.to_lowercase().as_str() {
        "keywords" | "keyword" | "user keywords" | "user keyword" => Table::Keywords,
        "settings" | "setting" => Table::Settings,
        _ => Table::Other,
    })
}

/// Cells are separated by tabs or runs of two or more spaces.
fn split_cells(line: &str) -> Vec<String> {
    line.split('\t')
        .flat_map(|part| part.split("  "))
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
*** Settings ***
Documentation    Shared login keywords.

*** Keywords ***
Open Login Page
    [Documentation]    Navigates to the login form.
    [Arguments]    ${url}    ${timeout}=5
    Go To    ${url}

Submit Credentials
    Input Text    username    ${name}
";

    #[test]
    fn parses_keywords_with_args_and_docs() {
        let doc = parse_resource(Path::new("/kw/login.robot"), SAMPLE);

        assert_eq!(doc.name, "login");
        assert_eq!(doc.kind, "RESOURCE");
        assert_eq!(doc.doc, "Shared login keywords.");
        assert_eq!(doc.keywords.len(), 2);

        let open = &doc.keywords[0];
        assert_eq!(open.name, "Open Login Page");
        assert_eq!(open.doc, "Navigates to the login form.");
        assert_eq!(open.args, vec!["${url}".to_string(), "${timeout}=5".to_string()]);

        let submit = &doc.keywords[1];
        assert_eq!(submit.name, "Submit Credentials");
        assert!(submit.args.is_empty());
    }

    #[test]
    fn test_case_tables_are_not_keywords() {
        let doc = parse_resource(
            Path::new("/kw/suite.robot"),
            "*** Test Cases ***\nLogin Works\n    Open Login Page\n",
        );
        assert!(doc.keywords.is_empty());
    }

    #[test]
    fn logical_names_are_unsupported() {
        let err = ResourceExtractor
            .extract(&Locator::Name("BuiltIn".into()))
            .unwrap_err();
        assert!(matches!(err, ExtractError::Unsupported(_)));
    }
}
