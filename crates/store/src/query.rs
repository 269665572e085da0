//! Pattern-filtered reads over the catalog.
//!
//! All pattern arguments are globs (see [`crate::pattern`]) matched with a
//! case-insensitive `LIKE ... ESCAPE '\'` predicate. Queries that match
//! nothing return empty results, never errors.

use crate::error::{Result, StoreError};
use crate::pattern::glob_to_like;
use crate::store::CatalogStore;
use rusqlite::OptionalExtension;
use serde::Serialize;
use std::collections::HashSet;

/// One collection row, fully hydrated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collection {
    pub collection_id: i64,
    pub name: String,
    pub kind: String,
    pub version: String,
    pub scope: String,
    pub named_args: bool,
    pub path: Option<String>,
    pub doc: String,
    pub doc_format: String,
}

/// Listing row for a collection: doc reduced to its first line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionSummary {
    pub collection_id: i64,
    pub name: String,
    pub synopsis: String,
    pub kind: String,
    pub path: Option<String>,
}

/// One keyword row as stored; `args` keeps its serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordRow {
    pub keyword_id: i64,
    pub name: String,
    pub args: String,
    pub doc: String,
}

/// A single keyword with its argument list deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Keyword {
    pub collection_id: i64,
    pub name: String,
    pub args: Vec<String>,
    pub doc: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordSummary {
    pub name: String,
    pub doc: String,
}

/// One hierarchy entry: a collection and its matching keywords, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollectionKeywords {
    pub collection_id: i64,
    pub name: String,
    pub path: Option<String>,
    pub keywords: Vec<KeywordSummary>,
}

/// One search result row; `synopsis` is the doc's first line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub collection_id: i64,
    pub collection_name: String,
    pub keyword_name: String,
    pub synopsis: String,
}

/// Which columns a search pattern runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Keyword name only.
    Name,
    /// Keyword name OR documentation.
    Both,
}

fn first_line(text: &str) -> String {
    text.lines().next().unwrap_or("").to_string()
}

impl CatalogStore {
    /// Fetch a single collection by identifier.
    pub fn get_collection(&self, collection_id: i64) -> Result<Option<Collection>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                "SELECT collection_id, name, type, version, scope, namedargs, path, doc, doc_format
                 FROM collections WHERE collection_id = ?1",
                [collection_id],
                |row| {
                    Ok(Collection {
                        collection_id: row.get(0)?,
                        name: row.get(1)?,
                        kind: row.get(2)?,
                        version: row.get(3)?,
                        scope: row.get(4)?,
                        named_args: row.get::<_, String>(5)? == "yes",
                        path: row.get(6)?,
                        doc: row.get(7)?,
                        doc_format: row.get(8)?,
                    })
                },
            )
            .optional()?;
        Ok(row)
    }

    /// Collections whose name and kind match the given globs, sorted by name.
    pub fn list_collections(
        &self,
        name_pattern: &str,
        kind_pattern: &str,
    ) -> Result<Vec<CollectionSummary>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r"SELECT collection_id, name, doc, type, path
              FROM collections
              WHERE name LIKE ?1 ESCAPE '\' AND type LIKE ?2 ESCAPE '\'
              ORDER BY name",
        )?;
        let rows = stmt
            .query_map(
                [glob_to_like(name_pattern), glob_to_like(kind_pattern)],
                |row| {
                    Ok(CollectionSummary {
                        collection_id: row.get(0)?,
                        name: row.get(1)?,
                        synopsis: first_line(&row.get::<_, String>(2)?),
                        kind: row.get(3)?,
                        path: row.get(4)?,
                    })
                },
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Every keyword of one collection, sorted by name.
    pub fn keywords_in_collection(&self, collection_id: i64) -> Result<Vec<KeywordRow>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT keyword_id, name, args, doc
             FROM keywords WHERE collection_id = ?1
             ORDER BY name",
        )?;
        let rows = stmt
            .query_map([collection_id], |row| {
                Ok(KeywordRow {
                    keyword_id: row.get(0)?,
                    name: row.get(1)?,
                    args: row.get(2)?,
                    doc: row.get(3)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// First keyword of a collection whose name matches the glob,
    /// case-insensitively. Duplicate names are tolerated; only the first
    /// match is returned. A stored argument list that fails to deserialize
    /// propagates as [`StoreError::CorruptArgs`].
    pub fn get_keyword(&self, collection_id: i64, name_pattern: &str) -> Result<Option<Keyword>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                r"SELECT name, args, doc FROM keywords
                  WHERE collection_id = ?1 AND name LIKE ?2 ESCAPE '\'
                  LIMIT 1",
                rusqlite::params![collection_id, glob_to_like(name_pattern)],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;
        drop(conn);

        match row {
            None => Ok(None),
            Some((name, args_json, doc)) => {
                let args = serde_json::from_str(&args_json).map_err(|source| {
                    StoreError::CorruptArgs {
                        name: name.clone(),
                        source,
                    }
                })?;
                Ok(Some(Keyword {
                    collection_id,
                    name,
                    args,
                    doc,
                }))
            }
        }
    }

    /// Join across both tables, filtered on keyword name, grouped one entry
    /// per collection. Sorted by collection name, collection id, keyword
    /// name.
    pub fn keyword_hierarchy(&self, name_pattern: &str) -> Result<Vec<CollectionKeywords>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r"SELECT c.collection_id, c.name, c.path, k.name, k.doc
              FROM collections c
              JOIN keywords k ON c.collection_id = k.collection_id
              WHERE k.name LIKE ?1 ESCAPE '\'
              ORDER BY c.name, c.collection_id, k.name",
        )?;
        let rows = stmt
            .query_map([glob_to_like(name_pattern)], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<String>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut entries: Vec<CollectionKeywords> = Vec::new();
        for (collection_id, name, path, kw_name, kw_doc) in rows {
            if entries.last().map(|e| e.collection_id) != Some(collection_id) {
                entries.push(CollectionKeywords {
                    collection_id,
                    name,
                    path,
                    keywords: Vec::new(),
                });
            }
            if let Some(entry) = entries.last_mut() {
                entry.keywords.push(KeywordSummary {
                    name: kw_name,
                    doc: kw_doc,
                });
            }
        }
        Ok(entries)
    }

    /// Pattern search over keyword name (and doc, in [`SearchMode::Both`]).
    /// Rows come back sorted by collection id, collection name, keyword
    /// name, deduplicated with set semantics while preserving that order.
    pub fn search(&self, pattern: &str, mode: SearchMode) -> Result<Vec<SearchHit>> {
        let like = glob_to_like(pattern);
        let sql = match mode {
            SearchMode::Name => {
                r"SELECT c.collection_id, c.name, k.name, k.doc
                  FROM collections c
                  JOIN keywords k ON c.collection_id = k.collection_id
                  WHERE k.name LIKE ?1 ESCAPE '\'
                  ORDER BY c.collection_id, c.name, k.name"
            }
            SearchMode::Both => {
                r"SELECT c.collection_id, c.name, k.name, k.doc
                  FROM collections c
                  JOIN keywords k ON c.collection_id = k.collection_id
                  WHERE k.name LIKE ?1 ESCAPE '\' OR k.doc LIKE ?1 ESCAPE '\'
                  ORDER BY c.collection_id, c.name, k.name"
            }
        };

        let conn = self.conn()?;
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt
            .query_map([like], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut seen = HashSet::new();
        let mut hits = Vec::new();
        for (collection_id, collection_name, keyword_name, doc) in rows {
            let synopsis = first_line(doc.trim());
            let key = (
                collection_id,
                collection_name.clone(),
                keyword_name.clone(),
                synopsis.clone(),
            );
            if seen.insert(key) {
                hits.push(SearchHit {
                    collection_id,
                    collection_name,
                    keyword_name,
                    synopsis,
                });
            }
        }
        Ok(hits)
    }
}
