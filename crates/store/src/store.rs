//! Catalog mutations: collection/keyword inserts, scoped deletes, reset.

use crate::error::{Result, StoreError};
use crate::schema;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Durable relational catalog of collections and keywords.
///
/// The connection sits behind a mutex: rusqlite connections are not safe
/// for concurrent mutation, and both the control thread and the watch
/// writer thread reach the store. WAL mode keeps readers consistent while
/// a write is in flight.
pub struct CatalogStore {
    conn: Mutex<Connection>,
}

/// Fields for a new collection row.
#[derive(Debug, Clone)]
pub struct NewCollection<'a> {
    pub name: &'a str,
    pub kind: &'a str,
    pub version: &'a str,
    pub scope: &'a str,
    pub named_args: bool,
    /// Source path; `None` for artifacts referenced by logical name.
    pub path: Option<&'a Path>,
    pub doc: &'a str,
    pub doc_format: &'a str,
}

impl CatalogStore {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(schema::open_db(path)?),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Mutex::new(schema::open_in_memory()?),
        })
    }

    pub(crate) fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| StoreError::LockPoisoned)
    }

    /// Insert a collection row and return its store-generated identifier.
    /// Paths are stored in canonical absolute form.
    pub fn add_collection(&self, collection: &NewCollection<'_>) -> Result<i64> {
        let path = collection
            .path
            .map(|p| canonical_path(p).to_string_lossy().into_owned());
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO collections (name, type, version, scope, namedargs, path, doc, doc_format)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                collection.name,
                collection.kind,
                collection.version,
                collection.scope,
                if collection.named_args { "yes" } else { "no" },
                path,
                collection.doc,
                collection.doc_format,
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Insert one keyword. The argument list is persisted as a JSON array
    /// of strings so it round-trips as an ordered list.
    pub fn add_keyword(
        &self,
        collection_id: i64,
        name: &str,
        doc: &str,
        args: &[String],
    ) -> Result<i64> {
        let args_json = serde_json::to_string(args)?;
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO keywords (collection_id, name, doc, args)
             VALUES (?1, ?2, ?3, ?4)",
            params![collection_id, name, doc, args_json],
        )?;
        Ok(conn.last_insert_rowid())
    }

    /// Delete every keyword owned by a collection. Returns the number of
    /// rows removed.
    pub fn delete_keywords(&self, collection_id: i64) -> Result<usize> {
        let conn = self.conn()?;
        let deleted = conn.execute(
            "DELETE FROM keywords WHERE collection_id = ?1",
            [collection_id],
        )?;
        Ok(deleted)
    }

    /// Remove all data from both tables, leaving the schema intact.
    pub fn reset(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM keywords", [])?;
        conn.execute("DELETE FROM collections", [])?;
        Ok(())
    }

    /// Identifiers of every collection whose stored path equals `path`.
    /// Expected to yield exactly one match, but reindexing tolerates zero
    /// or more.
    pub fn collections_with_path(&self, path: &Path) -> Result<Vec<i64>> {
        let stored = canonical_path(path).to_string_lossy().into_owned();
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT collection_id FROM collections WHERE path = ?1")?;
        let ids = stmt
            .query_map([stored], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<i64>>>()?;
        Ok(ids)
    }
}

/// Canonical absolute form of a path. Falls back to the path as given when
/// it no longer resolves (e.g. a lookup racing a delete).
pub(crate) fn canonical_path(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
