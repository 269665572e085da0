//! Database schema and migrations for the keyword catalog.
//!
//! Uses rusqlite with WAL mode. Migrations are append-only — never edit
//! existing entries, only add new ones. [`open_db`] is the single entry
//! point: it opens the database, enables WAL + foreign keys, and applies
//! any pending migrations.

use rusqlite::{Connection, Result as SqlResult};
use std::path::Path;

/// A single schema migration, applied in order and tracked in `schema_meta`.
struct Migration {
    version: u32,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    sql: "
        CREATE TABLE collections (
            collection_id INTEGER PRIMARY KEY,
            name          TEXT    NOT NULL,
            type          TEXT    NOT NULL,
            version       TEXT    NOT NULL,
            scope         TEXT    NOT NULL,
            namedargs     TEXT    NOT NULL,
            path          TEXT,
            doc           TEXT    NOT NULL,
            doc_format    TEXT    NOT NULL
        );

        CREATE TABLE keywords (
            keyword_id    INTEGER PRIMARY KEY,
            name          TEXT    NOT NULL,
            collection_id INTEGER NOT NULL REFERENCES collections(collection_id),
            doc           TEXT    NOT NULL,
            args          TEXT    NOT NULL
        );

        CREATE INDEX idx_collections_name ON collections(name);
        CREATE INDEX idx_keywords_name    ON keywords(name);
    ",
}];

/// Open (or create) the catalog database at `path`, enable WAL mode and
/// foreign keys, and apply any pending migrations.
pub fn open_db(path: &Path) -> SqlResult<Connection> {
    let conn = Connection::open(path)?;
    init_connection(conn)
}

/// In-memory catalog, mostly for tests and the default CLI configuration.
pub fn open_in_memory() -> SqlResult<Connection> {
    let conn = Connection::open_in_memory()?;
    init_connection(conn)
}

fn init_connection(conn: Connection) -> SqlResult<Connection> {
    // WAL mode for concurrent reads + single writer without blocking.
    // In-memory databases report "memory" here; that's fine.
    conn.pragma_update(None, "journal_mode", "wal")?;
    conn.pragma_update(None, "foreign_keys", "on")?;

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_meta (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );",
    )?;

    apply_migrations(&conn)?;
    Ok(conn)
}

/// Apply all migrations whose version hasn't been recorded yet.
fn apply_migrations(conn: &Connection) -> SqlResult<()> {
    let max_applied: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_meta",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    for m in MIGRATIONS {
        if m.version > max_applied {
            conn.execute_batch(m.sql)?;
            conn.execute("INSERT INTO schema_meta (version) VALUES (?1)", [m.version])?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_db_creates_tables() {
        let dir = TempDir::new().unwrap();
        let conn = open_db(&dir.path().join("catalog.db")).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert!(tables.contains(&"collections".to_string()));
        assert!(tables.contains(&"keywords".to_string()));
        assert!(tables.contains(&"schema_meta".to_string()));
    }

    #[test]
    fn name_columns_are_indexed() {
        let conn = open_in_memory().unwrap();
        let indexes: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='index'")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();

        assert!(indexes.contains(&"idx_collections_name".to_string()));
        assert!(indexes.contains(&"idx_keywords_name".to_string()));
    }

    #[test]
    fn migrations_are_idempotent() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("catalog.db");

        let conn1 = open_db(&db_path).unwrap();
        drop(conn1);
        let conn2 = open_db(&db_path).unwrap();

        let version_count: u32 = conn2
            .query_row("SELECT COUNT(*) FROM schema_meta", [], |row| row.get(0))
            .unwrap();
        assert_eq!(version_count, MIGRATIONS.len() as u32);
    }
}
