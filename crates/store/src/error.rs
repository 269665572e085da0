use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQL error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A stored argument list failed to deserialize. This is data
    /// corruption and is never recovered into a default.
    #[error("corrupt argument list for keyword `{name}`: {source}")]
    CorruptArgs {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("store lock poisoned")]
    LockPoisoned,
}
