//! # Catalog Store
//!
//! Durable relational storage for keyword collections.
//!
//! ## Layout
//!
//! ```text
//! collections ──< keywords
//!      │             │
//!      └── name ─────┴── name   (indexed, matched with LIKE)
//! ```
//!
//! Two entities: a Collection is one ingested artifact, a Keyword is one
//! documented operation owned by exactly one Collection. Reads take glob
//! patterns (`*`, `?`, escapes, `^`/`$` anchors) which [`pattern`]
//! translates to case-insensitive LIKE predicates.

mod error;
mod query;
mod schema;
mod store;

pub mod pattern;

pub use error::{Result, StoreError};
pub use query::{
    Collection, CollectionKeywords, CollectionSummary, Keyword, KeywordRow, KeywordSummary,
    SearchHit, SearchMode,
};
pub use store::{CatalogStore, NewCollection};
