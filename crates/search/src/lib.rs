//! # Search/Query Engine
//!
//! Read-only façade over the catalog store. Adds the two query-string
//! modifiers the store itself doesn't know about:
//!
//! - `name:` prefix — match keyword names only, not documentation.
//! - `in:<glob>` token — restrict hits to collections whose name matches
//!   the glob, e.g. `screenshot in:Selenium*`.

mod query;

pub use query::QueryEngine;
