use hub_store::{
    CatalogStore, Collection, CollectionKeywords, CollectionSummary, Keyword, KeywordRow, Result,
    SearchHit, SearchMode,
};
use std::collections::HashSet;
use std::sync::Arc;

/// Read-only query engine over the catalog.
pub struct QueryEngine {
    store: Arc<CatalogStore>,
}

/// A user query after modifier parsing.
#[derive(Debug, PartialEq, Eq)]
struct ParsedQuery {
    pattern: String,
    mode: SearchMode,
    scope: Option<String>,
}

impl QueryEngine {
    pub fn new(store: Arc<CatalogStore>) -> Self {
        Self { store }
    }

    /// Pattern search over keyword names and docs, honoring the `name:`
    /// and `in:` modifiers.
    pub fn search(&self, query: &str) -> Result<Vec<SearchHit>> {
        let parsed = parse_query(query);
        log::debug!(
            "search pattern={:?} mode={:?} scope={:?}",
            parsed.pattern,
            parsed.mode,
            parsed.scope
        );
        let mut hits = self.store.search(&parsed.pattern, parsed.mode)?;
        if let Some(scope) = parsed.scope {
            let in_scope: HashSet<i64> = self
                .store
                .list_collections(&scope, "*")?
                .into_iter()
                .map(|collection| collection.collection_id)
                .collect();
            hits.retain(|hit| in_scope.contains(&hit.collection_id));
        }
        Ok(hits)
    }

    pub fn list_collections(
        &self,
        name_pattern: &str,
        kind_pattern: &str,
    ) -> Result<Vec<CollectionSummary>> {
        self.store.list_collections(name_pattern, kind_pattern)
    }

    pub fn get_collection(&self, collection_id: i64) -> Result<Option<Collection>> {
        self.store.get_collection(collection_id)
    }

    pub fn keyword_hierarchy(&self, name_pattern: &str) -> Result<Vec<CollectionKeywords>> {
        self.store.keyword_hierarchy(name_pattern)
    }

    pub fn keywords_in_collection(&self, collection_id: i64) -> Result<Vec<KeywordRow>> {
        self.store.keywords_in_collection(collection_id)
    }

    pub fn get_keyword(&self, collection_id: i64, name_pattern: &str) -> Result<Option<Keyword>> {
        self.store.get_keyword(collection_id, name_pattern)
    }
}

/// Split a raw query into pattern, mode, and collection scope.
///
/// A leading `name:` selects name-only matching. Any `in:<glob>` token is
/// lifted out as the scope; the remaining tokens, joined, form the search
/// pattern. An empty remainder matches everything.
fn parse_query(query: &str) -> ParsedQuery {
    let mut rest = query.trim();
    let mut mode = SearchMode::Both;
    if let Some(stripped) = strip_prefix_ignore_case(rest, "name:") {
        mode = SearchMode::Name;
        rest = stripped.trim_start();
    }

    let mut scope = None;
    let mut parts: Vec<&str> = Vec::new();
    for token in rest.split_whitespace() {
        match strip_prefix_ignore_case(token, "in:") {
            Some(name) if !name.is_empty() => scope = Some(name.to_string()),
            _ => parts.push(token),
        }
    }

    let pattern = if parts.is_empty() {
        "*".to_string()
    } else {
        parts.join(" ")
    };
    ParsedQuery {
        pattern,
        mode,
        scope,
    }
}

fn strip_prefix_ignore_case<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let head = text.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix)
        .then(|| &text[prefix.len()..])
}
