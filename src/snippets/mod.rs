//! Snippet catalog: saved code fragments with search, favorites and
//! usage tracking.
//!
//! The catalog keeps the full collection in memory, newest first, and
//! writes each snippet through the keyed store as it changes. Display
//! ordering is favorites first, then usage count descending; ties keep
//! their relative insertion order.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::models::{NewSnippet, Snippet};
use crate::store::{FileStore, StoreError};

/// Maximum number of snippet suggestions offered for a piece of code.
const MAX_SUGGESTIONS: usize = 3;

static WORD_SPLIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\W+").unwrap());

/// Errors from catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("no snippet with id {0}")]
    UnknownSnippet(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// In-memory view of the snippet collection, persisted per item.
pub struct SnippetCatalog {
    snippets: Vec<Snippet>,
    store: FileStore<Snippet>,
}

impl SnippetCatalog {
    /// Load the catalog from a store, newest first.
    pub fn load(store: FileStore<Snippet>) -> Result<Self, CatalogError> {
        let mut snippets = store.list()?;
        snippets.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(Self { snippets, store })
    }

    /// Create a snippet from a draft. The catalog assigns the id, zeroes
    /// the usage count and stamps the creation time.
    pub fn add(&mut self, draft: NewSnippet) -> Result<&Snippet, CatalogError> {
        let snippet = Snippet {
            id: uuid::Uuid::new_v4().to_string(),
            title: draft.title,
            code: draft.code,
            language: draft.language,
            tags: draft.tags,
            description: draft.description,
            fixes: draft.fixes,
            usage_count: 0,
            created_at: chrono::Utc::now(),
            is_favorite: draft.is_favorite,
        };
        self.store.put(&snippet.id, &snippet)?;
        self.snippets.insert(0, snippet);
        Ok(&self.snippets[0])
    }

    pub fn get(&self, id: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }

    /// Delete a snippet from the catalog and the store.
    pub fn remove(&mut self, id: &str) -> Result<(), CatalogError> {
        let pos = self
            .snippets
            .iter()
            .position(|s| s.id == id)
            .ok_or_else(|| CatalogError::UnknownSnippet(id.to_string()))?;
        self.store.delete(id)?;
        self.snippets.remove(pos);
        Ok(())
    }

    /// Flip the favorite flag and persist the change.
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, CatalogError> {
        let snippet = self.get_mut(id)?;
        snippet.is_favorite = !snippet.is_favorite;
        let now_favorite = snippet.is_favorite;
        let snapshot = snippet.clone();
        self.store.put(id, &snapshot)?;
        Ok(now_favorite)
    }

    /// Count one use of a snippet (a copy action) and persist it.
    pub fn record_usage(&mut self, id: &str) -> Result<u64, CatalogError> {
        let snippet = self.get_mut(id)?;
        snippet.usage_count += 1;
        let count = snippet.usage_count;
        let snapshot = snippet.clone();
        self.store.put(id, &snapshot)?;
        Ok(count)
    }

    /// Every snippet in display order.
    pub fn all(&self) -> Vec<&Snippet> {
        let mut out: Vec<&Snippet> = self.snippets.iter().collect();
        sort_for_display(&mut out);
        out
    }

    /// Filter by free-text query and tag, in display order.
    ///
    /// The query matches case-insensitively against title, description
    /// and code; an empty query matches everything. The tag filter is
    /// conjunctive with the query, with `"all"` disabling it.
    pub fn search(&self, query: &str, tag: &str) -> Vec<&Snippet> {
        let needle = query.to_lowercase();
        let mut out: Vec<&Snippet> = self
            .snippets
            .iter()
            .filter(|s| {
                let text_match = needle.is_empty()
                    || s.title.to_lowercase().contains(&needle)
                    || s.description.to_lowercase().contains(&needle)
                    || s.code.to_lowercase().contains(&needle);
                let tag_match = tag == "all" || s.tags.iter().any(|t| t == tag);
                text_match && tag_match
            })
            .collect();
        sort_for_display(&mut out);
        out
    }

    /// Every distinct tag across the catalog, sorted.
    pub fn tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = self
            .snippets
            .iter()
            .flat_map(|s| s.tags.iter().cloned())
            .collect();
        tags.sort();
        tags.dedup();
        tags
    }

    /// Suggest catalog snippets relevant to a piece of code.
    ///
    /// A snippet qualifies when it is in the same language and at least
    /// one word of its description appears among the code's tokens.
    /// Matching is exact token membership, so "data" does not match code
    /// that only mentions "database". A crude heuristic, kept as-is. At
    /// most three suggestions, best catalog position first.
    pub fn suggest(&self, code: &str, language: &str) -> Vec<&Snippet> {
        let code_lower = code.to_lowercase();
        let code_tokens: HashSet<&str> = WORD_SPLIT
            .split(&code_lower)
            .filter(|token| !token.is_empty())
            .collect();
        self.all()
            .into_iter()
            .filter(|s| {
                s.language == language
                    && WORD_SPLIT
                        .split(&s.description.to_lowercase())
                        .any(|word| !word.is_empty() && code_tokens.contains(word))
            })
            .take(MAX_SUGGESTIONS)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.snippets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snippets.is_empty()
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Snippet, CatalogError> {
        self.snippets
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or_else(|| CatalogError::UnknownSnippet(id.to_string()))
    }
}

/// Favorites first, then usage count descending. The sort is stable, so
/// equal entries keep their newest-first catalog order.
fn sort_for_display(snippets: &mut [&Snippet]) {
    snippets.sort_by(|a, b| {
        b.is_favorite
            .cmp(&a.is_favorite)
            .then(b.usage_count.cmp(&a.usage_count))
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(dir: &std::path::Path) -> SnippetCatalog {
        SnippetCatalog::load(FileStore::new_with_dir(dir.to_path_buf())).unwrap()
    }

    fn draft(title: &str, language: &str, description: &str, tags: &[&str]) -> NewSnippet {
        NewSnippet {
            title: title.into(),
            code: format!("// {title}"),
            language: language.into(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            description: description.into(),
            fixes: String::new(),
            is_favorite: false,
        }
    }

    #[test]
    fn add_assigns_id_and_zero_usage() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = catalog(dir.path());
        let snippet = c.add(draft("t", "rust", "d", &[])).unwrap();
        assert!(!snippet.id.is_empty());
        assert_eq!(snippet.usage_count, 0);
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn catalog_survives_reload() {
        let dir = tempfile::tempdir().unwrap();
        let id = {
            let mut c = catalog(dir.path());
            c.add(draft("kept", "rust", "d", &[])).unwrap().id.clone()
        };
        let c = catalog(dir.path());
        assert_eq!(c.get(&id).unwrap().title, "kept");
    }

    #[test]
    fn remove_unknown_id_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = catalog(dir.path());
        assert!(matches!(
            c.remove("missing"),
            Err(CatalogError::UnknownSnippet(_))
        ));
    }

    #[test]
    fn toggle_favorite_flips_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = catalog(dir.path());
        let id = c.add(draft("t", "rust", "d", &[])).unwrap().id.clone();

        assert!(c.toggle_favorite(&id).unwrap());
        assert!(!c.toggle_favorite(&id).unwrap());

        c.toggle_favorite(&id).unwrap();
        let reloaded = catalog(dir.path());
        assert!(reloaded.get(&id).unwrap().is_favorite);
    }

    #[test]
    fn record_usage_increments_monotonically() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = catalog(dir.path());
        let id = c.add(draft("t", "rust", "d", &[])).unwrap().id.clone();
        assert_eq!(c.record_usage(&id).unwrap(), 1);
        assert_eq!(c.record_usage(&id).unwrap(), 2);
        assert_eq!(catalog(dir.path()).get(&id).unwrap().usage_count, 2);
    }

    #[test]
    fn search_matches_title_description_and_code_case_insensitively() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = catalog(dir.path());
        c.add(draft("Null guard", "javascript", "Fixes null pointer access", &[]))
            .unwrap();
        c.add(draft("Loop sum", "javascript", "Accumulate totals", &[]))
            .unwrap();

        let hits = c.search("fix", "all");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Null guard");

        // Code text is searched too.
        assert_eq!(c.search("loop sum", "all").len(), 1);
    }

    #[test]
    fn search_tag_filter_is_conjunctive() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = catalog(dir.path());
        c.add(draft("a", "rust", "error handling", &["errors"]))
            .unwrap();
        c.add(draft("b", "rust", "error messages", &["logging"]))
            .unwrap();

        assert_eq!(c.search("error", "all").len(), 2);
        let hits = c.search("error", "errors");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "a");
        assert!(c.search("nothing-matches", "errors").is_empty());
    }

    #[test]
    fn display_order_is_favorites_then_usage_then_insertion() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = catalog(dir.path());
        let plain = c.add(draft("plain", "rust", "d", &[])).unwrap().id.clone();
        let used = c.add(draft("used", "rust", "d", &[])).unwrap().id.clone();
        let fav = c.add(draft("fav", "rust", "d", &[])).unwrap().id.clone();

        c.record_usage(&used).unwrap();
        c.record_usage(&used).unwrap();
        c.toggle_favorite(&fav).unwrap();

        let titles: Vec<&str> = c.all().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["fav", "used", "plain"]);
        let _ = (plain, used, fav);
    }

    #[test]
    fn equal_snippets_keep_relative_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = catalog(dir.path());
        c.add(draft("older", "rust", "d", &[])).unwrap();
        c.add(draft("newer", "rust", "d", &[])).unwrap();

        // Neither favorite nor used: newest-first insertion order holds.
        let titles: Vec<&str> = c.all().iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["newer", "older"]);
    }

    #[test]
    fn suggest_requires_language_and_description_overlap() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = catalog(dir.path());
        c.add(draft("a", "python", "optimize database queries", &[]))
            .unwrap();
        c.add(draft("b", "python", "sanitize user input", &[]))
            .unwrap();
        c.add(draft("c", "rust", "optimize database queries", &[]))
            .unwrap();

        let code = "def run():\n    database.query(sql)";
        let hits = c.suggest(code, "python");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "a");
    }

    #[test]
    fn suggest_caps_at_three() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = catalog(dir.path());
        for i in 0..5 {
            c.add(draft(&format!("s{i}"), "go", "handle timeout retries", &[]))
                .unwrap();
        }
        assert_eq!(c.suggest("ctx timeout exceeded", "go").len(), 3);
    }

    #[test]
    fn suggest_matches_whole_tokens_not_substrings() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = catalog(dir.path());
        // "data" is a substring of "database" but not a token of the code.
        c.add(draft("s", "python", "optimize data access", &[]))
            .unwrap();
        assert!(c.suggest("database.query(sql)", "python").is_empty());
    }

    #[test]
    fn suggest_counts_short_shared_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = catalog(dir.path());
        c.add(draft("s", "go", "fix a bug", &[])).unwrap();
        assert_eq!(c.suggest("fix the bug in the code", "go").len(), 1);
    }

    #[test]
    fn tags_are_deduplicated_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let mut c = catalog(dir.path());
        c.add(draft("a", "rust", "d", &["perf", "errors"])).unwrap();
        c.add(draft("b", "rust", "d", &["errors"])).unwrap();
        assert_eq!(c.tags(), vec!["errors".to_string(), "perf".to_string()]);
    }
}
