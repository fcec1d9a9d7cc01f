//! In-memory, case-insensitive substring index over entry titles and bodies.
//!
//! The index is owned by [`EntryStore`](super::storage::EntryStore), which
//! refreshes it on every listing, write and delete. It never touches disk.

use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq)]
struct IndexedText {
    title: String,
    body: String,
}

/// Lower-cased `(title, body)` per entry ID.
#[derive(Debug, Clone, Default)]
pub struct SearchIndex {
    entries: HashMap<String, IndexedText>,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops everything and indexes `items` as `(id, title, body)` triples.
    pub fn rebuild<I, S>(&mut self, items: I)
    where
        I: IntoIterator<Item = (S, S, S)>,
        S: AsRef<str>,
    {
        self.entries.clear();
        for (id, title, body) in items {
            self.update(id.as_ref(), title.as_ref(), body.as_ref());
        }
    }

    /// Replaces the cached text for `id`.
    pub fn update(&mut self, id: &str, title: &str, body: &str) {
        self.entries.insert(
            id.to_string(),
            IndexedText {
                title: title.to_lowercase(),
                body: body.to_lowercase(),
            },
        );
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Evicts every ID not in `live`, returning how many were dropped.
    pub fn retain_ids(&mut self, live: &HashSet<String>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|id, _| live.contains(id));
        before - self.entries.len()
    }

    /// IDs whose title or body contains `query`, ignoring case.
    ///
    /// The empty query matches every entry; callers that mean "no filter"
    /// should not call this with a blank string.
    pub fn search(&self, query: &str) -> HashSet<String> {
        let q = query.to_lowercase();
        self.entries
            .iter()
            .filter(|(_, text)| text.title.contains(&q) || text.body.contains(&q))
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_is_case_insensitive_over_title_and_body() {
        let mut index = SearchIndex::new();
        index.update("a", "Rust Notes", "ownership and BORROWING");
        index.update("b", "Groceries", "milk, eggs");

        assert_eq!(index.search("rust"), HashSet::from(["a".to_string()]));
        assert_eq!(index.search("Borrow"), HashSet::from(["a".to_string()]));
        assert_eq!(index.search("EGGS"), HashSet::from(["b".to_string()]));
        assert!(index.search("python").is_empty());
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let mut index = SearchIndex::new();
        index.update("a", "one", "");
        index.update("b", "", "");
        assert_eq!(index.search("").len(), 2);
    }

    #[test]
    fn test_update_overwrites_and_remove_evicts() {
        let mut index = SearchIndex::new();
        index.update("a", "old title", "");
        index.update("a", "new title", "");
        assert!(index.search("old").is_empty());
        assert_eq!(index.search("new").len(), 1);

        assert!(index.remove("a"));
        assert!(!index.remove("a"));
        assert!(index.search("new").is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn test_rebuild_replaces_contents() {
        let mut index = SearchIndex::new();
        index.update("stale", "gone", "");
        index.rebuild([("x", "Fresh", "body")]);
        assert!(!index.contains("stale"));
        assert!(index.contains("x"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_retain_ids() {
        let mut index = SearchIndex::new();
        index.update("a", "", "");
        index.update("b", "", "");
        let live = HashSet::from(["a".to_string()]);
        assert_eq!(index.retain_ids(&live), 1);
        assert!(index.contains("a"));
        assert!(!index.contains("b"));
    }
}
