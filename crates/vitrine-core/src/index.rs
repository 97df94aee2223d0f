//! In-memory search index over image names.
//!
//! The index answers "which record IDs match query string Q" with
//! case-insensitive substring containment at any position -- not just
//! prefixes. There is no ranking: matches come back as an unordered set and
//! presentation order belongs to the render coordinator.
//!
//! The index is built once from the full record store and never updated
//! incrementally; the store is immutable for the session, so the index
//! always reflects exactly its contents.

use crate::store::RecordStore;
use crate::types::ImageId;
use std::collections::HashSet;
use tracing::{debug, info};

/// Substring index keyed by record ID, indexed on the display name.
#[derive(Debug)]
pub struct SearchIndex {
    /// (id, lowercase name) pairs, lowered once at build
    entries: Vec<(ImageId, String)>,
}

impl SearchIndex {
    /// Index every record's display name.
    ///
    /// The store has already validated that every record carries a name, so
    /// no entry is ever indexed under an empty key.
    pub fn build(store: &RecordStore) -> Self {
        let entries: Vec<(ImageId, String)> = store
            .iter()
            .map(|record| (record.id, record.name_lower.clone()))
            .collect();

        info!(entries = entries.len(), "Search index built");

        SearchIndex { entries }
    }

    /// Number of indexed names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Return the IDs of all records whose name contains `text` as a
    /// case-insensitive substring.
    ///
    /// An empty pattern matches everything here, but callers must not rely
    /// on that: the filter logic owns the empty-query path and
    /// short-circuits before querying.
    pub fn query(&self, text: &str) -> HashSet<ImageId> {
        let needle = text.to_lowercase();

        let matches: HashSet<ImageId> = self
            .entries
            .iter()
            .filter(|(_, name)| name.contains(&needle))
            .map(|(id, _)| *id)
            .collect();

        debug!(query = %text, matches = matches.len(), "Index queried");

        matches
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageRecord;
    use chrono::{TimeZone, Utc};

    fn make_store(names: &[(u64, &str)]) -> RecordStore {
        let records = names
            .iter()
            .map(|&(id, name)| {
                ImageRecord::new(
                    ImageId::new(id),
                    name,
                    format!("/images/{}", name),
                    640,
                    480,
                    Utc.timestamp_opt(1_600_000_000, 0).unwrap(),
                )
            })
            .collect();
        RecordStore::from_records(records).unwrap()
    }

    fn ids(set: &HashSet<ImageId>) -> Vec<u64> {
        let mut v: Vec<u64> = set.iter().map(|id| id.as_u64()).collect();
        v.sort_unstable();
        v
    }

    #[test]
    fn test_substring_any_position() {
        let store = make_store(&[(1, "cat.png"), (2, "dog.png"), (3, "catalog.png")]);
        let index = SearchIndex::build(&store);

        // matches mid-name, not just prefixes
        assert_eq!(ids(&index.query("atal")), vec![3]);
        assert_eq!(ids(&index.query("og")), vec![2, 3]);
    }

    #[test]
    fn test_case_insensitive() {
        let store = make_store(&[(1, "Ferris.PNG"), (2, "crab.jpg")]);
        let index = SearchIndex::build(&store);

        assert_eq!(ids(&index.query("FERRIS")), vec![1]);
        assert_eq!(ids(&index.query("ferris")), vec![1]);
        assert_eq!(ids(&index.query("png")), vec![1]);
    }

    #[test]
    fn test_no_match() {
        let store = make_store(&[(1, "cat.png")]);
        let index = SearchIndex::build(&store);

        assert!(index.query("zebra").is_empty());
    }

    #[test]
    fn test_gallery_scenario() {
        // records [{1,cat.png},{2,dog.png},{3,catalog.png}], query "cat" => {1,3}
        let store = make_store(&[(1, "cat.png"), (2, "dog.png"), (3, "catalog.png")]);
        let index = SearchIndex::build(&store);

        assert_eq!(ids(&index.query("cat")), vec![1, 3]);
    }

    #[test]
    fn test_index_reflects_store() {
        let store = make_store(&[(1, "a.png"), (2, "b.png"), (3, "c.png")]);
        let index = SearchIndex::build(&store);
        assert_eq!(index.len(), store.len());
    }
}
