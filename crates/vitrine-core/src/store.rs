//! The authoritative in-memory record store.
//!
//! The store holds the full list of image records fetched from the backend,
//! validated once at the boundary and immutable afterwards. Everything
//! downstream -- the search index, the render coordinator, the detail view
//! -- reads from it by reference.
//!
//! ## Architecture
//!
//! - A `Vec<ImageRecord>` keeps records in backend order, which is also the
//!   render order
//! - A `HashMap<ImageId, usize>` maps IDs to indices for O(1) lookups
//!
//! Validation rejects the whole batch on the first malformed record rather
//! than loading partially, preserving the "index reflects store" invariant.

use crate::error::{Result, VitrineError};
use crate::types::{ImageId, ImageRecord};
use std::collections::HashMap;
use tracing::{debug, info};

/// Immutable collection of image records for one page load.
#[derive(Debug)]
pub struct RecordStore {
    /// All records in backend order
    records: Vec<ImageRecord>,

    /// Map from record ID to index in `records`
    id_to_index: HashMap<ImageId, usize>,
}

impl RecordStore {
    /// Build a store from a fetched batch, validating every record.
    ///
    /// Fails on the first duplicate `id` or empty `name`; no partial store
    /// is ever constructed.
    pub fn from_records(mut records: Vec<ImageRecord>) -> Result<Self> {
        let mut id_to_index = HashMap::with_capacity(records.len());

        for (idx, record) in records.iter_mut().enumerate() {
            if record.name.is_empty() {
                return Err(VitrineError::MissingName { id: record.id });
            }
            record.init_cache();

            if id_to_index.insert(record.id, idx).is_some() {
                return Err(VitrineError::DuplicateId { id: record.id });
            }
            debug!(id = %record.id, name = %record.name, "Record accepted");
        }

        info!(records = records.len(), "Record store loaded");

        Ok(RecordStore {
            records,
            id_to_index,
        })
    }

    /// Number of records in the store.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by its ID.
    pub fn get(&self, id: ImageId) -> Option<&ImageRecord> {
        self.id_to_index.get(&id).map(|&idx| &self.records[idx])
    }

    /// Iterate records in backend (render) order.
    pub fn iter(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records.iter()
    }

    /// All record IDs in backend order.
    pub fn ids(&self) -> Vec<ImageId> {
        self.records.iter().map(|r| r.id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn record(id: u64, name: &str) -> ImageRecord {
        ImageRecord::new(
            ImageId::new(id),
            name,
            format!("/images/{}", name),
            640,
            480,
            Utc.timestamp_opt(1_600_000_000, 0).unwrap(),
        )
    }

    #[test]
    fn test_load_and_lookup() {
        let store =
            RecordStore::from_records(vec![record(1, "cat.png"), record(2, "dog.png")]).unwrap();

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(ImageId::new(2)).unwrap().name, "dog.png");
        assert!(store.get(ImageId::new(3)).is_none());
    }

    #[test]
    fn test_preserves_backend_order() {
        let store = RecordStore::from_records(vec![
            record(3, "c.png"),
            record(1, "a.png"),
            record(2, "b.png"),
        ])
        .unwrap();

        let ids: Vec<u64> = store.ids().iter().map(|id| id.as_u64()).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_duplicate_id_rejects_batch() {
        let result =
            RecordStore::from_records(vec![record(1, "cat.png"), record(1, "dog.png")]);
        assert!(matches!(
            result,
            Err(VitrineError::DuplicateId { id }) if id == ImageId::new(1)
        ));
    }

    #[test]
    fn test_missing_name_rejects_batch() {
        let result = RecordStore::from_records(vec![record(1, "cat.png"), record(2, "")]);
        assert!(matches!(result, Err(VitrineError::MissingName { .. })));
    }

    #[test]
    fn test_lowercase_cache_initialized() {
        let mut raw = record(1, "MiXeD.PNG");
        raw.name_lower.clear(); // simulate a freshly deserialized record
        let store = RecordStore::from_records(vec![raw]).unwrap();
        assert_eq!(store.get(ImageId::new(1)).unwrap().name_lower, "mixed.png");
    }
}
