//! In-memory publication store.

use super::{Insertion, PublicationStore, StoreResult, ensure_insertable};
use crate::Publication;
use crate::error::StoreError;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

/// Publications held in insertion order behind a lock.
///
/// The uniqueness check and the push happen under one write lock, so
/// concurrent inserts of the same key are serialized.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<Vec<Publication>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Vec<Publication>>> {
        self.records
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Vec<Publication>>> {
        self.records
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

impl PublicationStore for MemoryStore {
    fn insert_if_absent(&self, publication: &Publication) -> StoreResult<Insertion> {
        ensure_insertable(publication)?;

        let mut records = self.write()?;
        if records
            .iter()
            .any(|p| p.citation_key == publication.citation_key)
        {
            return Ok(Insertion::AlreadyExists);
        }

        records.push(publication.clone());
        debug!(citation_key = %publication.citation_key, total = records.len(), "stored publication");
        Ok(Insertion::Inserted)
    }

    fn get_all(&self) -> StoreResult<Vec<Publication>> {
        Ok(self.read()?.clone())
    }

    fn get_by_key(&self, citation_key: &str) -> StoreResult<Option<Publication>> {
        Ok(self
            .read()?
            .iter()
            .find(|p| p.citation_key == citation_key)
            .cloned())
    }

    fn count(&self) -> StoreResult<usize> {
        Ok(self.read()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntryTags;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::thread;

    fn publication(key: &str, year: &str) -> Publication {
        Publication {
            citation_key: key.to_string(),
            entry_type: "article".to_string(),
            entry_tags: EntryTags {
                year: year.to_string(),
                ..EntryTags::default()
            },
        }
    }

    #[test]
    fn test_insert_then_duplicate() {
        let store = MemoryStore::new();
        let first = publication("doe2020", "2020");

        assert_eq!(store.insert_if_absent(&first).unwrap(), Insertion::Inserted);

        let mut changed = first.clone();
        changed.entry_tags.title = "Different".to_string();
        assert_eq!(
            store.insert_if_absent(&changed).unwrap(),
            Insertion::AlreadyExists
        );

        // The first record is never overwritten
        assert_eq!(store.get_by_key("doe2020").unwrap(), Some(first));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let store = MemoryStore::new();
        store.insert_if_absent(&publication("Doe2020", "2020")).unwrap();
        assert_eq!(
            store.insert_if_absent(&publication("doe2020", "2020")).unwrap(),
            Insertion::Inserted
        );
        assert_eq!(store.get_by_key("DOE2020").unwrap(), None);
    }

    #[test]
    fn test_get_all_preserves_insertion_order() {
        let store = MemoryStore::new();
        for key in ["c", "a", "b"] {
            store.insert_if_absent(&publication(key, "2020")).unwrap();
        }
        let keys: Vec<_> = store
            .get_all()
            .unwrap()
            .into_iter()
            .map(|p| p.citation_key)
            .collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_filter_by_year_uses_default_scan() {
        let store = MemoryStore::new();
        store.insert_if_absent(&publication("a", "2020")).unwrap();
        store.insert_if_absent(&publication("b", "2019")).unwrap();
        store.insert_if_absent(&publication("c", "2020")).unwrap();

        let keys: Vec<_> = store
            .filter_by_year("2020")
            .unwrap()
            .into_iter()
            .map(|p| p.citation_key)
            .collect();
        assert_eq!(keys, vec!["a", "c"]);
        assert!(store.filter_by_year("1999").unwrap().is_empty());
    }

    #[test]
    fn test_invalid_record_is_rejected() {
        let store = MemoryStore::new();
        let result = store.insert_if_absent(&publication("", "2020"));
        assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_concurrent_inserts_of_same_key() {
        let store = Arc::new(MemoryStore::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || store.insert_if_absent(&publication("race", "2020")).unwrap())
            })
            .collect();

        let inserted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|outcome| *outcome == Insertion::Inserted)
            .count();

        assert_eq!(inserted, 1);
        assert_eq!(store.count().unwrap(), 1);
    }
}
