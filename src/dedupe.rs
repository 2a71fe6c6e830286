//! Duplicate guard for publication inserts.
//!
//! Publications are identified by citation key alone. The guard decides whether
//! a candidate may enter the store: it is rejected if and only if a stored
//! record has the identical key (exact, case-sensitive comparison). Other
//! fields play no part, and an existing record is never replaced.
//!
//! ## Atomicity
//!
//! The guard never reads before it writes. It issues a single
//! [`PublicationStore::insert_if_absent`] call and interprets the answer, so the
//! decision is exactly as atomic as the store makes that call. With the
//! bundled stores two concurrent submissions of the same key can never both be
//! accepted.
//!
//! ## Usage
//!
//! ```rust
//! use bibstore::dedupe::{Admission, DuplicateGuard};
//! use bibstore::{EntryTags, MemoryStore, Publication};
//!
//! let store = MemoryStore::new();
//! let guard = DuplicateGuard::new(&store);
//!
//! let publication = Publication {
//!     citation_key: "doe2020".to_string(),
//!     entry_type: "article".to_string(),
//!     entry_tags: EntryTags::default(),
//! };
//!
//! assert_eq!(guard.admit(&publication).unwrap(), Admission::Accepted);
//! assert_eq!(guard.admit(&publication).unwrap(), Admission::RejectedDuplicate);
//! ```

use crate::Publication;
use crate::error::StoreError;
use crate::store::{Insertion, PublicationStore};

/// The guard's decision for one candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The key was free and the record is now stored.
    Accepted,
    /// A record with the same key already exists; the candidate was discarded.
    RejectedDuplicate,
}

/// Admits publications into a store under the citation key uniqueness rule.
#[derive(Debug)]
pub struct DuplicateGuard<'s, S: PublicationStore> {
    store: &'s S,
}

impl<'s, S: PublicationStore> DuplicateGuard<'s, S> {
    /// Creates a guard in front of `store`.
    #[must_use]
    pub fn new(store: &'s S) -> Self {
        Self { store }
    }

    /// Submit a candidate.
    ///
    /// # Errors
    ///
    /// Propagates the store's `StoreError`, including `InvalidRecord` for a
    /// candidate the store refuses outright (for example an empty key).
    pub fn admit(&self, publication: &Publication) -> Result<Admission, StoreError> {
        match self.store.insert_if_absent(publication)? {
            Insertion::Inserted => Ok(Admission::Accepted),
            Insertion::AlreadyExists => Ok(Admission::RejectedDuplicate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStore, StoreResult};
    use crate::EntryTags;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn publication(key: &str, title: &str) -> Publication {
        Publication {
            citation_key: key.to_string(),
            entry_type: "article".to_string(),
            entry_tags: EntryTags {
                title: title.to_string(),
                ..EntryTags::default()
            },
        }
    }

    #[test]
    fn test_reject_iff_key_exists() {
        let store = MemoryStore::new();
        let guard = DuplicateGuard::new(&store);

        assert_eq!(guard.admit(&publication("a", "First")).unwrap(), Admission::Accepted);
        assert_eq!(guard.admit(&publication("b", "First")).unwrap(), Admission::Accepted);
        assert_eq!(
            guard.admit(&publication("a", "Other title")).unwrap(),
            Admission::RejectedDuplicate
        );
        assert_eq!(guard.admit(&publication("A", "First")).unwrap(), Admission::Accepted);
        assert_eq!(store.count().unwrap(), 3);
        assert_eq!(store.get_by_key("a").unwrap().unwrap().entry_tags.title, "First");
    }

    /// Records every call so the test can see which store operations ran.
    #[derive(Default)]
    struct RecordingStore {
        calls: Mutex<Vec<&'static str>>,
        inner: MemoryStore,
    }

    impl PublicationStore for RecordingStore {
        fn insert_if_absent(&self, publication: &Publication) -> StoreResult<Insertion> {
            self.calls.lock().unwrap().push("insert_if_absent");
            self.inner.insert_if_absent(publication)
        }

        fn get_all(&self) -> StoreResult<Vec<Publication>> {
            self.calls.lock().unwrap().push("get_all");
            self.inner.get_all()
        }
    }

    #[test]
    fn test_guard_only_uses_insert_if_absent() {
        let store = RecordingStore::default();
        let guard = DuplicateGuard::new(&store);
        guard.admit(&publication("a", "T")).unwrap();
        guard.admit(&publication("a", "T")).unwrap();
        assert_eq!(
            *store.calls.lock().unwrap(),
            vec!["insert_if_absent", "insert_if_absent"]
        );
    }

    #[test]
    fn test_store_errors_propagate() {
        let store = MemoryStore::new();
        let guard = DuplicateGuard::new(&store);
        let result = guard.admit(&publication("", "No key"));
        assert!(matches!(result, Err(StoreError::InvalidRecord(_))));
    }
}
