//! Storage layer abstraction and implementations.
//!
//! The pipeline and the query engine only ever talk to a [`PublicationStore`].
//! Two backends are provided: [`MemoryStore`] for tests and embedding, and
//! [`JsonFileStore`] which keeps the whole collection in one JSON document.
//!
//! # Atomicity
//!
//! [`PublicationStore::insert_if_absent`] is the only write operation and each
//! backend must make its check-then-insert atomic. Two concurrent inserts with
//! the same citation key must never both report [`Insertion::Inserted`].

pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::Publication;
use crate::error::StoreError;
use crate::query::{SearchScope, matches_year};

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Outcome of [`PublicationStore::insert_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The record was stored.
    Inserted,
    /// A record with the same citation key already exists; nothing changed.
    AlreadyExists,
}

/// Trait for publication storage backends.
///
/// Only `insert_if_absent` and `get_all` are required. The remaining reads
/// have scanning defaults that backends with indexes may override; overrides
/// must return results in `get_all` order.
pub trait PublicationStore: Send + Sync {
    /// Store the publication unless its citation key is already taken.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::InvalidRecord` for records with an empty citation
    /// key or entry type, or other `StoreError` variants when the backend fails.
    fn insert_if_absent(&self, publication: &Publication) -> StoreResult<Insertion>;

    /// Every stored publication, in store-native order.
    fn get_all(&self) -> StoreResult<Vec<Publication>>;

    /// The publication with exactly this citation key, if any.
    fn get_by_key(&self, citation_key: &str) -> StoreResult<Option<Publication>> {
        Ok(self
            .get_all()?
            .into_iter()
            .find(|p| p.citation_key == citation_key))
    }

    /// Publications whose `year` tag equals `year` exactly.
    fn filter_by_year(&self, year: &str) -> StoreResult<Vec<Publication>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|p| matches_year(p, year))
            .collect())
    }

    /// Publications containing `keyword`, case-insensitively, within `scope`.
    fn filter_by_keyword(
        &self,
        keyword: &str,
        scope: SearchScope,
    ) -> StoreResult<Vec<Publication>> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|p| scope.matches(p, keyword))
            .collect())
    }

    /// Number of stored publications.
    fn count(&self) -> StoreResult<usize> {
        Ok(self.get_all()?.len())
    }
}

/// Reject records the store must never hold.
pub(crate) fn ensure_insertable(publication: &Publication) -> StoreResult<()> {
    if publication.citation_key.is_empty() {
        return Err(StoreError::InvalidRecord("missing citationKey".into()));
    }
    if publication.entry_type.is_empty() {
        return Err(StoreError::InvalidRecord("missing entryType".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EntryTags;

    #[test]
    fn test_ensure_insertable() {
        let mut publication = Publication {
            citation_key: "doe2020".to_string(),
            entry_type: "article".to_string(),
            entry_tags: EntryTags::default(),
        };
        assert!(ensure_insertable(&publication).is_ok());

        publication.entry_type.clear();
        assert!(matches!(
            ensure_insertable(&publication),
            Err(StoreError::InvalidRecord(_))
        ));

        publication.citation_key.clear();
        let error = ensure_insertable(&publication).unwrap_err();
        assert_eq!(
            error.to_string(),
            "Invalid publication format: missing citationKey"
        );
    }
}
