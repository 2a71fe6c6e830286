//! Read-only queries over a publication store.
//!
//! [`QueryEngine`] serves the read patterns: everything, one record by citation
//! key, records of one year, and records containing a keyword. It holds no
//! state of its own besides its configuration, so it can be created per call.
//!
//! # Keyword search
//!
//! A keyword matches when it occurs, case-insensitively, as a substring of a
//! record's searchable text. Which fields make up that text is decided by
//! [`SearchScope`]; the default searches all entry tags (author, year, title,
//! journal, publisher and tags). Only field values are searched, never field
//! names.
//!
//! # Example
//!
//! ```
//! use bibstore::{Ingestor, MemoryStore, QueryEngine};
//!
//! let store = MemoryStore::new();
//! Ingestor::new(&store)
//!     .ingest("@book{roe2019, title = {A Book}, publisher = {Elsevier}, year = {2019}}")
//!     .unwrap();
//!
//! let engine = QueryEngine::new(&store);
//! assert_eq!(engine.by_keyword("elsevier").unwrap().len(), 1);
//! assert_eq!(engine.by_year("2019").unwrap()[0].citation_key, "roe2019");
//! assert!(engine.by_key("missing").unwrap().is_none());
//! ```

use crate::Publication;
use crate::error::StoreError;
use crate::store::PublicationStore;
use crate::utils::fold_case;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

/// Which parts of a record a keyword search reads.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SearchScope {
    /// The six entry tag values.
    #[default]
    EntryTags,
    /// The entry tags plus the citation key and entry type.
    WholeRecord,
}

impl SearchScope {
    /// The text a keyword is matched against: field values joined by newlines.
    pub fn searchable_text(self, publication: &Publication) -> String {
        let tags = &publication.entry_tags;
        let tag_values = [
            &tags.author,
            &tags.year,
            &tags.title,
            &tags.journal,
            &tags.publisher,
            &tags.tags,
        ];

        match self {
            SearchScope::EntryTags => tag_values.iter().join("\n"),
            SearchScope::WholeRecord => [&publication.citation_key, &publication.entry_type]
                .into_iter()
                .chain(tag_values)
                .join("\n"),
        }
    }

    /// Case-insensitive substring match. An empty keyword matches everything.
    pub fn matches(self, publication: &Publication, keyword: &str) -> bool {
        fold_case(&self.searchable_text(publication)).contains(&fold_case(keyword))
    }
}

/// Exact, case-sensitive match on the `year` tag.
pub fn matches_year(publication: &Publication, year: &str) -> bool {
    publication.entry_tags.year == year
}

/// Query configuration.
#[derive(Debug, Clone, Default)]
pub struct QueryConfig {
    /// Fields read by keyword searches.
    pub scope: SearchScope,
}

/// Combined year and keyword constraint.
///
/// Empty or blank values impose no constraint, and the keyword is trimmed, so
/// a filter built straight from user input fields behaves as expected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicationFilter {
    pub year: Option<String>,
    pub keyword: Option<String>,
}

impl PublicationFilter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn year(mut self, year: impl Into<String>) -> Self {
        self.year = Some(year.into());
        self
    }

    #[must_use]
    pub fn keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    fn active_year(&self) -> Option<&str> {
        self.year.as_deref().filter(|y| !y.is_empty())
    }

    fn active_keyword(&self) -> Option<&str> {
        self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }
}

/// Read-only query engine over a borrowed store.
#[derive(Debug)]
pub struct QueryEngine<'s, S: PublicationStore> {
    store: &'s S,
    config: QueryConfig,
}

impl<'s, S: PublicationStore> QueryEngine<'s, S> {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            config: QueryConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// The keyword search scope in effect.
    pub fn scope(&self) -> SearchScope {
        self.config.scope
    }

    /// Every stored publication, in store order.
    pub fn all(&self) -> Result<Vec<Publication>, StoreError> {
        self.store.get_all()
    }

    /// The publication with exactly this citation key.
    ///
    /// `Ok(None)` means no such record; store failures are reported as `Err`.
    pub fn by_key(&self, citation_key: &str) -> Result<Option<Publication>, StoreError> {
        self.store.get_by_key(citation_key)
    }

    /// Publications whose year tag equals `year`. No matches is an empty list.
    pub fn by_year(&self, year: &str) -> Result<Vec<Publication>, StoreError> {
        self.store.filter_by_year(year)
    }

    /// Publications containing `keyword` anywhere in the configured scope.
    pub fn by_keyword(&self, keyword: &str) -> Result<Vec<Publication>, StoreError> {
        self.store.filter_by_keyword(keyword, self.config.scope)
    }

    /// Publications satisfying both parts of `filter`.
    pub fn filter(&self, filter: &PublicationFilter) -> Result<Vec<Publication>, StoreError> {
        let scope = self.config.scope;
        let year = filter.active_year();
        let keyword = filter.active_keyword();

        Ok(self
            .store
            .get_all()?
            .into_iter()
            .filter(|p| year.is_none_or(|y| matches_year(p, y)))
            .filter(|p| keyword.is_none_or(|k| scope.matches(p, k)))
            .collect())
    }

    /// Distinct non-empty years present in the store, newest first.
    pub fn years(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .store
            .get_all()?
            .into_iter()
            .map(|p| p.entry_tags.year)
            .filter(|y| !y.is_empty())
            .unique()
            .sorted_unstable_by(|a, b| b.cmp(a))
            .collect())
    }
}
