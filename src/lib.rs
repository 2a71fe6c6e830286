//! A library for ingesting, deduplicating and querying bibliographic citations.
//!
//! `bibstore` takes BibTeX-style citation text, normalizes every entry into a
//! fixed [`Publication`] shape, stores it under a unique citation key and
//! answers lookup, year and keyword queries over the stored collection.
//!
//! # Key Features
//!
//! - **Parsing**: BibTeX-like markup ([`BibtexParser`]) and loosely-typed JSON
//!   publication objects ([`JsonParser`])
//!
//! - **Normalization**: every entry becomes a well-formed [`Publication`];
//!   missing fields default to empty strings, never to errors
//!
//! - **Idempotent inserts**: a citation key is stored at most once; later
//!   submissions of the same key are reported as duplicates, never overwrite
//!
//! - **Queries**: all records, by key, by year, by case-insensitive keyword
//!   anywhere in the entry tags
//!
//! - **Pluggable storage**: the [`PublicationStore`] trait, with in-memory and
//!   JSON file implementations
//!
//! # Basic Usage
//!
//! ```rust
//! use bibstore::{Ingestor, MemoryStore, QueryEngine};
//!
//! let store = MemoryStore::new();
//! let input = r#"@article{doe2020, title = {A Study}, author = {Doe}, year = {2020}}
//! @book{roe2019, title = {A Book}, author = {Roe}, year = {2019}}"#;
//!
//! let report = Ingestor::new(&store).ingest(input).unwrap();
//! println!("{report}");
//! for line in report.messages() {
//!     println!("{line}");
//! }
//!
//! let engine = QueryEngine::new(&store);
//! let study = engine.by_key("doe2020").unwrap().unwrap();
//! assert_eq!(study.entry_tags.title, "A Study");
//! assert_eq!(study.entry_tags.publisher, "");
//! assert_eq!(engine.by_year("2019").unwrap().len(), 1);
//! ```
//!
//! # Error Handling
//!
//! Parsing is all-or-nothing: malformed input yields a [`ParseError`] and no
//! record reaches the store. After a successful parse, problems are reported
//! per record in the [`BatchReport`] and never abort the batch:
//!
//! ```rust
//! use bibstore::{Ingestor, MemoryStore};
//!
//! let store = MemoryStore::new();
//! match Ingestor::new(&store).ingest("@article{doe2020, title = {unclosed}") {
//!     Ok(report) => println!("{report}"),
//!     Err(e) => eprintln!("{e}"), // "Failed to parse at line 1: ..."
//! }
//! ```
//!
//! Store failures surface as [`StoreError`]; the crate-level [`CitationError`]
//! wraps both for callers that want a single error type.
//!
//! # Logging
//!
//! Outcomes are emitted through `tracing`: one event per record (`info` when
//! uploaded, `warn` for duplicates and failures) and one summary per batch.
//! No subscriber is installed by the library.

use serde::{Deserialize, Serialize};

pub mod bibtex;
pub mod dedupe;
pub mod error;
pub mod ingest;
pub mod json;
pub mod normalize;
pub mod query;
pub mod raw;
mod regex;
pub mod store;
mod utils;

// Reexports
pub use bibtex::{BibTag, BibtexParser};
pub use error::{CitationError, ParseError, StoreError, SyntaxError};
pub use ingest::{BatchReport, Ingestor, RecordOutcome, RecordReport};
pub use json::JsonParser;
pub use normalize::normalize;
pub use query::{PublicationFilter, QueryConfig, QueryEngine, SearchScope};
pub use raw::RawEntry;
pub use store::{Insertion, JsonFileStore, MemoryStore, PublicationStore};

/// A specialized Result type for citation operations.
pub type Result<T> = std::result::Result<T, CitationError>;

/// The descriptive fields attached to a publication.
///
/// Every field is always present; an empty string means the source did not
/// supply it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct EntryTags {
    pub author: String,
    pub year: String,
    pub title: String,
    pub journal: String,
    pub publisher: String,
    pub tags: String,
}

/// A stored bibliographic record.
///
/// Serialized with camelCase keys (`citationKey`, `entryType`, `entryTags`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Publication {
    /// Unique identifier; the only handle for retrieval.
    pub citation_key: String,
    /// Free-form entry type such as "article" or "book".
    pub entry_type: String,
    pub entry_tags: EntryTags,
}

/// Trait for implementing citation parsers.
pub trait CitationParser {
    /// Parse a string containing one or more citations.
    ///
    /// # Arguments
    ///
    /// * `input` - The string containing citation data
    ///
    /// # Returns
    ///
    /// The parsed entries in source order, not yet normalized.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the input is malformed. Parsers never return
    /// partial results.
    fn parse(&self, input: &str) -> std::result::Result<Vec<RawEntry>, ParseError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_publication_serializes_with_camel_case() {
        let publication = Publication {
            citation_key: "doe2020".to_string(),
            entry_type: "article".to_string(),
            entry_tags: EntryTags {
                title: "A Study".to_string(),
                ..EntryTags::default()
            },
        };

        let value = serde_json::to_value(&publication).unwrap();
        assert_eq!(value["citationKey"], "doe2020");
        assert_eq!(value["entryType"], "article");
        assert_eq!(value["entryTags"]["title"], "A Study");
        assert_eq!(value["entryTags"]["publisher"], "");
    }

    #[test]
    fn test_publication_deserializes_missing_fields_as_empty() {
        let publication: Publication =
            serde_json::from_str(r#"{"citationKey": "doe2020"}"#).unwrap();
        assert_eq!(publication.entry_type, "");
        assert_eq!(publication.entry_tags, EntryTags::default());
    }
}
