//! Loosely-typed citation entries as produced by the upstream parsers.
//!
//! A [`RawEntry`] makes no promises: the citation key, the entry type and every
//! field may be missing. The normalizer turns it into a [`Publication`].
//!
//! [`Publication`]: crate::Publication

use crate::bibtex::BibTag;
use std::collections::HashMap;

/// A single parsed citation entry before normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    /// Citation key, if the source supplied a non-empty one.
    pub citation_key: Option<String>,
    /// Entry type as written ("article", "book", ...), if present.
    pub entry_type: Option<String>,
    /// Field values keyed by tag. The first value seen for a tag wins.
    pub fields: HashMap<BibTag, String>,
}

impl RawEntry {
    /// Create a new empty RawEntry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the citation key, treating an empty key as absent.
    #[must_use]
    pub fn with_citation_key(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        self.citation_key = (!key.is_empty()).then_some(key);
        self
    }

    /// Set the entry type, treating an empty type as absent.
    #[must_use]
    pub fn with_entry_type(mut self, entry_type: impl Into<String>) -> Self {
        let entry_type = entry_type.into();
        self.entry_type = (!entry_type.is_empty()).then_some(entry_type);
        self
    }

    /// Add a field value. Returns `false` when the tag already had a value,
    /// in which case the earlier value is kept.
    pub fn add_field(&mut self, tag: BibTag, value: String) -> bool {
        if self.fields.contains_key(&tag) {
            return false;
        }
        self.fields.insert(tag, value);
        true
    }

    /// Builder form of [`RawEntry::add_field`].
    #[must_use]
    pub fn with_field(mut self, tag: BibTag, value: impl Into<String>) -> Self {
        self.add_field(tag, value.into());
        self
    }

    /// Get the value for a tag, if it exists.
    pub fn get(&self, tag: &BibTag) -> Option<&str> {
        self.fields.get(tag).map(String::as_str)
    }
}
