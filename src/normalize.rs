//! Record normalization.
//!
//! Maps a loosely-typed [`RawEntry`] onto the fixed [`Publication`] schema.
//! Normalization is total: every absent value becomes an empty string and
//! fields outside the schema are dropped.

use crate::bibtex::BibTag;
use crate::raw::RawEntry;
use crate::{EntryTags, Publication};

/// Normalize a raw entry into a canonical publication.
///
/// Pure and idempotent: normalizing the [`RawEntry`] view of an already
/// normalized publication yields that same publication.
///
/// # Examples
///
/// ```
/// use bibstore::{BibTag, RawEntry, normalize};
///
/// let raw = RawEntry::new()
///     .with_citation_key("doe2020")
///     .with_field(BibTag::Title, "A Study");
///
/// let publication = normalize(&raw);
/// assert_eq!(publication.entry_type, "");
/// assert_eq!(publication.entry_tags.title, "A Study");
/// assert_eq!(publication.entry_tags.publisher, "");
/// ```
pub fn normalize(entry: &RawEntry) -> Publication {
    let field = |tag: BibTag| entry.get(&tag).unwrap_or_default().to_string();

    Publication {
        citation_key: entry.citation_key.clone().unwrap_or_default(),
        entry_type: entry.entry_type.clone().unwrap_or_default(),
        entry_tags: EntryTags {
            author: field(BibTag::Author),
            year: field(BibTag::Year),
            title: field(BibTag::Title),
            journal: field(BibTag::Journal),
            publisher: field(BibTag::Publisher),
            tags: field(BibTag::Tags),
        },
    }
}

impl From<RawEntry> for Publication {
    fn from(entry: RawEntry) -> Self {
        normalize(&entry)
    }
}

impl From<&Publication> for RawEntry {
    fn from(publication: &Publication) -> Self {
        let tags = &publication.entry_tags;
        let mut entry = RawEntry::new()
            .with_citation_key(publication.citation_key.as_str())
            .with_entry_type(publication.entry_type.as_str());

        for (tag, value) in [
            (BibTag::Author, &tags.author),
            (BibTag::Year, &tags.year),
            (BibTag::Title, &tags.title),
            (BibTag::Journal, &tags.journal),
            (BibTag::Publisher, &tags.publisher),
            (BibTag::Tags, &tags.tags),
        ] {
            if !value.is_empty() {
                entry.add_field(tag, value.clone());
            }
        }

        entry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn full_entry() -> RawEntry {
        RawEntry::new()
            .with_citation_key("roe2019")
            .with_entry_type("book")
            .with_field(BibTag::Author, "Roe")
            .with_field(BibTag::Year, "2019")
            .with_field(BibTag::Title, "A Book")
            .with_field(BibTag::Journal, "Journal of Books")
            .with_field(BibTag::Publisher, "Elsevier")
            .with_field(BibTag::Tags, "books, reading")
    }

    #[test]
    fn test_normalize_full_entry() {
        let publication = normalize(&full_entry());
        assert_eq!(publication.citation_key, "roe2019");
        assert_eq!(publication.entry_type, "book");
        assert_eq!(
            publication.entry_tags,
            EntryTags {
                author: "Roe".to_string(),
                year: "2019".to_string(),
                title: "A Book".to_string(),
                journal: "Journal of Books".to_string(),
                publisher: "Elsevier".to_string(),
                tags: "books, reading".to_string(),
            }
        );
    }

    #[test]
    fn test_normalize_empty_entry_defaults_everything() {
        let publication = normalize(&RawEntry::new());
        assert_eq!(publication, Publication::default());
        assert_eq!(publication.entry_tags, EntryTags::default());
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let raw = RawEntry::new()
            .with_citation_key("k")
            .with_field(BibTag::Unknown("doi".to_string()), "10.1000/x");
        let publication = normalize(&raw);
        assert_eq!(RawEntry::from(&publication).fields.len(), 0);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let partial = RawEntry::new()
            .with_entry_type("article")
            .with_field(BibTag::Title, "Only a title");

        for raw in [RawEntry::new(), partial, full_entry()] {
            let once = normalize(&raw);
            let twice = normalize(&RawEntry::from(&once));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_from_raw_entry() {
        let publication: Publication = full_entry().into();
        assert_eq!(publication.entry_tags.publisher, "Elsevier");
    }
}
