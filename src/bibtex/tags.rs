//! BibTeX field names recognised by the normalizer.

/// BibTeX field tags.
///
/// Only the fields the canonical record keeps have dedicated variants; anything
/// else is carried as [`BibTag::Unknown`] so parsers never lose information
/// before normalization decides what to drop.
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq, Hash, Clone)]
pub enum BibTag {
    /// author - Author list, kept verbatim ("Doe, J. and Roe, R.")
    Author,
    /// year - Publication year
    Year,
    /// title - Title of the work
    Title,
    /// journal - Journal or periodical name
    Journal,
    /// publisher - Publisher name
    Publisher,
    /// tags - Free-form tag list
    Tags,
    /// Any other field, lowercased
    Unknown(String),
}

impl BibTag {
    /// Convert a field name to a BibTag. Matching is case-insensitive.
    pub fn from_tag(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        match tag.as_str() {
            "author" => BibTag::Author,
            "year" => BibTag::Year,
            "title" => BibTag::Title,
            "journal" => BibTag::Journal,
            "publisher" => BibTag::Publisher,
            "tags" => BibTag::Tags,
            _ => BibTag::Unknown(tag),
        }
    }

    /// Convert to the field name as written in BibTeX.
    pub fn as_tag(&self) -> &str {
        match self {
            BibTag::Author => "author",
            BibTag::Year => "year",
            BibTag::Title => "title",
            BibTag::Journal => "journal",
            BibTag::Publisher => "publisher",
            BibTag::Tags => "tags",
            BibTag::Unknown(tag) => tag,
        }
    }
}
