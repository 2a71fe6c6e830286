//! BibTeX format parser implementation.
//!
//! Provides functionality to parse BibTeX-like citation markup into loosely-typed
//! [`RawEntry`] values, ready for normalization.
//!
//! # Example
//!
//! ```
//! use bibstore::{BibtexParser, CitationParser};
//!
//! let input = "@article{doe2020, title = {A Study}, author = {Doe}, year = {2020}}";
//!
//! let parser = BibtexParser::new();
//! let entries = parser.parse(input).unwrap();
//! assert_eq!(entries[0].citation_key.as_deref(), Some("doe2020"));
//! ```

mod parse;
mod tags;

pub use tags::BibTag;

use crate::CitationParser;
use crate::error::ParseError;
use crate::raw::RawEntry;
use parse::bibtex_parse;

/// Parser for BibTeX formatted citations.
///
/// Handles the common `@type{key, field = value, ...}` shape. Text between
/// entries is ignored and `@comment`, `@preamble` and `@string` blocks are
/// skipped. Macro expansion, `#` concatenation and crossref are not supported.
#[derive(Debug, Clone, Default)]
pub struct BibtexParser;

impl BibtexParser {
    /// Creates a new BibTeX parser instance.
    ///
    /// # Examples
    ///
    /// ```
    /// use bibstore::BibtexParser;
    /// let parser = BibtexParser::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CitationParser for BibtexParser {
    /// Parses a string containing one or more BibTeX entries.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the input is empty, contains no entries, or is
    /// malformed anywhere (unbalanced braces, missing separators, ...).
    fn parse(&self, input: &str) -> Result<Vec<RawEntry>, ParseError> {
        bibtex_parse(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SyntaxError;

    #[test]
    fn test_parse_two_entries() {
        let input = r#"@article{doe2020, title = {A Study}, author = {Doe}, year = {2020}}
@book{roe2019, title = {A Book}, author = {Roe}, year = {2019}}"#;

        let entries = BibtexParser::new().parse(input).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].get(&BibTag::Author), Some("Roe"));
    }

    #[test]
    fn test_parse_empty_input() {
        let error = BibtexParser::new().parse("").unwrap_err();
        assert_eq!(error.kind, SyntaxError::EmptyInput);
    }
}
