//! JSON publication import.
//!
//! Accepts the loosely-typed JSON shape publications are exchanged in, either a
//! single object or an array of objects:
//!
//! ```json
//! [{ "citationKey": "doe2020", "entryType": "article",
//!    "entryTags": { "title": "A Study", "year": 2020 } }]
//! ```
//!
//! Nothing is required. Scalars are read as text (`2020` becomes `"2020"`),
//! while `null`, arrays and nested objects count as absent.
//!
//! # Example
//!
//! ```
//! use bibstore::{CitationParser, JsonParser};
//!
//! let input = r#"{"citationKey": "doe2020", "entryTags": {"year": 2020}}"#;
//! let entries = JsonParser::new().parse(input).unwrap();
//! assert_eq!(entries[0].citation_key.as_deref(), Some("doe2020"));
//! ```

use crate::CitationParser;
use crate::bibtex::BibTag;
use crate::error::{ParseError, SyntaxError};
use crate::raw::RawEntry;
use serde_json::{Map, Value};

/// Parser for JSON publication objects.
#[derive(Debug, Clone, Default)]
pub struct JsonParser;

impl JsonParser {
    /// Creates a new JSON parser instance.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CitationParser for JsonParser {
    fn parse(&self, input: &str) -> Result<Vec<RawEntry>, ParseError> {
        if input.trim().is_empty() {
            return Err(ParseError::new(SyntaxError::EmptyInput));
        }

        let value: Value = serde_json::from_str(input).map_err(|e| {
            ParseError::at_line(e.line(), SyntaxError::Json(e.to_string()))
        })?;

        let items = match value {
            Value::Array(items) => items,
            object @ Value::Object(_) => vec![object],
            other => return Err(not_an_object(&other)),
        };

        let entries = items
            .iter()
            .map(|item| match item {
                Value::Object(object) => Ok(raw_entry_from_object(object)),
                other => Err(not_an_object(other)),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if entries.is_empty() {
            return Err(ParseError::new(SyntaxError::NoEntries));
        }

        Ok(entries)
    }
}

fn raw_entry_from_object(object: &Map<String, Value>) -> RawEntry {
    let mut entry = RawEntry {
        citation_key: object.get("citationKey").and_then(scalar_text),
        entry_type: object.get("entryType").and_then(scalar_text),
        ..RawEntry::default()
    };

    if let Some(Value::Object(tags)) = object.get("entryTags") {
        for (name, value) in tags {
            if let Some(text) = scalar_text(value) {
                entry.add_field(BibTag::from_tag(name), text);
            }
        }
    }

    entry
}

/// Read a JSON scalar as text. Empty strings count as absent.
fn scalar_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn not_an_object(value: &Value) -> ParseError {
    let found = match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    ParseError::new(SyntaxError::Unexpected {
        expected: "publication object".to_string(),
        found: found.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn test_parse_array_of_publications() {
        let input = r#"[
            {"citationKey": "doe2020", "entryType": "article",
             "entryTags": {"title": "A Study", "author": "Doe", "year": "2020"}},
            {"citationKey": "roe2019", "entryType": "book",
             "entryTags": {"title": "A Book", "publisher": "Elsevier"}}
        ]"#;

        let entries = JsonParser::new().parse(input).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].get(&BibTag::Title), Some("A Study"));
        assert_eq!(entries[1].entry_type.as_deref(), Some("book"));
        assert_eq!(entries[1].get(&BibTag::Publisher), Some("Elsevier"));
    }

    #[test]
    fn test_scalars_are_read_as_text() {
        let input = r#"{"citationKey": 42, "entryTags": {"year": 2020, "tags": true, "title": null}}"#;
        let entries = JsonParser::new().parse(input).unwrap();
        assert_eq!(entries[0].citation_key.as_deref(), Some("42"));
        assert_eq!(entries[0].get(&BibTag::Year), Some("2020"));
        assert_eq!(entries[0].get(&BibTag::Tags), Some("true"));
        assert_eq!(entries[0].get(&BibTag::Title), None);
    }

    #[test]
    fn test_missing_entry_tags_is_not_an_error() {
        let entries = JsonParser::new().parse(r#"[{"entryType": "misc"}]"#).unwrap();
        assert_eq!(entries[0].citation_key, None);
        assert!(entries[0].fields.is_empty());
    }

    #[rstest]
    #[case("")]
    #[case("[]")]
    #[case("not json")]
    #[case("[1, 2]")]
    #[case(r#"[{"citationKey": "a"}, "b"]"#)]
    #[case(r#"{"citationKey": "a""#)]
    fn test_invalid_input(#[case] input: &str) {
        assert!(JsonParser::new().parse(input).is_err());
    }
}
