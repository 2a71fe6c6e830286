//! BibTeX parsing implementation.
//!
//! This module handles the low-level scanning of BibTeX-like text into
//! [`RawEntry`] values. It accepts `@type{key, name = value, ...}` blocks (or
//! the `@type(...)` form), with values written as `{braced}`, `"quoted"` or
//! bare words. Balanced braces inside values are kept verbatim.

use crate::bibtex::BibTag;
use crate::error::{ParseError, SyntaxError};
use crate::raw::RawEntry;
use crate::utils::collapse_whitespace;
use tracing::debug;

/// Block types that never describe a citation.
const SKIPPED_BLOCKS: [&str; 3] = ["comment", "preamble", "string"];

/// Parse BibTeX text into raw entries, in source order.
///
/// Any syntax problem fails the whole input; no partial results are returned.
pub(crate) fn bibtex_parse<S: AsRef<str>>(bibtex_text: S) -> Result<Vec<RawEntry>, ParseError> {
    let text = bibtex_text.as_ref();

    if text.trim().is_empty() {
        return Err(ParseError::new(SyntaxError::EmptyInput));
    }

    let mut scanner = Scanner::new(text);
    let mut entries = Vec::new();

    while scanner.skip_outside_blocks()? {
        if let Some(entry) = parse_block(&mut scanner)? {
            entries.push(entry);
        }
    }

    if entries.is_empty() {
        return Err(ParseError::new(SyntaxError::NoEntries));
    }

    Ok(entries)
}

/// Parse one `@...` block. Returns `None` for skipped block types.
fn parse_block(scanner: &mut Scanner<'_>) -> Result<Option<RawEntry>, ParseError> {
    let start_line = scanner.line;
    scanner.expect('@')?;
    scanner.skip_whitespace();

    let entry_type = scanner.take_while(is_identifier_char);
    if entry_type.is_empty() {
        return Err(scanner.error(SyntaxError::MissingEntryType));
    }

    scanner.skip_whitespace();
    let close = match scanner.peek() {
        Some('{') => '}',
        Some('(') => ')',
        Some(c) => return Err(scanner.unexpected("'{' or '('", c)),
        None => return Err(scanner.eof("'{'")),
    };
    scanner.bump();

    if SKIPPED_BLOCKS.contains(&entry_type.to_ascii_lowercase().as_str()) {
        debug!(line = start_line, entry_type, "skipping non-citation block");
        scanner.take_until_close(close)?;
        return Ok(None);
    }

    scanner.skip_whitespace();
    let key = scanner.take_while(|c| c != ',' && c != close && !c.is_whitespace());
    let mut entry = RawEntry::new()
        .with_entry_type(entry_type)
        .with_citation_key(key);
    scanner.skip_whitespace();

    loop {
        match scanner.peek() {
            Some(c) if c == close => {
                scanner.bump();
                return Ok(Some(entry));
            }
            Some(',') => {
                scanner.bump();
                scanner.skip_whitespace();
                // Trailing comma before the closing delimiter
                if scanner.peek() == Some(close) {
                    continue;
                }
                parse_field(scanner, &mut entry)?;
                scanner.skip_whitespace();
            }
            Some(c) => return Err(scanner.unexpected(&format!("',' or '{close}'"), c)),
            None => return Err(scanner.eof(&format!("'{close}'"))),
        }
    }
}

/// Parse a `name = value` pair into the entry.
fn parse_field(scanner: &mut Scanner<'_>, entry: &mut RawEntry) -> Result<(), ParseError> {
    let name = scanner.take_while(is_identifier_char);
    if name.is_empty() {
        return match scanner.peek() {
            Some(c) => Err(scanner.unexpected("field name", c)),
            None => Err(scanner.eof("field name")),
        };
    }

    scanner.skip_whitespace();
    scanner.expect('=')?;
    scanner.skip_whitespace();

    let value = parse_value(scanner)?;
    if !entry.add_field(BibTag::from_tag(name), value) {
        debug!(line = scanner.line, field = name, "duplicate field ignored");
    }
    Ok(())
}

/// Parse a braced, quoted or bare field value.
fn parse_value(scanner: &mut Scanner<'_>) -> Result<String, ParseError> {
    match scanner.peek() {
        Some('{') => {
            scanner.bump();
            let raw = scanner.take_until_close('}')?;
            Ok(collapse_whitespace(raw))
        }
        Some('"') => {
            scanner.bump();
            let raw = scanner.take_until_close('"')?;
            Ok(collapse_whitespace(raw))
        }
        Some(c) if is_bare_value_char(c) => Ok(scanner.take_while(is_bare_value_char).to_string()),
        Some(c) => Err(scanner.unexpected("field value", c)),
        None => Err(scanner.eof("field value")),
    }
}

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.')
}

fn is_bare_value_char(c: char) -> bool {
    c.is_alphanumeric() || matches!(c, '_' | '-' | ':' | '.' | '+' | '/')
}

/// Character cursor over the input that tracks the current line.
struct Scanner<'a> {
    text: &'a str,
    pos: usize,
    line: usize,
}

impl<'a> Scanner<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.text[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn take_while(&mut self, predicate: impl Fn(char) -> bool) -> &'a str {
        let text = self.text;
        let start = self.pos;
        while self.peek().is_some_and(&predicate) {
            self.bump();
        }
        &text[start..self.pos]
    }

    fn expect(&mut self, expected: char) -> Result<(), ParseError> {
        match self.peek() {
            Some(c) if c == expected => {
                self.bump();
                Ok(())
            }
            Some(c) => Err(self.unexpected(&format!("'{expected}'"), c)),
            None => Err(self.eof(&format!("'{expected}'"))),
        }
    }

    /// Advance over text between blocks, which BibTeX treats as a comment.
    ///
    /// Returns `true` when positioned on the `@` of the next block and `false`
    /// at the end of input. Braces in the skipped text must still balance.
    fn skip_outside_blocks(&mut self) -> Result<bool, ParseError> {
        let mut depth = 0usize;
        let mut open_line = self.line;
        while let Some(c) = self.peek() {
            match c {
                '@' if depth == 0 => return Ok(true),
                '{' => {
                    if depth == 0 {
                        open_line = self.line;
                    }
                    depth += 1;
                }
                '}' if depth == 0 => return Err(self.error(SyntaxError::UnmatchedBrace)),
                '}' => depth -= 1,
                _ => {}
            }
            self.bump();
        }
        if depth > 0 {
            return Err(ParseError::at_line(
                open_line,
                SyntaxError::UnexpectedEof("'}'".to_string()),
            ));
        }
        Ok(false)
    }

    /// Consume up to and including `close` at brace depth zero, returning the
    /// text before it. Used for braced values, quoted values and skipped blocks.
    fn take_until_close(&mut self, close: char) -> Result<&'a str, ParseError> {
        let text = self.text;
        let start = self.pos;
        let start_line = self.line;
        let mut depth = 0usize;

        while let Some(c) = self.peek() {
            if depth == 0 && c == close {
                let body = &text[start..self.pos];
                self.bump();
                return Ok(body);
            }
            match c {
                '{' => depth += 1,
                '}' if depth == 0 => return Err(self.error(SyntaxError::UnmatchedBrace)),
                '}' => depth -= 1,
                _ => {}
            }
            self.bump();
        }

        Err(ParseError::at_line(
            start_line,
            SyntaxError::UnexpectedEof(format!("'{close}'")),
        ))
    }

    fn error(&self, kind: SyntaxError) -> ParseError {
        ParseError::at_line(self.line, kind)
    }

    fn unexpected(&self, expected: &str, found: char) -> ParseError {
        self.error(SyntaxError::Unexpected {
            expected: expected.to_string(),
            found: format!("'{found}'"),
        })
    }

    fn eof(&self, expected: &str) -> ParseError {
        self.error(SyntaxError::UnexpectedEof(expected.to_string()))
    }
}
