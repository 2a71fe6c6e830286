//! Error types shared across parsing, storage and ingestion.

use std::fmt;
use thiserror::Error;

/// The specific syntax problem found while parsing citation markup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("input is empty")]
    EmptyInput,

    #[error("no citation entries found")]
    NoEntries,

    #[error("missing entry type after '@'")]
    MissingEntryType,

    #[error("expected {expected}, found {found}")]
    Unexpected { expected: String, found: String },

    #[error("unexpected end of input, expected {0}")]
    UnexpectedEof(String),

    #[error("unmatched closing brace")]
    UnmatchedBrace,

    #[error("invalid JSON: {0}")]
    Json(String),
}

/// Citation markup could not be parsed. Terminal for a whole batch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub struct ParseError {
    /// 1-based line where the problem was detected, when known.
    pub line: Option<usize>,
    pub kind: SyntaxError,
}

impl ParseError {
    pub fn new(kind: SyntaxError) -> Self {
        Self { line: None, kind }
    }

    pub fn at_line(line: usize, kind: SyntaxError) -> Self {
        Self {
            line: Some(line),
            kind,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "Failed to parse at line {}: {}", line, self.kind),
            None => write!(f, "Failed to parse: {}", self.kind),
        }
    }
}

/// The persistence layer could not complete a read or write.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The record violates a store constraint other than key uniqueness.
    #[error("Invalid publication format: {0}")]
    InvalidRecord(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Crate-level error.
#[derive(Debug, Error)]
pub enum CitationError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
