//! Ingestion pipeline.
//!
//! Turns raw citation markup into stored publications in two phases:
//!
//! 1. **Parse and normalize** the whole input. A parse failure rejects the
//!    entire batch before anything touches the store.
//! 2. **Submit and collect** each record in parse order through the
//!    [`DuplicateGuard`]. Records are independent: a duplicate or a store
//!    failure is recorded for that record and the batch carries on.
//!
//! Records are submitted one at a time, so a key repeated inside one batch is
//! stored once and its later occurrences are reported as duplicates.
//!
//! # Example
//!
//! ```
//! use bibstore::{Ingestor, MemoryStore};
//!
//! let store = MemoryStore::new();
//! let input = r#"@article{doe2020, title = {A Study}, author = {Doe}, year = {2020}}
//! @book{roe2019, title = {A Book}, author = {Roe}, year = {2019}}"#;
//!
//! let report = Ingestor::new(&store).ingest(input).unwrap();
//! assert_eq!(report.uploaded(), 2);
//! assert_eq!(report.messages()[0], r#"Uploaded "A Study" successfully."#);
//!
//! let again = Ingestor::new(&store).ingest(input).unwrap();
//! assert_eq!(again.duplicates(), 2);
//! ```

use crate::bibtex::BibtexParser;
use crate::dedupe::{Admission, DuplicateGuard};
use crate::error::{CitationError, ParseError};
use crate::normalize::normalize;
use crate::raw::RawEntry;
use crate::store::PublicationStore;
use crate::{CitationParser, Publication, Result};
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// What happened to one submitted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Stored.
    Uploaded,
    /// Rejected because the citation key was already taken.
    Duplicate,
    /// The store failed or refused the record.
    Failed(String),
}

/// Per-record entry of a [`BatchReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordReport {
    pub citation_key: String,
    pub title: String,
    pub outcome: RecordOutcome,
}

impl RecordReport {
    /// Human-readable outcome line.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for RecordReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            RecordOutcome::Uploaded => write!(f, "Uploaded \"{}\" successfully.", self.title),
            RecordOutcome::Duplicate => write!(f, "\"{}\" already exists.", self.title),
            RecordOutcome::Failed(message) => {
                write!(f, "Failed to upload \"{}\": {}", self.title, message)
            }
        }
    }
}

/// Result of ingesting one batch, one [`RecordReport`] per parsed entry, in
/// parse order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub records: Vec<RecordReport>,
}

impl BatchReport {
    /// Number of records submitted, equal to the number of parsed entries.
    pub fn submitted(&self) -> usize {
        self.records.len()
    }

    pub fn uploaded(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Uploaded))
    }

    pub fn duplicates(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Duplicate))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RecordOutcome::Failed(_)))
    }

    /// Outcome lines, one per record.
    pub fn messages(&self) -> Vec<String> {
        self.records.iter().map(RecordReport::message).collect()
    }

    fn count(&self, predicate: impl Fn(&RecordOutcome) -> bool) -> usize {
        self.records.iter().filter(|r| predicate(&r.outcome)).count()
    }
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} submitted, {} uploaded, {} duplicate, {} failed",
            self.submitted(),
            self.uploaded(),
            self.duplicates(),
            self.failed()
        )
    }
}

/// Runs the ingestion pipeline against a store.
///
/// Parses BibTeX by default; any [`CitationParser`] can be plugged in with
/// [`Ingestor::with_parser`].
#[derive(Debug)]
pub struct Ingestor<'s, S: PublicationStore, P: CitationParser = BibtexParser> {
    store: &'s S,
    parser: P,
}

impl<'s, S: PublicationStore> Ingestor<'s, S> {
    /// Creates an ingestor reading BibTeX.
    #[must_use]
    pub fn new(store: &'s S) -> Self {
        Self {
            store,
            parser: BibtexParser::new(),
        }
    }
}

impl<'s, S: PublicationStore, P: CitationParser> Ingestor<'s, S, P> {
    /// Replace the parser used by [`Ingestor::ingest`].
    ///
    /// # Examples
    ///
    /// ```
    /// use bibstore::{Ingestor, JsonParser, MemoryStore};
    ///
    /// let store = MemoryStore::new();
    /// let report = Ingestor::new(&store)
    ///     .with_parser(JsonParser::new())
    ///     .ingest(r#"[{"citationKey": "doe2020", "entryType": "article"}]"#)
    ///     .unwrap();
    /// assert_eq!(report.uploaded(), 1);
    /// ```
    #[must_use]
    pub fn with_parser<Q: CitationParser>(self, parser: Q) -> Ingestor<'s, S, Q> {
        Ingestor {
            store: self.store,
            parser,
        }
    }

    /// Ingest raw citation text.
    ///
    /// # Errors
    ///
    /// Returns the `ParseError` when the text cannot be parsed. In that case
    /// nothing was submitted and the store is unchanged. Per-record problems
    /// never surface here; they are in the returned report.
    pub fn ingest(&self, input: &str) -> std::result::Result<BatchReport, ParseError> {
        let entries = self.parser.parse(input).inspect_err(|e| {
            warn!(error = %e, "rejected batch");
        })?;
        Ok(self.ingest_entries(entries))
    }

    /// Ingest a citation file, such as a `.bib` export.
    ///
    /// # Errors
    ///
    /// Returns `CitationError::Io` if the file cannot be read and
    /// `CitationError::Parse` if it cannot be parsed.
    pub fn ingest_file(&self, path: impl AsRef<Path>) -> Result<BatchReport> {
        let path = path.as_ref();
        let input = fs::read_to_string(path)?;
        info!(path = %path.display(), "ingesting file");
        self.ingest(&input).map_err(CitationError::from)
    }

    /// Normalize and submit already-parsed entries.
    pub fn ingest_entries(&self, entries: impl IntoIterator<Item = RawEntry>) -> BatchReport {
        let publications: Vec<Publication> = entries.into_iter().map(|e| normalize(&e)).collect();

        let guard = DuplicateGuard::new(self.store);
        let records: Vec<RecordReport> = publications
            .into_iter()
            .map(|publication| submit(&guard, publication))
            .collect();

        let report = BatchReport { records };
        info!(
            submitted = report.submitted(),
            uploaded = report.uploaded(),
            duplicate = report.duplicates(),
            failed = report.failed(),
            "batch ingested"
        );
        report
    }
}

fn submit<S: PublicationStore>(guard: &DuplicateGuard<'_, S>, publication: Publication) -> RecordReport {
    let outcome = match guard.admit(&publication) {
        Ok(Admission::Accepted) => RecordOutcome::Uploaded,
        Ok(Admission::RejectedDuplicate) => RecordOutcome::Duplicate,
        Err(e) => RecordOutcome::Failed(e.to_string()),
    };

    let Publication {
        citation_key,
        entry_tags,
        ..
    } = publication;
    let report = RecordReport {
        citation_key,
        title: entry_tags.title,
        outcome,
    };

    match report.outcome {
        RecordOutcome::Uploaded => info!(citation_key = %report.citation_key, "{report}"),
        _ => warn!(citation_key = %report.citation_key, "{report}"),
    }
    report
}
