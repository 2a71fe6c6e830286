//! JSON file backed publication store.
//!
//! The whole collection lives in a single JSON array, in the same shape the
//! records are serialized everywhere else (`citationKey`, `entryType`,
//! `entryTags`). Every operation reads the file; every insert rewrites it.

use super::{Insertion, PublicationStore, StoreResult, ensure_insertable};
use crate::Publication;
use crate::error::StoreError;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, LazyLock, Mutex};
use tempfile::NamedTempFile;
use tracing::debug;

/// One lock per backing file, shared by every handle in the process.
static FILE_LOCKS: LazyLock<Mutex<HashMap<PathBuf, Arc<Mutex<()>>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

/// Resolves `path` to the key used in [`FILE_LOCKS`]. A file that does not
/// exist yet is keyed by its canonical parent directory plus its name.
fn lock_key(path: &Path) -> PathBuf {
    if let Ok(canonical) = fs::canonicalize(path) {
        return canonical;
    }
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    match (fs::canonicalize(parent), path.file_name()) {
        (Ok(dir), Some(name)) => dir.join(name),
        _ => std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf()),
    }
}

fn shared_lock(path: &Path) -> Arc<Mutex<()>> {
    let key = lock_key(path);
    let mut locks = FILE_LOCKS
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    Arc::clone(locks.entry(key).or_default())
}

/// Publications persisted as one JSON document.
///
/// Read-modify-write cycles are serialized across every handle on the same
/// file within the process, and the file is replaced atomically by writing a
/// uniquely named sibling temporary file and renaming it over the target.
/// Other processes writing the same file are not coordinated with.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    pretty: bool,
    lock: Arc<Mutex<()>>,
}

impl JsonFileStore {
    /// Creates a store backed by `path`. The file is created on first insert;
    /// a missing or blank file reads as an empty collection.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use bibstore::{JsonFileStore, PublicationStore};
    ///
    /// let store = JsonFileStore::new("publications.json").with_pretty(false);
    /// println!("{} publications", store.count().unwrap());
    /// ```
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lock = shared_lock(&path);
        Self {
            path,
            pretty: true,
            lock,
        }
    }

    /// Whether to write indented JSON (default `true`).
    #[must_use]
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    /// The backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> StoreResult<Vec<Publication>> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let records: Vec<Publication> = serde_json::from_str(&text)?;
        debug!(path = %self.path.display(), count = records.len(), "loaded publications");
        Ok(records)
    }

    fn save(&self, records: &[Publication]) -> StoreResult<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(records)?
        } else {
            serde_json::to_string(records)?
        };

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        // Dropping an unpersisted temp file deletes it.
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(json.as_bytes())?;
        temp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }

    fn locked<T>(&self, f: impl FnOnce() -> StoreResult<T>) -> StoreResult<T> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::Unavailable("json store lock poisoned".into()))?;
        f()
    }
}

impl PublicationStore for JsonFileStore {
    fn insert_if_absent(&self, publication: &Publication) -> StoreResult<Insertion> {
        ensure_insertable(publication)?;

        self.locked(|| {
            let mut records = self.load()?;
            if records
                .iter()
                .any(|p| p.citation_key == publication.citation_key)
            {
                return Ok(Insertion::AlreadyExists);
            }

            records.push(publication.clone());
            self.save(&records)?;
            debug!(citation_key = %publication.citation_key, total = records.len(), "stored publication");
            Ok(Insertion::Inserted)
        })
    }

    fn get_all(&self) -> StoreResult<Vec<Publication>> {
        self.locked(|| self.load())
    }
}
