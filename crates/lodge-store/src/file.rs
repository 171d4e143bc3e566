use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use lodge_core::errors::Result;
use lodge_core::model::Record;
use lodge_core::ops::Store;

/// Whole-store JSON file persistence
///
/// One file holds every record, keyed by composite key. The store is loaded
/// once at startup and rewritten in full after every mutating command.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Create a file store backed by the given path
    ///
    /// The file is not touched until the first load or save.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted file into a store
    ///
    /// A missing file or one that fails to parse yields an empty store;
    /// the corrupt case is logged, never surfaced as an error.
    pub fn load(&self) -> Store {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => {
                debug!(path = %self.path.display(), "no persisted store, starting empty");
                return Store::new();
            }
        };

        let documents: HashMap<String, Record> = match serde_json::from_str(&raw) {
            Ok(documents) => documents,
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "persisted store is corrupt, starting empty"
                );
                return Store::new();
            }
        };

        let mut store = Store::new();
        // Keys are re-derived from the records themselves
        for record in documents.into_values() {
            store.insert(record);
        }
        debug!(path = %self.path.display(), records = store.len(), "store loaded");
        store
    }

    /// Serialize the entire store and rewrite the file
    ///
    /// Records are written as a sorted map of composite key to document so
    /// the file is deterministic for a given store.
    ///
    /// # Errors
    ///
    /// Returns `Serialization` when encoding fails and `Io` when the file
    /// cannot be written.
    pub fn save(&self, store: &Store) -> Result<()> {
        let documents: BTreeMap<String, &Record> = store
            .records()
            .map(|record| (record.key(), record))
            .collect();
        let raw = serde_json::to_string(&documents)?;
        fs::write(&self.path, raw)?;
        debug!(path = %self.path.display(), records = documents.len(), "store saved");
        Ok(())
    }
}
