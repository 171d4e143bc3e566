use std::collections::HashMap;
use std::str::FromStr;

use tracing::debug;

use crate::errors::{LodgeError, Result};
use crate::model::record::composite_key;
use crate::model::{ModelKind, Record};

/// In-memory table of all live records
///
/// A simple HashMap-based store keyed by the `"<ClassName>.<id>"` composite
/// key. Not thread-safe (no Arc/RwLock) - designed for single-threaded use.
/// Persistence lives outside this type; the console flushes the whole store
/// through a file store after every mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Store {
    /// Map of composite key to record
    records: HashMap<String, Record>,
}

impl Store {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Insert a record under its composite key
    ///
    /// Records are constructed through the registry, so the class is always
    /// registered by the time one exists; string-facing lookups validate
    /// class names before reaching here. An existing record under the same
    /// key is replaced.
    pub fn insert(&mut self, record: Record) {
        debug!(key = %record.key(), "store insert");
        self.records.insert(record.key(), record);
    }

    /// All records, optionally filtered by class name
    ///
    /// Results are ordered by composite key so listings are deterministic.
    ///
    /// # Errors
    ///
    /// Returns `ModelNotFound` if a filter names an unregistered class.
    pub fn find_all(&self, class_name: Option<&str>) -> Result<Vec<&Record>> {
        let kind = match class_name {
            Some(name) => Some(ModelKind::from_str(name)?),
            None => None,
        };
        let mut matches: Vec<&Record> = self
            .records
            .values()
            .filter(|record| kind.map_or(true, |k| record.kind == k))
            .collect();
        matches.sort_by_key(|record| record.key());
        Ok(matches)
    }

    /// Look up one record by class name and id
    ///
    /// # Errors
    ///
    /// Returns `ModelNotFound` if the class is unregistered, or
    /// `InstanceNotFound` if no record exists under the composite key.
    pub fn find_by_id(&self, class_name: &str, id: &str) -> Result<&Record> {
        let kind = ModelKind::from_str(class_name)?;
        self.records
            .get(&composite_key(kind.as_str(), id))
            .ok_or_else(|| LodgeError::InstanceNotFound {
                class_name: class_name.to_string(),
                id: id.to_string(),
            })
    }

    /// Remove one record by class name and id, returning it
    ///
    /// # Errors
    ///
    /// Same error semantics as [`Store::find_by_id`].
    pub fn delete_by_id(&mut self, class_name: &str, id: &str) -> Result<Record> {
        let kind = ModelKind::from_str(class_name)?;
        let removed = self
            .records
            .remove(&composite_key(kind.as_str(), id))
            .ok_or_else(|| LodgeError::InstanceNotFound {
                class_name: class_name.to_string(),
                id: id.to_string(),
            })?;
        debug!(key = %removed.key(), "store delete");
        Ok(removed)
    }

    /// Update one attribute of one record
    ///
    /// Protected fields (`id`, `created_at`, `updated_at`, `__class__`) are
    /// silently refused; otherwise the value is coerced to the existing
    /// attribute's type and `updated_at` advances.
    ///
    /// # Errors
    ///
    /// Same error semantics as [`Store::find_by_id`].
    pub fn update_one(&mut self, class_name: &str, id: &str, field: &str, value: &str) -> Result<()> {
        let kind = ModelKind::from_str(class_name)?;
        let record = self
            .records
            .get_mut(&composite_key(kind.as_str(), id))
            .ok_or_else(|| LodgeError::InstanceNotFound {
                class_name: class_name.to_string(),
                id: id.to_string(),
            })?;
        if record.set_attribute(field, value) {
            debug!(key = %record.key(), field, "store update");
        }
        Ok(())
    }

    /// Number of records of one class
    ///
    /// # Errors
    ///
    /// Returns `ModelNotFound` if the class is unregistered.
    pub fn count(&self, class_name: &str) -> Result<usize> {
        Ok(self.find_all(Some(class_name))?.len())
    }

    /// Total number of records across all classes
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterate over all records (unordered)
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }
}
