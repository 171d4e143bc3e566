//! Command types representing the full console operation surface
//!
//! This module defines a fixed-arity command inventory that serves as the
//! entry point for all record operations via the `apply()` function. The
//! console parses user input into these commands; nothing is ever
//! dispatched by evaluating class or method names dynamically.

use std::str::FromStr;

use crate::errors::Result;
use crate::model::{ModelKind, Record};
use crate::ops::Store;

/// Command enum representing all console operations
///
/// Commands are processed by the `apply()` function against a store passed
/// in by the caller; the caller decides when to flush based on
/// [`Command::is_mutating`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Create a new record of a registered class, yielding its id
    Create { class_name: String },

    /// Show one record by class name and id
    Show { class_name: String, id: String },

    /// Delete one record by class name and id
    Destroy { class_name: String, id: String },

    /// List all records, optionally filtered by class name
    All { class_name: Option<String> },

    /// Update one attribute of one record
    Update {
        class_name: String,
        id: String,
        field: String,
        value: String,
    },

    /// Count the records of one class
    Count { class_name: String },
}

impl Command {
    /// Whether applying this command changes the store
    ///
    /// Mutating commands are followed by a full-file flush in the console.
    pub fn is_mutating(&self) -> bool {
        matches!(
            self,
            Command::Create { .. } | Command::Destroy { .. } | Command::Update { .. }
        )
    }
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// A record was created; carries the generated id
    Created { id: String },
    /// A record was found; carries its rendered form
    Shown { rendered: String },
    /// A record was deleted
    Destroyed,
    /// Rendered forms of the matching records, ordered by composite key
    Listing { rendered: Vec<String> },
    /// An attribute was updated
    Updated,
    /// Cardinality of one class
    Counted { count: usize },
}

/// Apply one command against the store
///
/// # Errors
///
/// Returns `ModelNotFound` for unregistered class names and
/// `InstanceNotFound` for absent composite keys; both are recovered at the
/// console boundary and turned into fixed messages.
pub fn apply(store: &mut Store, command: Command) -> Result<Outcome> {
    match command {
        Command::Create { class_name } => {
            let kind = ModelKind::from_str(&class_name)?;
            let record = Record::new(kind);
            let id = record.id.clone();
            store.insert(record);
            Ok(Outcome::Created { id })
        }
        Command::Show { class_name, id } => {
            let record = store.find_by_id(&class_name, &id)?;
            Ok(Outcome::Shown {
                rendered: record.to_string(),
            })
        }
        Command::Destroy { class_name, id } => {
            store.delete_by_id(&class_name, &id)?;
            Ok(Outcome::Destroyed)
        }
        Command::All { class_name } => {
            let records = store.find_all(class_name.as_deref())?;
            Ok(Outcome::Listing {
                rendered: records.iter().map(|r| r.to_string()).collect(),
            })
        }
        Command::Update {
            class_name,
            id,
            field,
            value,
        } => {
            store.update_one(&class_name, &id, &field, &value)?;
            Ok(Outcome::Updated)
        }
        Command::Count { class_name } => {
            let count = store.count(&class_name)?;
            Ok(Outcome::Counted { count })
        }
    }
}
