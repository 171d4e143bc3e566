//! Lodge Core - In-memory record kernel
//!
//! This crate provides the foundational data structures and operations for
//! the lodge record console, including:
//! - The closed model registry (User, State, City, Amenity, Place, Review)
//! - Record model with generated ids, timestamps, and a typed attribute map
//! - The in-memory Store keyed by the `"<ClassName>.<id>"` composite key
//! - A fixed-arity command inventory processed by `apply()`
//! - The error taxonomy recovered at the console boundary

pub mod commands;
pub mod errors;
pub mod logging;
pub mod model;
pub mod ops;

// Re-export commonly used types
pub use commands::{apply, Command, Outcome};
pub use errors::{LodgeError, Result};
pub use model::{AttrValue, ModelKind, Record};
pub use ops::Store;
