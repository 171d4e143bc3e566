//! Lodge Store - file persistence for the record store
//!
//! The whole in-memory store is serialized as a single JSON document: a
//! mapping of composite key (`"<ClassName>.<id>"`) to the record's flat
//! document form. Loading is forgiving (missing or corrupt files yield an
//! empty store); saving is a blocking full-file rewrite.

pub mod file;

pub use file::FileStore;
