use thiserror::Error;

/// Result type alias using LodgeError
pub type Result<T> = std::result::Result<T, LodgeError>;

/// Error taxonomy for record console operations
///
/// The two domain kinds (`ModelNotFound`, `InstanceNotFound`) are recovered
/// at the console boundary and converted to fixed user-facing strings; the
/// remaining kinds cover the persistence path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LodgeError {
    /// Class name is not in the model registry
    #[error("Model not found: {class_name}")]
    ModelNotFound { class_name: String },

    /// Class is registered but no record exists under the composite key
    #[error("No instance found: {class_name}.{id}")]
    InstanceNotFound { class_name: String, id: String },

    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// I/O error while reading or writing the persisted store
    #[error("I/O error: {message}")]
    Io { message: String },
}

impl From<serde_json::Error> for LodgeError {
    fn from(err: serde_json::Error) -> Self {
        LodgeError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for LodgeError {
    fn from(err: std::io::Error) -> Self {
        LodgeError::Io {
            message: err.to_string(),
        }
    }
}
