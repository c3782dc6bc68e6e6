//! Error types for the store.

/// Result type alias for this crate.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors that can occur reading or writing the store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Filesystem error.
    #[error("store I/O error at '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// The store file or a value in it could not be (de)serialized.
    #[error("store serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e.to_string())
    }
}
