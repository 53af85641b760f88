use thiserror::Error;

/// Errors that can occur when reading or writing durable storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The key is empty or contains characters outside `[A-Za-z0-9_-]`.
    #[error("Invalid storage key: {0:?}")]
    InvalidKey(String),

    /// An I/O error occurred in a file-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be serialized or deserialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;
