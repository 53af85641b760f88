use storage::StorageError;
use thiserror::Error;

/// Errors that can occur when talking to the storefront backend.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request could not be sent or the response could not be read.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The requested resource does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The backend is unreachable.
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The operation requires a logged-in user.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Checkout was attempted with an empty cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Local session storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A value could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Returns true for a 401/403 answer from the backend.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Status { status: 401 | 403, .. })
    }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
