//! Domain error types.

use thiserror::Error;

use crate::cart::CartError;
use crate::catalog::CatalogError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// A cart command was rejected.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// A catalog query could not be built.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
