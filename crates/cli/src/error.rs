use client::ClientError;
use common::ProductId;
use domain::{CartError, CatalogError, DomainError};
use thiserror::Error;

/// Errors surfaced to the command-line user.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The product exists but has no stock left.
    #[error("Product {0} is out of stock")]
    OutOfStock(ProductId),

    /// Writing to the terminal failed.
    #[error("Output error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<CartError> for CliError {
    fn from(err: CartError) -> Self {
        CliError::Domain(err.into())
    }
}

impl From<CatalogError> for CliError {
    fn from(err: CatalogError) -> Self {
        CliError::Domain(err.into())
    }
}
