//! Catalog data contract and catalog queries.

mod product;
mod query;

pub use product::{Category, Product};
pub use query::{CatalogQuery, FEATURED_LIMIT, PriceRange, SortOrder, featured};

use crate::cart::Money;
use thiserror::Error;

/// Errors that can occur while building catalog queries.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The sort key is not one of the known orders.
    #[error("Invalid sort order: {0} (expected name, price-asc or price-desc)")]
    InvalidSortOrder(String),

    /// The lower bound is above the upper bound.
    #[error("Invalid price range: {min} > {max}")]
    InvalidPriceRange { min: Money, max: Money },
}
