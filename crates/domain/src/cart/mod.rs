//! Cart aggregate and related types.

mod aggregate;
mod commands;
mod events;
mod store;
mod value_objects;

pub use aggregate::Cart;
pub use commands::CartCommand;
pub use events::{
    CartClearedData, CartEvent, ItemAddedData, ItemQuantityUpdatedData, ItemRemovedData,
};
pub use store::{
    CART_STORAGE_KEY, CartStore, CartSummary, NOTIFICATION_TTL_MS, POPOVER_AUTO_CLOSE_MS,
    load_cart,
};
pub use value_objects::{
    CartLineItem, Money, PLACEHOLDER_IMAGE, ParseMoneyError, TaxBreakdown, VatRate,
};

use common::ProductId;
use thiserror::Error;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity is outside the accepted range.
    #[error("Invalid quantity: {quantity} (must be at least 1)")]
    InvalidQuantity { quantity: i64 },

    /// Unit price is negative.
    #[error("Invalid price for product {product_id}: {price} (must not be negative)")]
    InvalidPrice { product_id: ProductId, price: Money },

    /// The resulting quantity does not fit in a line item.
    #[error("Quantity overflow for product {product_id}")]
    QuantityOverflow { product_id: ProductId },

    /// The resulting line or cart total does not fit in the money range.
    #[error("Total overflow for product {product_id}")]
    TotalOverflow { product_id: ProductId },
}
