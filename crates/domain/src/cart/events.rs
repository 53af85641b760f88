//! Cart domain events.

use common::ProductId;
use serde::{Deserialize, Serialize};

use crate::aggregate::DomainEvent;

use super::CartLineItem;

/// Events that can occur on a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CartEvent {
    /// A product not yet in the cart was added.
    ItemAdded(ItemAddedData),

    /// A line was removed.
    ItemRemoved(ItemRemovedData),

    /// A line's quantity changed, either by re-adding or by an explicit update.
    ItemQuantityUpdated(ItemQuantityUpdatedData),

    /// Every line was removed at once.
    CartCleared(CartClearedData),
}

impl DomainEvent for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "ItemAdded",
            CartEvent::ItemRemoved(_) => "ItemRemoved",
            CartEvent::ItemQuantityUpdated(_) => "ItemQuantityUpdated",
            CartEvent::CartCleared(_) => "CartCleared",
        }
    }
}

/// Data for ItemAdded event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAddedData {
    /// The new line, appended at the end of the cart.
    pub item: CartLineItem,
}

/// Data for ItemRemoved event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemovedData {
    /// The product whose line was removed.
    pub product_id: ProductId,
}

/// Data for ItemQuantityUpdated event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemQuantityUpdatedData {
    /// The product whose quantity was updated.
    pub product_id: ProductId,

    /// Previous quantity.
    pub old_quantity: u32,

    /// New quantity. Always at least 1.
    pub new_quantity: u32,
}

/// Data for CartCleared event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartClearedData {
    /// Number of lines that were in the cart.
    pub line_count: usize,
}

// Convenience constructors for events
impl CartEvent {
    /// Creates an ItemAdded event.
    pub fn item_added(item: CartLineItem) -> Self {
        CartEvent::ItemAdded(ItemAddedData { item })
    }

    /// Creates an ItemRemoved event.
    pub fn item_removed(product_id: ProductId) -> Self {
        CartEvent::ItemRemoved(ItemRemovedData { product_id })
    }

    /// Creates an ItemQuantityUpdated event.
    pub fn item_quantity_updated(
        product_id: ProductId,
        old_quantity: u32,
        new_quantity: u32,
    ) -> Self {
        CartEvent::ItemQuantityUpdated(ItemQuantityUpdatedData {
            product_id,
            old_quantity,
            new_quantity,
        })
    }

    /// Creates a CartCleared event.
    pub fn cart_cleared(line_count: usize) -> Self {
        CartEvent::CartCleared(CartClearedData { line_count })
    }

    /// Returns the product this event concerns, if it concerns a single one.
    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            CartEvent::ItemAdded(data) => Some(data.item.product_id),
            CartEvent::ItemRemoved(data) => Some(data.product_id),
            CartEvent::ItemQuantityUpdated(data) => Some(data.product_id),
            CartEvent::CartCleared(_) => None,
        }
    }
}
