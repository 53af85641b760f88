//! Cart commands.

use common::ProductId;

use super::CartLineItem;

/// An intention to change the cart.
///
/// Commands are validated by [`super::Cart`] and turned into events; a
/// command that changes nothing produces no events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    /// Add a line, or increase the quantity of an existing line.
    AddItem(CartLineItem),

    /// Remove a line. No-op if absent.
    RemoveItem(ProductId),

    /// Set a line's quantity exactly. Zero or negative removes the line.
    UpdateQuantity {
        product_id: ProductId,
        quantity: i64,
    },

    /// Remove every line.
    Clear,
}

impl CartCommand {
    /// Creates an AddItem command.
    pub fn add(item: CartLineItem) -> Self {
        CartCommand::AddItem(item)
    }

    /// Creates a RemoveItem command.
    pub fn remove(product_id: ProductId) -> Self {
        CartCommand::RemoveItem(product_id)
    }

    /// Creates an UpdateQuantity command.
    pub fn update_quantity(product_id: ProductId, quantity: i64) -> Self {
        CartCommand::UpdateQuantity {
            product_id,
            quantity,
        }
    }

    /// Returns the command name used in tracing output.
    pub fn name(&self) -> &'static str {
        match self {
            CartCommand::AddItem(_) => "add_item",
            CartCommand::RemoveItem(_) => "remove_item",
            CartCommand::UpdateQuantity { .. } => "update_quantity",
            CartCommand::Clear => "clear",
        }
    }
}
