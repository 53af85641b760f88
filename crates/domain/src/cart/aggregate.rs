//! Cart aggregate implementation.

use common::ProductId;
use serde::Serialize;

use crate::aggregate::Aggregate;

use super::{
    CartCommand, CartError, CartEvent, CartLineItem, Money, TaxBreakdown, VatRate,
    events::ItemQuantityUpdatedData,
};

/// Cart aggregate root.
///
/// An ordered list of line items keyed by product. Invariants:
/// - no two lines share a product ID
/// - every line has a quantity of at least 1
///
/// Lines keep the order in which products were first added. The cart
/// serializes as a bare JSON array of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Aggregate for Cart {
    type Event = CartEvent;
    type Error = CartError;

    fn aggregate_type() -> &'static str {
        "Cart"
    }

    fn apply(&mut self, event: Self::Event) {
        match event {
            CartEvent::ItemAdded(data) => self.items.push(data.item),
            CartEvent::ItemRemoved(data) => self.apply_item_removed(data.product_id),
            CartEvent::ItemQuantityUpdated(data) => self.apply_item_quantity_updated(data),
            CartEvent::CartCleared(_) => self.items.clear(),
        }
    }
}

impl Cart {
    /// Builds a cart from previously stored lines, restoring the invariants.
    ///
    /// Lines with a zero quantity are dropped and repeated product IDs are
    /// merged into the first occurrence by summing quantities.
    pub fn from_items(items: impl IntoIterator<Item = CartLineItem>) -> Self {
        let mut cart = Cart::default();
        for item in items {
            if item.quantity == 0 {
                continue;
            }
            match cart.position(item.product_id) {
                Some(index) => {
                    let line = &mut cart.items[index];
                    line.quantity = line.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id == product_id)
    }

    /// Checks that the cart total stays representable once `product_id`'s
    /// line holds `quantity` units at `unit_price`.
    fn ensure_total_fits(
        &self,
        product_id: ProductId,
        unit_price: Money,
        quantity: u32,
    ) -> Result<(), CartError> {
        let total = unit_price.checked_multiply(quantity).and_then(|line_total| {
            self.items
                .iter()
                .filter(|item| item.product_id != product_id)
                .try_fold(line_total, |total, item| {
                    total.checked_add(item.unit_price.checked_multiply(item.quantity)?)
                })
        });
        total.map(|_| ()).ok_or(CartError::TotalOverflow { product_id })
    }
}

// Query methods
impl Cart {
    /// Returns the lines in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Returns the line for a product.
    pub fn get_item(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.position(product_id).map(|index| &self.items[index])
    }

    /// Returns the number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Returns the total number of units across all lines.
    pub fn count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Returns the VAT-inclusive total: the sum of every line total.
    pub fn total(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Splits the total into net subtotal and VAT.
    pub fn tax_breakdown(&self, rate: VatRate) -> TaxBreakdown {
        TaxBreakdown::from_gross(self.total(), rate)
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

// Command methods (return events)
impl Cart {
    /// Validates a command and returns the events it produces.
    pub fn handle(&self, command: CartCommand) -> Result<Vec<CartEvent>, CartError> {
        match command {
            CartCommand::AddItem(item) => self.add_item(item),
            CartCommand::RemoveItem(product_id) => Ok(self.remove_item(product_id)),
            CartCommand::UpdateQuantity {
                product_id,
                quantity,
            } => self.update_quantity(product_id, quantity),
            CartCommand::Clear => Ok(self.clear()),
        }
    }

    /// Adds a line item.
    ///
    /// If the product is already in the cart its quantity is increased by
    /// `item.quantity` and the stored snapshot (name, price, image) is kept.
    pub fn add_item(&self, item: CartLineItem) -> Result<Vec<CartEvent>, CartError> {
        if item.quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity: 0 });
        }

        if item.unit_price.is_negative() {
            return Err(CartError::InvalidPrice {
                product_id: item.product_id,
                price: item.unit_price,
            });
        }

        match self.get_item(item.product_id) {
            Some(existing) => {
                let new_quantity = existing.quantity.checked_add(item.quantity).ok_or(
                    CartError::QuantityOverflow {
                        product_id: item.product_id,
                    },
                )?;
                self.ensure_total_fits(item.product_id, existing.unit_price, new_quantity)?;
                Ok(vec![CartEvent::item_quantity_updated(
                    item.product_id,
                    existing.quantity,
                    new_quantity,
                )])
            }
            None => {
                self.ensure_total_fits(item.product_id, item.unit_price, item.quantity)?;
                Ok(vec![CartEvent::item_added(item)])
            }
        }
    }

    /// Removes a product's line. Produces nothing if the product is absent.
    pub fn remove_item(&self, product_id: ProductId) -> Vec<CartEvent> {
        if self.get_item(product_id).is_some() {
            vec![CartEvent::item_removed(product_id)]
        } else {
            vec![]
        }
    }

    /// Sets a line's quantity exactly.
    ///
    /// A quantity of zero or less removes the line. Produces nothing if the
    /// product is absent or the quantity is unchanged.
    pub fn update_quantity(
        &self,
        product_id: ProductId,
        quantity: i64,
    ) -> Result<Vec<CartEvent>, CartError> {
        let Some(existing) = self.get_item(product_id) else {
            return Ok(vec![]);
        };

        if quantity <= 0 {
            return Ok(self.remove_item(product_id));
        }

        let new_quantity =
            u32::try_from(quantity).map_err(|_| CartError::QuantityOverflow { product_id })?;

        if new_quantity == existing.quantity {
            return Ok(vec![]);
        }

        self.ensure_total_fits(product_id, existing.unit_price, new_quantity)?;

        Ok(vec![CartEvent::item_quantity_updated(
            product_id,
            existing.quantity,
            new_quantity,
        )])
    }

    /// Removes every line. Produces nothing for an empty cart.
    pub fn clear(&self) -> Vec<CartEvent> {
        if self.is_empty() {
            vec![]
        } else {
            vec![CartEvent::cart_cleared(self.items.len())]
        }
    }
}

// Apply event helpers
impl Cart {
    fn apply_item_removed(&mut self, product_id: ProductId) {
        self.items.retain(|item| item.product_id != product_id);
    }

    fn apply_item_quantity_updated(&mut self, data: ItemQuantityUpdatedData) {
        if let Some(index) = self.position(data.product_id) {
            self.items[index].quantity = data.new_quantity;
        }
    }
}
