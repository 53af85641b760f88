//! Persisted cart store for a client session.

use chrono::{DateTime, TimeDelta, Utc};
use common::ProductId;
use storage::{DurableStorage, DurableStorageExt, StorageError};
use tokio::sync::watch;

use crate::aggregate::{Aggregate, DomainEvent};

use super::{Cart, CartCommand, CartError, CartEvent, CartLineItem, Money, TaxBreakdown, VatRate};

/// Storage key holding the JSON array of cart lines.
pub const CART_STORAGE_KEY: &str = "cart";

/// How long the "added to cart" notification stays visible.
pub const NOTIFICATION_TTL_MS: i64 = 3_000;

/// How long the mini-cart popover stays open after an add.
pub const POPOVER_AUTO_CLOSE_MS: i64 = 4_000;

/// Snapshot of the derived cart figures, published after every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    /// Number of distinct lines.
    pub line_count: usize,
    /// Total units across all lines.
    pub unit_count: u64,
    /// VAT-inclusive total.
    pub total: Money,
}

impl CartSummary {
    fn of(cart: &Cart) -> Self {
        Self {
            line_count: cart.line_count(),
            unit_count: cart.count(),
            total: cart.total(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct AddedNotification {
    product_id: ProductId,
    expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Popover {
    open: bool,
    auto_close_at: Option<DateTime<Utc>>,
}

/// Reads the stored cart lines.
///
/// Returns an empty cart when nothing is stored. Stored lines are normalized
/// with [`Cart::from_items`].
pub fn load_cart<S: DurableStorage + ?Sized>(storage: &S) -> Result<Cart, StorageError> {
    let items: Option<Vec<CartLineItem>> = storage.get_json(CART_STORAGE_KEY)?;
    Ok(items.map(Cart::from_items).unwrap_or_default())
}

/// The session's cart, persisted to durable storage after every change.
///
/// Constructed explicitly with its storage backend and passed to whichever
/// views need it. Mutations are synchronous and applied in call order.
///
/// Persistence is best-effort: a failed write is logged and the in-memory
/// cart stays authoritative for the rest of the session.
pub struct CartStore<S: DurableStorage> {
    storage: S,
    cart: Cart,
    vat_rate: VatRate,
    notification: Option<AddedNotification>,
    popover: Popover,
    summary_tx: watch::Sender<CartSummary>,
}

impl<S: DurableStorage> CartStore<S> {
    /// Opens the cart stored in `storage`.
    ///
    /// Missing or unreadable data starts an empty cart; the failure is logged
    /// and never surfaced.
    #[tracing::instrument(skip(storage))]
    pub fn open(storage: S) -> Self {
        let cart = match load_cart(&storage) {
            Ok(cart) => cart,
            Err(error) => {
                tracing::warn!(%error, "stored cart is unreadable, starting empty");
                metrics::counter!("cart_load_failures").increment(1);
                Cart::default()
            }
        };

        tracing::debug!(lines = cart.line_count(), "cart opened");
        let (summary_tx, _) = watch::channel(CartSummary::of(&cart));

        Self {
            storage,
            cart,
            vat_rate: VatRate::STANDARD,
            notification: None,
            popover: Popover::default(),
            summary_tx,
        }
    }

    /// Overrides the VAT rate used for [`Self::tax_breakdown`].
    pub fn with_vat_rate(mut self, rate: VatRate) -> Self {
        self.vat_rate = rate;
        self
    }

    /// Returns a reference to the underlying storage.
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Returns the current cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Validates and applies a command, then persists the cart.
    ///
    /// Returns the applied events. A command that changes nothing returns an
    /// empty list and does not touch storage.
    #[tracing::instrument(skip(self, command), fields(command = command.name()))]
    pub fn execute(&mut self, command: CartCommand) -> Result<Vec<CartEvent>, CartError> {
        let events = self.cart.handle(command)?;
        Ok(self.commit(events))
    }

    /// Applies already validated events, persists and publishes the summary.
    fn commit(&mut self, events: Vec<CartEvent>) -> Vec<CartEvent> {
        if events.is_empty() {
            return events;
        }

        for event in &events {
            tracing::debug!(event = event.event_type(), product_id = ?event.product_id(), "applying");
            metrics::counter!("cart_events", "type" => event.event_type()).increment(1);
        }

        self.cart.apply_events(events.iter().cloned());
        self.persist();
        self.summary_tx.send_replace(CartSummary::of(&self.cart));

        events
    }

    /// Adds a line item, merging with an existing line for the same product.
    ///
    /// Raises the "added" notification for the product and opens the popover,
    /// which closes itself after [`POPOVER_AUTO_CLOSE_MS`].
    pub fn add_item(&mut self, item: CartLineItem) -> Result<(), CartError> {
        let product_id = item.product_id;
        self.execute(CartCommand::add(item))?;

        let now = Utc::now();
        self.notification = Some(AddedNotification {
            product_id,
            expires_at: now + TimeDelta::milliseconds(NOTIFICATION_TTL_MS),
        });
        self.popover = Popover {
            open: true,
            auto_close_at: Some(now + TimeDelta::milliseconds(POPOVER_AUTO_CLOSE_MS)),
        };
        metrics::counter!("cart_items_added").increment(1);
        Ok(())
    }

    /// Removes a product's line. No-op if absent.
    pub fn remove_item(&mut self, product_id: ProductId) {
        let events = self.cart.remove_item(product_id);
        self.commit(events);
    }

    /// Sets a line's quantity. Zero or negative removes the line.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) -> Result<(), CartError> {
        self.execute(CartCommand::update_quantity(product_id, quantity))
            .map(|_| ())
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        let events = self.cart.clear();
        if !self.commit(events).is_empty() {
            metrics::counter!("cart_cleared").increment(1);
        }
    }

    /// Returns the lines in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        self.cart.items()
    }

    /// Returns the VAT-inclusive total.
    pub fn total(&self) -> Money {
        self.cart.total()
    }

    /// Returns the total unit count.
    pub fn count(&self) -> u64 {
        self.cart.count()
    }

    /// Returns true if the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// Splits the total into net subtotal and VAT at the configured rate.
    pub fn tax_breakdown(&self) -> TaxBreakdown {
        self.cart.tax_breakdown(self.vat_rate)
    }

    /// Returns the current summary.
    pub fn summary(&self) -> CartSummary {
        *self.summary_tx.borrow()
    }

    /// Subscribes to summary changes, e.g. for a cart badge.
    pub fn subscribe(&self) -> watch::Receiver<CartSummary> {
        self.summary_tx.subscribe()
    }

    /// Returns the product from the most recent add while its notification
    /// is still visible.
    pub fn added_notification(&self) -> Option<ProductId> {
        self.added_notification_at(Utc::now())
    }

    /// Same as [`Self::added_notification`], evaluated at `now`.
    pub fn added_notification_at(&self, now: DateTime<Utc>) -> Option<ProductId> {
        self.notification
            .filter(|n| now < n.expires_at)
            .map(|n| n.product_id)
    }

    /// Returns the line to show in the "added to cart" notification.
    ///
    /// `None` once the notification expired or the line has since left the cart.
    pub fn added_line(&self) -> Option<&CartLineItem> {
        self.added_notification()
            .and_then(|product_id| self.cart.get_item(product_id))
    }

    /// Returns true if the mini-cart popover is open.
    pub fn is_popover_open(&self) -> bool {
        self.is_popover_open_at(Utc::now())
    }

    /// Same as [`Self::is_popover_open`], evaluated at `now`.
    pub fn is_popover_open_at(&self, now: DateTime<Utc>) -> bool {
        match self.popover.auto_close_at {
            Some(deadline) => self.popover.open && now < deadline,
            None => self.popover.open,
        }
    }

    /// Opens or closes the popover. Cancels any pending auto-close.
    pub fn set_popover_open(&mut self, open: bool) {
        self.popover = Popover {
            open,
            auto_close_at: None,
        };
    }

    fn persist(&self) {
        if let Err(error) = self.storage.set_json(CART_STORAGE_KEY, &self.cart) {
            tracing::warn!(%error, "failed to persist cart");
            metrics::counter!("cart_persist_failures").increment(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::InMemoryStorage;

    fn line(id: i64, cents: i64, quantity: u32) -> CartLineItem {
        CartLineItem::new(
            ProductId::new(id),
            format!("Game {id}"),
            Money::from_cents(cents),
            quantity,
        )
    }

    #[test]
    fn test_open_without_stored_cart_is_empty() {
        let store = CartStore::open(InMemoryStorage::new());
        assert!(store.is_empty());
        assert_eq!(store.summary(), CartSummary::default());
    }

    #[test]
    fn test_open_with_corrupt_data_is_empty() {
        let storage = InMemoryStorage::with_entry(CART_STORAGE_KEY, "[{\"id_producto\": 1,");
        let store = CartStore::open(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn test_open_with_wrong_shape_is_empty() {
        let storage = InMemoryStorage::with_entry(CART_STORAGE_KEY, "{\"items\": []}");
        let store = CartStore::open(storage);
        assert!(store.is_empty());
    }

    #[test]
    fn test_every_mutation_is_persisted() {
        let storage = InMemoryStorage::new();
        let mut store = CartStore::open(storage.clone());

        store.add_item(line(1, 1000, 1)).unwrap();
        store.update_quantity(ProductId::new(1), 3).unwrap();
        store.add_item(line(2, 500, 1)).unwrap();
        store.remove_item(ProductId::new(2));

        assert_eq!(storage.write_count(), 4);
        let stored = load_cart(&storage).unwrap();
        assert_eq!(&stored, store.cart());
    }

    #[test]
    fn test_noop_mutations_do_not_write() {
        let storage = InMemoryStorage::new();
        let mut store = CartStore::open(storage.clone());

        store.remove_item(ProductId::new(1));
        store.update_quantity(ProductId::new(1), 5).unwrap();
        store.clear();

        assert_eq!(storage.write_count(), 0);
    }

    #[test]
    fn test_rejected_add_leaves_cart_and_storage_untouched() {
        let storage = InMemoryStorage::new();
        let mut store = CartStore::open(storage.clone());

        let result = store.add_item(line(1, 1000, 0));

        assert!(matches!(result, Err(CartError::InvalidQuantity { .. })));
        assert!(store.is_empty());
        assert_eq!(storage.write_count(), 0);
        assert!(store.added_notification().is_none());
    }

    #[test]
    fn test_quantity_overflowing_total_is_rejected_without_panicking() {
        let storage = InMemoryStorage::new();
        let mut store = CartStore::open(storage.clone());
        store
            .add_item(line(1, Money::from_major(25_000_000.0).cents(), 1))
            .unwrap();

        let result = store.update_quantity(ProductId::new(1), i64::from(u32::MAX));

        assert!(matches!(result, Err(CartError::TotalOverflow { .. })));
        assert_eq!(store.count(), 1);
        assert_eq!(store.summary().total, Money::from_major(25_000_000.0));
        assert_eq!(storage.write_count(), 1);
    }

    #[test]
    fn test_write_failure_keeps_in_memory_state() {
        let storage = InMemoryStorage::new();
        storage.set_fail_on_write(true);
        let mut store = CartStore::open(storage.clone());

        store.add_item(line(1, 1000, 2)).unwrap();

        assert_eq!(store.count(), 2);
        assert!(storage.is_empty());
    }

    #[test]
    fn test_reopen_restores_lines_in_order() {
        let storage = InMemoryStorage::new();
        {
            let mut store = CartStore::open(storage.clone());
            store
                .add_item(line(3, 2999, 1).with_image("https://cdn.example/3.png"))
                .unwrap();
            store.add_item(line(1, 5999, 2)).unwrap();
        }

        let store = CartStore::open(storage);
        let ids: Vec<i64> = store.items().iter().map(|i| i.product_id.get()).collect();
        assert_eq!(ids, vec![3, 1]);
        assert_eq!(
            store.items()[0].image_url.as_deref(),
            Some("https://cdn.example/3.png")
        );
        assert_eq!(store.total(), Money::from_cents(2999 + 2 * 5999));
    }

    #[test]
    fn test_add_raises_notification_that_expires() {
        let mut store = CartStore::open(InMemoryStorage::new());
        store.add_item(line(7, 1000, 1)).unwrap();

        assert_eq!(store.added_notification(), Some(ProductId::new(7)));
        assert_eq!(store.added_line().map(|l| l.product_id), Some(ProductId::new(7)));

        let later = Utc::now() + TimeDelta::milliseconds(NOTIFICATION_TTL_MS + 1);
        assert!(store.added_notification_at(later).is_none());
    }

    #[test]
    fn test_notification_follows_latest_add() {
        let mut store = CartStore::open(InMemoryStorage::new());
        store.add_item(line(1, 1000, 1)).unwrap();
        store.add_item(line(2, 1000, 1)).unwrap();

        assert_eq!(store.added_notification(), Some(ProductId::new(2)));
    }

    #[test]
    fn test_added_line_is_none_after_removal() {
        let mut store = CartStore::open(InMemoryStorage::new());
        store.add_item(line(1, 1000, 1)).unwrap();
        store.remove_item(ProductId::new(1));

        assert_eq!(store.added_notification(), Some(ProductId::new(1)));
        assert!(store.added_line().is_none());
    }

    #[test]
    fn test_popover_opens_on_add_and_auto_closes() {
        let mut store = CartStore::open(InMemoryStorage::new());
        assert!(!store.is_popover_open());

        store.add_item(line(1, 1000, 1)).unwrap();
        assert!(store.is_popover_open());

        let later = Utc::now() + TimeDelta::milliseconds(POPOVER_AUTO_CLOSE_MS + 1);
        assert!(!store.is_popover_open_at(later));
    }

    #[test]
    fn test_set_popover_open_cancels_auto_close() {
        let mut store = CartStore::open(InMemoryStorage::new());
        store.add_item(line(1, 1000, 1)).unwrap();
        store.set_popover_open(true);

        let later = Utc::now() + TimeDelta::milliseconds(POPOVER_AUTO_CLOSE_MS + 1);
        assert!(store.is_popover_open_at(later));

        store.set_popover_open(false);
        assert!(!store.is_popover_open());
    }

    #[test]
    fn test_subscribers_see_summary_changes() {
        let mut store = CartStore::open(InMemoryStorage::new());
        let mut rx = store.subscribe();

        store.add_item(line(1, 1500, 2)).unwrap();

        assert!(rx.has_changed().unwrap());
        let summary = *rx.borrow_and_update();
        assert_eq!(summary.unit_count, 2);
        assert_eq!(summary.line_count, 1);
        assert_eq!(summary.total, Money::from_cents(3000));

        store.clear();
        assert_eq!(rx.borrow_and_update().unit_count, 0);
    }

    #[test]
    fn test_custom_vat_rate() {
        let mut store =
            CartStore::open(InMemoryStorage::new()).with_vat_rate(VatRate::from_basis_points(1000));
        store.add_item(line(1, 1100, 1)).unwrap();

        assert_eq!(store.tax_breakdown().net, Money::from_cents(1000));
    }
}
