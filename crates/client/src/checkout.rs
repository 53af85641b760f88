//! Checkout handoff to the hosted payment page.

use domain::CartStore;
use storage::DurableStorage;

use crate::api::{PaymentLine, PaymentSession, StorefrontApi};
use crate::auth::AuthSession;
use crate::error::{ClientError, Result};

/// Drives a cart through payment.
///
/// `begin` opens a payment session and returns its URL. The user then lands
/// on either the success or the failure return page, which call `complete`
/// or `cancel`.
#[derive(Debug, Clone)]
pub struct CheckoutService<A> {
    api: A,
}

impl<A: StorefrontApi> CheckoutService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Opens a payment session for the cart's lines.
    ///
    /// The cart is left untouched until the payment outcome is known.
    #[tracing::instrument(skip_all, fields(lines = cart.items().len()))]
    pub async fn begin<S, T>(
        &self,
        cart: &CartStore<S>,
        session: &AuthSession<T>,
    ) -> Result<PaymentSession>
    where
        S: DurableStorage,
        T: DurableStorage,
    {
        if cart.is_empty() {
            return Err(ClientError::EmptyCart);
        }
        let token = session.token().ok_or(ClientError::NotAuthenticated)?;

        let lines: Vec<PaymentLine> = cart.items().iter().map(PaymentLine::from).collect();
        let payment = self.api.create_payment_session(token, &lines).await?;

        metrics::counter!("checkout_sessions_created").increment(1);
        tracing::info!(total = %cart.total(), "payment session created");
        Ok(payment)
    }

    /// Payment succeeded: the cart is emptied.
    #[tracing::instrument(skip_all)]
    pub fn complete<S: DurableStorage>(&self, cart: &mut CartStore<S>) {
        tracing::info!(units = cart.count(), "payment completed, clearing cart");
        metrics::counter!("checkout_completed").increment(1);
        cart.clear();
    }

    /// Payment failed or was abandoned: the cart is kept for another attempt.
    #[tracing::instrument(skip_all)]
    pub fn cancel<S: DurableStorage>(&self, cart: &CartStore<S>) {
        tracing::info!(units = cart.count(), "payment cancelled, keeping cart");
        metrics::counter!("checkout_cancelled").increment(1);
    }
}
