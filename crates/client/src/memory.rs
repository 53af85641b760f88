//! In-memory storefront backend for tests and offline demos.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use common::{ProductId, PurchaseId, UserId};
use domain::{Category, Money, Product, Purchase, PurchaseLine};

use crate::api::{Credentials, LoginResponse, PaymentLine, PaymentSession, StorefrontApi};
use crate::auth::User;
use crate::error::{ClientError, Result};

#[derive(Debug, Default)]
struct InMemoryBackendState {
    products: Vec<Product>,
    categories: Vec<Category>,
    users: HashMap<String, (String, User)>,
    tokens: HashMap<String, UserId>,
    purchases: Vec<Purchase>,
    payment_sessions: Vec<Vec<PaymentLine>>,
    next_id: u32,
    fail_requests: bool,
}

/// In-memory storefront backend.
///
/// Clones share state. Payment sessions validate stock and record a purchase
/// the way the real backend does.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStorefrontApi {
    state: Arc<RwLock<InMemoryBackendState>>,
}

impl InMemoryStorefrontApi {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend serving the given catalog.
    pub fn with_catalog(products: Vec<Product>, categories: Vec<Category>) -> Self {
        let api = Self::new();
        {
            let mut state = api.write();
            state.products = products;
            state.categories = categories;
        }
        api
    }

    /// Registers a user that can log in with `password`.
    pub fn add_user(&self, email: impl Into<String>, password: impl Into<String>, user: User) {
        self.write()
            .users
            .insert(email.into(), (password.into(), user));
    }

    /// Configures every subsequent request to fail as if the backend were down.
    pub fn set_fail_requests(&self, fail: bool) {
        self.write().fail_requests = fail;
    }

    /// Returns the number of payment sessions opened.
    pub fn payment_session_count(&self) -> usize {
        self.read().payment_sessions.len()
    }

    /// Returns the lines of the most recent payment session.
    pub fn last_payment_lines(&self) -> Option<Vec<PaymentLine>> {
        self.read().payment_sessions.last().cloned()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, InMemoryBackendState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, InMemoryBackendState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_available(&self) -> Result<()> {
        if self.read().fail_requests {
            return Err(ClientError::Unavailable("backend is down".to_string()));
        }
        Ok(())
    }
}

fn unauthorized(detail: &str) -> ClientError {
    ClientError::Status {
        status: 401,
        detail: detail.to_string(),
    }
}

#[async_trait]
impl StorefrontApi for InMemoryStorefrontApi {
    async fn list_products(&self) -> Result<Vec<Product>> {
        self.check_available()?;
        Ok(self.read().products.clone())
    }

    async fn get_product(&self, id: ProductId) -> Result<Product> {
        self.check_available()?;
        self.read()
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("product {id}")))
    }

    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.check_available()?;
        Ok(self.read().categories.clone())
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.check_available()?;
        let mut state = self.write();

        let user = match state.users.get(&credentials.email) {
            Some((password, user)) if *password == credentials.password => user.clone(),
            _ => return Err(unauthorized("Incorrect email or password")),
        };

        state.next_id += 1;
        let token = format!("TOKEN-{:04}", state.next_id);
        state.tokens.insert(token.clone(), user.id);

        Ok(LoginResponse {
            access_token: token,
            token_type: "bearer".to_string(),
            user,
        })
    }

    async fn purchase_history(&self, user_id: UserId) -> Result<Vec<Purchase>> {
        self.check_available()?;
        Ok(self
            .read()
            .purchases
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_payment_session(
        &self,
        token: &str,
        lines: &[PaymentLine],
    ) -> Result<PaymentSession> {
        self.check_available()?;
        let mut state = self.write();

        let user_id = *state
            .tokens
            .get(token)
            .ok_or_else(|| unauthorized("Could not validate credentials"))?;

        let mut purchase_lines = Vec::with_capacity(lines.len());
        for line in lines {
            let product = state
                .products
                .iter()
                .find(|p| p.id == line.product_id)
                .ok_or_else(|| ClientError::NotFound(format!("product {}", line.product_id)))?;
            if product.stock < line.quantity {
                return Err(ClientError::Status {
                    status: 400,
                    detail: format!("Insufficient stock for {}", product.name),
                });
            }
            purchase_lines.push(PurchaseLine {
                id: None,
                product_id: product.id,
                quantity: line.quantity,
                unit_price: product.price,
            });
        }

        state.next_id += 1;
        let id = state.next_id;
        let total: Money = purchase_lines.iter().map(PurchaseLine::line_total).sum();
        state.purchases.push(Purchase {
            id: PurchaseId::new(i64::from(id)),
            user_id,
            total,
            purchased_at: None,
            lines: purchase_lines,
        });
        state.payment_sessions.push(lines.to_vec());

        Ok(PaymentSession {
            payment_url: format!("https://pay.invalid/session/{id:04}"),
        })
    }
}
