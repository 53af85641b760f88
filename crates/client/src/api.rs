//! Storefront backend API trait and its request/response types.

use async_trait::async_trait;
use common::{ProductId, UserId};
use domain::{CartLineItem, Category, Product, Purchase};
use serde::{Deserialize, Serialize};

use crate::auth::User;
use crate::error::Result;

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: User,
}

/// One product in a payment session request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentLine {
    #[serde(rename = "id_producto")]
    pub product_id: ProductId,

    #[serde(rename = "cantidad")]
    pub quantity: u32,
}

impl From<&CartLineItem> for PaymentLine {
    fn from(item: &CartLineItem) -> Self {
        Self {
            product_id: item.product_id,
            quantity: item.quantity,
        }
    }
}

/// A hosted payment page the user is redirected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentSession {
    #[serde(rename = "url_pago")]
    pub payment_url: String,
}

/// Operations the storefront backend exposes to the client.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Lists every product in the catalog.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Fetches one product. Fails with `NotFound` for an unknown id.
    async fn get_product(&self, id: ProductId) -> Result<Product>;

    /// Lists every category.
    async fn list_categories(&self) -> Result<Vec<Category>>;

    /// Exchanges credentials for a bearer token and the user profile.
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;

    /// Lists a user's completed purchases.
    async fn purchase_history(&self, user_id: UserId) -> Result<Vec<Purchase>>;

    /// Opens a payment session for the given lines.
    async fn create_payment_session(
        &self,
        token: &str,
        lines: &[PaymentLine],
    ) -> Result<PaymentSession>;
}
