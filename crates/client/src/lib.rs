//! Storefront backend client.
//!
//! Provides:
//! - `StorefrontApi` trait with reqwest-backed and in-memory implementations
//! - The empty-on-failure fetch policy for list views
//! - The persisted auth session and the checkout handoff

pub mod api;
pub mod auth;
pub mod catalog;
pub mod checkout;
pub mod error;
pub mod fetch;
pub mod http;
pub mod memory;

pub use api::{Credentials, LoginResponse, PaymentLine, PaymentSession, StorefrontApi};
pub use auth::{AuthSession, TOKEN_STORAGE_KEY, USER_STORAGE_KEY, User};
pub use catalog::CatalogService;
pub use checkout::CheckoutService;
pub use error::{ClientError, Result};
pub use fetch::fetch_or_empty;
pub use http::HttpStorefrontApi;
pub use memory::InMemoryStorefrontApi;
