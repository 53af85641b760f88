//! reqwest-backed storefront API.

use std::time::Duration;

use async_trait::async_trait;
use common::{ProductId, UserId};
use domain::{Category, Product, Purchase};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::api::{Credentials, LoginResponse, PaymentLine, PaymentSession, StorefrontApi};
use crate::error::{ClientError, Result};

/// Header carrying a per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

const USER_AGENT: &str = concat!("novaforge/", env!("CARGO_PKG_VERSION"));

/// Storefront API client over HTTP.
#[derive(Debug, Clone)]
pub struct HttpStorefrontApi {
    client: Client,
    base_url: String,
}

impl HttpStorefrontApi {
    /// Creates a client for `base_url` with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::with_client(client, base_url))
    }

    /// Creates a client from a preconfigured `reqwest::Client`.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder, resource: &str) -> Result<T> {
        let request_id = uuid::Uuid::new_v4().to_string();
        let response = request
            .header(REQUEST_ID_HEADER, &request_id)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(%request_id, %status, resource, "backend response");

        if status == StatusCode::NOT_FOUND {
            return Err(ClientError::NotFound(resource.to_string()));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                detail: error_detail(status, &body),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

/// Extracts the backend's `{"detail": ...}` message, falling back to the raw
/// body or the status reason.
fn error_detail(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body)
        && let Some(detail) = value.get("detail")
    {
        return match detail.as_str() {
            Some(text) => text.to_string(),
            None => detail.to_string(),
        };
    }

    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        body.to_string()
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    #[tracing::instrument(skip(self))]
    async fn list_products(&self) -> Result<Vec<Product>> {
        self.send(self.client.get(self.url("/productos/")), "products")
            .await
    }

    #[tracing::instrument(skip(self))]
    async fn get_product(&self, id: ProductId) -> Result<Product> {
        self.send(
            self.client.get(self.url(&format!("/productos/{id}"))),
            &format!("product {id}"),
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn list_categories(&self) -> Result<Vec<Category>> {
        self.send(self.client.get(self.url("/categorias/")), "categories")
            .await
    }

    #[tracing::instrument(skip(self, credentials), fields(email = %credentials.email))]
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.send(
            self.client.post(self.url("/usuarios/login")).json(credentials),
            "login",
        )
        .await
    }

    #[tracing::instrument(skip(self))]
    async fn purchase_history(&self, user_id: UserId) -> Result<Vec<Purchase>> {
        self.send(
            self.client
                .get(self.url(&format!("/compras/usuario/{user_id}"))),
            &format!("purchases of user {user_id}"),
        )
        .await
    }

    #[tracing::instrument(skip(self, token, lines), fields(lines = lines.len()))]
    async fn create_payment_session(
        &self,
        token: &str,
        lines: &[PaymentLine],
    ) -> Result<PaymentSession> {
        self.send(
            self.client
                .post(self.url("/crear-sesion-pago"))
                .bearer_auth(token)
                .json(lines),
            "payment session",
        )
        .await
    }
}
