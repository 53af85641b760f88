//! Catalog reads with the list-view fetch policy applied.

use common::ProductId;
use domain::{CatalogQuery, Category, Product, featured};

use crate::api::StorefrontApi;
use crate::error::Result;
use crate::fetch::fetch_or_empty;

/// Catalog screens' view of the backend.
#[derive(Debug, Clone)]
pub struct CatalogService<A> {
    api: A,
}

impl<A: StorefrontApi> CatalogService<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// Products matching `query`, filtered and sorted. Empty if the backend
    /// is unreachable.
    #[tracing::instrument(skip(self))]
    pub async fn browse(&self, query: &CatalogQuery) -> Vec<Product> {
        let products = fetch_or_empty("products", self.api.list_products()).await;
        query.apply(&products).into_iter().cloned().collect()
    }

    /// The featured shelf. Empty if the backend is unreachable.
    #[tracing::instrument(skip(self))]
    pub async fn featured(&self) -> Vec<Product> {
        let products = fetch_or_empty("products", self.api.list_products()).await;
        featured(&products).into_iter().cloned().collect()
    }

    /// All categories. Empty if the backend is unreachable.
    #[tracing::instrument(skip(self))]
    pub async fn categories(&self) -> Vec<Category> {
        fetch_or_empty("categories", self.api.list_categories()).await
    }

    /// One product. Errors propagate.
    #[tracing::instrument(skip(self))]
    pub async fn product(&self, id: ProductId) -> Result<Product> {
        self.api.get_product(id).await
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}
