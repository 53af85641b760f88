//! Domain layer for the NovaForge storefront.
//!
//! This crate provides:
//! - Aggregate trait for event-applying entities
//! - Cart aggregate with its commands, events and persisted store
//! - Money, VAT rate and tax breakdown value objects
//! - Catalog data contract (products, categories) and catalog queries
//! - Purchase history records

pub mod aggregate;
pub mod cart;
pub mod catalog;
pub mod error;
pub mod purchase;
mod wire;

pub use aggregate::{Aggregate, DomainEvent};
pub use cart::{
    CART_STORAGE_KEY, Cart, CartCommand, CartError, CartEvent, CartLineItem, CartStore,
    CartSummary, Money, PLACEHOLDER_IMAGE, TaxBreakdown, VatRate,
};
pub use catalog::{
    CatalogError, CatalogQuery, Category, FEATURED_LIMIT, PriceRange, Product, SortOrder,
    featured,
};
pub use common::{CategoryId, ProductId, PurchaseId, SupplierId, UserId};
pub use error::DomainError;
pub use purchase::{Purchase, PurchaseLine};
