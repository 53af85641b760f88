//! Shared types for the NovaForge storefront crates.

mod types;

pub use types::{CategoryId, ProductId, PurchaseId, SupplierId, UserId};
