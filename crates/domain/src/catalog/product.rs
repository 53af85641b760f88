//! Catalog entities as served by the storefront backend.

use chrono::{DateTime, Utc};
use common::{CategoryId, ProductId, SupplierId};
use serde::{Deserialize, Serialize};

use crate::cart::{CartLineItem, Money, PLACEHOLDER_IMAGE};
use crate::wire;

/// A product in the catalog.
///
/// Optional backend fields default once here, so consumers never deal with
/// missing keys, nulls or blank strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "id_producto")]
    pub id: ProductId,

    #[serde(rename = "nombre")]
    pub name: String,

    #[serde(
        rename = "descripción",
        alias = "descripcion",
        default,
        deserialize_with = "wire::blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    /// VAT-inclusive unit price.
    #[serde(rename = "precio")]
    pub price: Money,

    /// Units in stock. The backend may report negative stock, read as 0.
    #[serde(rename = "cantidad", default, deserialize_with = "wire::clamped_count")]
    pub stock: u32,

    #[serde(rename = "id_categoria", default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,

    #[serde(rename = "id_proveedor", default, skip_serializing_if = "Option::is_none")]
    pub supplier_id: Option<SupplierId>,

    #[serde(
        rename = "imagen_url",
        default,
        deserialize_with = "wire::blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<String>,

    #[serde(
        rename = "fecha_creacion",
        default,
        deserialize_with = "wire::lenient_datetime",
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Returns true if at least one unit is in stock.
    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }

    /// Snapshots this product into a cart line.
    pub fn to_line_item(&self, quantity: u32) -> CartLineItem {
        let item = CartLineItem::new(self.id, self.name.clone(), self.price, quantity);
        match &self.image_url {
            Some(url) => item.with_image(url.clone()),
            None => item,
        }
    }

    /// Returns the image URL, or the placeholder path when there is none.
    pub fn display_image(&self) -> &str {
        self.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }
}

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "id_categoria")]
    pub id: CategoryId,

    #[serde(rename = "nombre")]
    pub name: String,
}
