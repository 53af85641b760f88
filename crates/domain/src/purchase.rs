//! Completed purchases, as returned by the purchase history endpoint.

use chrono::{DateTime, Utc};
use common::{ProductId, PurchaseId, UserId};
use serde::{Deserialize, Serialize};

use crate::cart::Money;
use crate::wire;

/// A completed purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Purchase {
    #[serde(rename = "id_compra")]
    pub id: PurchaseId,

    #[serde(rename = "id_usuario")]
    pub user_id: UserId,

    /// Amount charged, VAT included.
    pub total: Money,

    #[serde(
        rename = "fecha_compra",
        default,
        deserialize_with = "wire::lenient_datetime"
    )]
    pub purchased_at: Option<DateTime<Utc>>,

    #[serde(rename = "detalles", default, deserialize_with = "wire::null_as_default")]
    pub lines: Vec<PurchaseLine>,
}

impl Purchase {
    /// Total units bought.
    pub fn unit_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }
}

/// One product within a purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PurchaseLine {
    #[serde(rename = "id_detalle", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(rename = "id_producto")]
    pub product_id: ProductId,

    #[serde(rename = "cantidad")]
    pub quantity: u32,

    #[serde(rename = "precio_unitario")]
    pub unit_price: Money,
}

impl PurchaseLine {
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_purchase_with_lines() {
        let purchase: Purchase = serde_json::from_value(json!({
            "id_compra": 10,
            "id_usuario": 3,
            "total": 84.98,
            "fecha_compra": "2024-06-02T18:45:10.512000",
            "detalles": [
                { "id_detalle": 1, "id_compra": 10, "id_producto": 1, "cantidad": 1, "precio_unitario": 59.99 },
                { "id_detalle": 2, "id_compra": 10, "id_producto": 2, "cantidad": 1, "precio_unitario": 24.99 }
            ]
        }))
        .unwrap();

        assert_eq!(purchase.id, PurchaseId::new(10));
        assert_eq!(purchase.total, Money::from_cents(8498));
        assert!(purchase.purchased_at.is_some());
        assert_eq!(purchase.unit_count(), 2);
        assert_eq!(purchase.lines[1].line_total(), Money::from_cents(2499));
    }

    #[test]
    fn test_deserialize_purchase_without_lines() {
        let purchase: Purchase = serde_json::from_value(json!({
            "id_compra": 11,
            "id_usuario": 3,
            "total": 0.0,
            "fecha_compra": "2024-06-02T18:45:10",
            "detalles": null
        }))
        .unwrap();

        assert!(purchase.lines.is_empty());
        assert_eq!(purchase.unit_count(), 0);
    }
}
