//! Catalog filtering, sorting and the featured selection.

use std::cmp::Ordering;
use std::str::FromStr;

use common::CategoryId;

use super::{CatalogError, Product};
use crate::cart::Money;

/// Number of products on the featured shelf.
pub const FEATURED_LIMIT: usize = 8;

/// Catalog sort orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Alphabetical, case-insensitive.
    #[default]
    Name,
    PriceAscending,
    PriceDescending,
}

impl SortOrder {
    /// Returns the canonical key for this order.
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Name => "name",
            SortOrder::PriceAscending => "price-asc",
            SortOrder::PriceDescending => "price-desc",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortOrder::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortOrder::PriceAscending => a.price.cmp(&b.price),
            SortOrder::PriceDescending => b.price.cmp(&a.price),
        }
    }
}

impl FromStr for SortOrder {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" | "nombre" => Ok(SortOrder::Name),
            "price-asc" | "precio-asc" => Ok(SortOrder::PriceAscending),
            "price-desc" | "precio-desc" => Ok(SortOrder::PriceDescending),
            _ => Err(CatalogError::InvalidSortOrder(s.to_string())),
        }
    }
}

impl std::fmt::Display for SortOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive price bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    min: Money,
    max: Money,
}

impl PriceRange {
    /// Creates a range. Fails if `min > max`.
    pub fn new(min: Money, max: Money) -> Result<Self, CatalogError> {
        if min > max {
            return Err(CatalogError::InvalidPriceRange { min, max });
        }
        Ok(Self { min, max })
    }

    /// The cheapest to the most expensive product. `None` for an empty catalog.
    pub fn spanning<'a>(products: impl IntoIterator<Item = &'a Product>) -> Option<Self> {
        products.into_iter().fold(None, |range, p| {
            Some(match range {
                None => Self {
                    min: p.price,
                    max: p.price,
                },
                Some(r) => Self {
                    min: r.min.min(p.price),
                    max: r.max.max(p.price),
                },
            })
        })
    }

    pub fn min(&self) -> Money {
        self.min
    }

    pub fn max(&self) -> Money {
        self.max
    }

    pub fn contains(&self, price: Money) -> bool {
        self.min <= price && price <= self.max
    }
}

/// A catalog listing request: optional filters plus a sort order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogQuery {
    pub category: Option<CategoryId>,
    pub price_range: Option<PriceRange>,
    pub sort: SortOrder,
}

impl CatalogQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn priced_within(mut self, range: PriceRange) -> Self {
        self.price_range = Some(range);
        self
    }

    pub fn sorted_by(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    /// Returns true if `product` passes every filter.
    pub fn matches(&self, product: &Product) -> bool {
        let category_ok = self
            .category
            .is_none_or(|category| product.category_id == Some(category));
        let price_ok = self
            .price_range
            .is_none_or(|range| range.contains(product.price));
        category_ok && price_ok
    }

    /// Filters and sorts `products`. The sort is stable.
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        let mut matching: Vec<&Product> = products.iter().filter(|p| self.matches(p)).collect();
        matching.sort_by(|a, b| self.sort.compare(a, b));
        matching
    }
}

/// The newest [`FEATURED_LIMIT`] products, most recent first.
///
/// Products without a creation date go last. Ties keep backend order.
pub fn featured(products: &[Product]) -> Vec<&Product> {
    let mut sorted: Vec<&Product> = products.iter().collect();
    // Reverse on Option puts None last
    sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    sorted.truncate(FEATURED_LIMIT);
    sorted
}
