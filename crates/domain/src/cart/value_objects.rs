//! Value objects for the cart domain.

use common::ProductId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Image shown for products and cart lines without their own image.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.svg?height=80&width=80";

/// A monetary amount in euros, held as whole cents.
///
/// On the wire (backend JSON and the persisted cart) amounts are plain
/// numbers in major units, e.g. `59.99`. They are rounded to the nearest
/// cent when read so that sums and products stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money {
    /// Amount in cents (e.g., 5999 = 59.99€)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Creates a Money amount from euros, rounding to the nearest cent.
    ///
    /// Non-finite input yields zero.
    pub fn from_major(amount: f64) -> Self {
        if !amount.is_finite() {
            return Self::zero();
        }
        Self {
            cents: (amount * 100.0).round() as i64,
        }
    }

    /// Returns zero money.
    pub const fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the amount in euros.
    pub fn to_major(&self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Returns the whole-euro portion.
    pub fn euros(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after euros).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        self.cents < 0
    }

    /// Multiplies by a quantity, saturating at the `i64` cent bounds.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            cents: self.cents.saturating_mul(i64::from(quantity)),
        }
    }

    /// Multiplies by a quantity. Returns `None` on overflow.
    pub fn checked_multiply(&self, quantity: u32) -> Option<Money> {
        self.cents
            .checked_mul(i64::from(quantity))
            .map(Money::from_cents)
    }

    /// Adds two amounts. Returns `None` on overflow.
    pub fn checked_add(&self, rhs: Money) -> Option<Money> {
        self.cents.checked_add(rhs.cents).map(Money::from_cents)
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        write!(
            f,
            "{sign}{}.{:02}€",
            self.euros().abs(),
            self.cents_part()
        )
    }
}

/// Error returned when an amount cannot be parsed.
#[derive(Debug, Clone, Error)]
#[error("Invalid amount: {0:?}")]
pub struct ParseMoneyError(String);

impl std::str::FromStr for Money {
    type Err = ParseMoneyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_end_matches('€').trim();
        let amount: f64 = trimmed
            .replace(',', ".")
            .parse()
            .map_err(|_| ParseMoneyError(s.to_string()))?;
        if !amount.is_finite() {
            return Err(ParseMoneyError(s.to_string()));
        }
        Ok(Money::from_major(amount))
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_sub(rhs.cents),
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.cents = self.cents.saturating_add(rhs.cents);
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.to_major())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        if !amount.is_finite() {
            return Err(serde::de::Error::custom("amount must be a finite number"));
        }
        Ok(Money::from_major(amount))
    }
}

/// A value-added tax rate, in basis points (2100 = 21%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VatRate {
    basis_points: u32,
}

impl VatRate {
    /// The standard Spanish IVA rate, already included in catalog prices.
    pub const STANDARD: VatRate = VatRate::from_basis_points(2100);

    /// Creates a rate from basis points.
    pub const fn from_basis_points(basis_points: u32) -> Self {
        Self { basis_points }
    }

    /// Returns the rate in basis points.
    pub fn basis_points(&self) -> u32 {
        self.basis_points
    }

    /// Returns the rate as a fraction (0.21 for 21%).
    pub fn as_fraction(&self) -> f64 {
        f64::from(self.basis_points) / 10_000.0
    }
}

impl Default for VatRate {
    fn default() -> Self {
        Self::STANDARD
    }
}

impl std::fmt::Display for VatRate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let whole = self.basis_points / 100;
        let frac = self.basis_points % 100;
        if frac == 0 {
            write!(f, "{whole}%")
        } else {
            write!(f, "{whole}.{frac:02}%")
        }
    }
}

/// Split of a VAT-inclusive amount into net subtotal and VAT.
///
/// Derived on demand from the cart total; never stored. The net subtotal is
/// rounded half away from zero to the cent and the VAT is the remainder, so
/// `net + vat == gross` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaxBreakdown {
    /// VAT-inclusive total.
    pub gross: Money,
    /// Total with VAT divided out: `gross / (1 + rate)`.
    pub net: Money,
    /// VAT portion: `gross - net`.
    pub vat: Money,
    /// Rate used for the split.
    pub rate: VatRate,
}

impl TaxBreakdown {
    /// Splits a VAT-inclusive amount.
    pub fn from_gross(gross: Money, rate: VatRate) -> Self {
        let scale = 10_000_i128;
        let numerator = i128::from(gross.cents()) * scale;
        let denominator = scale + i128::from(rate.basis_points());
        let net_cents = divide_rounded(numerator, denominator);
        // |net| <= |gross|, so the narrowing cannot overflow
        let net = Money::from_cents(net_cents as i64);

        Self {
            gross,
            net,
            vat: gross - net,
            rate,
        }
    }
}

/// Integer division rounding half away from zero. `denominator` must be positive.
fn divide_rounded(numerator: i128, denominator: i128) -> i128 {
    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    if 2 * remainder.abs() >= denominator {
        quotient + numerator.signum()
    } else {
        quotient
    }
}

/// A product entry in the cart.
///
/// Name, price and image are snapshots taken when the product was added;
/// they are not refreshed from the catalog afterwards. Stored with the
/// backend's product field names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// The catalog product this line refers to. Unique within a cart.
    #[serde(rename = "id_producto")]
    pub product_id: ProductId,

    /// Display name at the time of adding.
    #[serde(rename = "nombre")]
    pub name: String,

    /// VAT-inclusive price per unit at the time of adding.
    #[serde(rename = "precio")]
    pub unit_price: Money,

    /// Units requested.
    #[serde(rename = "cantidad")]
    pub quantity: u32,

    /// Display image at the time of adding.
    #[serde(rename = "imagen_url", default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl CartLineItem {
    /// Creates a new line item without an image.
    pub fn new(
        product_id: impl Into<ProductId>,
        name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            name: name.into(),
            unit_price,
            quantity,
            image_url: None,
        }
    }

    /// Sets the display image.
    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    /// Returns the total price for this line (quantity * unit_price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }

    /// Returns the image to display, falling back to the placeholder.
    pub fn display_image(&self) -> &str {
        self.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }
}
