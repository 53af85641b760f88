//! Plain-text rendering of storefront data.

use std::io::{self, Write};

use client::User;
use domain::{CartLineItem, Category, Product, Purchase, TaxBreakdown};

pub fn products<W: Write>(out: &mut W, products: &[Product]) -> io::Result<()> {
    if products.is_empty() {
        return writeln!(out, "No products found.");
    }
    for product in products {
        let stock = if product.in_stock() {
            format!("{} in stock", product.stock)
        } else {
            "out of stock".to_string()
        };
        writeln!(
            out,
            "{:>5}  {:<40} {:>10}  {}",
            product.id, product.name, product.price.to_string(), stock
        )?;
    }
    writeln!(out, "{} product(s)", products.len())
}

pub fn product_detail<W: Write>(out: &mut W, product: &Product) -> io::Result<()> {
    writeln!(out, "{} (#{})", product.name, product.id)?;
    writeln!(out, "Price: {} (VAT included)", product.price)?;
    writeln!(out, "Stock: {}", product.stock)?;
    if let Some(category) = product.category_id {
        writeln!(out, "Category: {category}")?;
    }
    writeln!(out, "Image: {}", product.display_image())?;
    if let Some(description) = &product.description {
        writeln!(out)?;
        writeln!(out, "{description}")?;
    }
    Ok(())
}

pub fn categories<W: Write>(out: &mut W, categories: &[Category]) -> io::Result<()> {
    if categories.is_empty() {
        return writeln!(out, "No categories found.");
    }
    for category in categories {
        writeln!(out, "{:>5}  {}", category.id, category.name)?;
    }
    Ok(())
}

pub fn cart<W: Write>(out: &mut W, items: &[CartLineItem], tax: &TaxBreakdown) -> io::Result<()> {
    if items.is_empty() {
        return writeln!(out, "Your cart is empty.");
    }
    for item in items {
        writeln!(
            out,
            "{:>5}  {:<40} {:>3} x {:>9} = {:>10}",
            item.product_id,
            item.name,
            item.quantity,
            item.unit_price.to_string(),
            item.line_total().to_string()
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Subtotal: {:>10}", tax.net.to_string())?;
    writeln!(out, "VAT ({}): {:>10}", tax.rate, tax.vat.to_string())?;
    writeln!(out, "Total:    {:>10}", tax.gross.to_string())
}

/// The "added to cart" notification.
pub fn added<W: Write>(out: &mut W, item: &CartLineItem) -> io::Result<()> {
    writeln!(
        out,
        "Added to cart: {} (now {} in cart)",
        item.name, item.quantity
    )
}

/// The mini-cart popover: unit count and total.
pub fn mini_cart<W: Write>(out: &mut W, units: u64, total: domain::Money) -> io::Result<()> {
    writeln!(out, "Cart: {units} item(s), {total}")
}

pub fn user<W: Write>(out: &mut W, user: &User) -> io::Result<()> {
    writeln!(out, "{} <{}> (user #{})", user.name, user.email, user.id)
}

pub fn purchases<W: Write>(out: &mut W, purchases: &[Purchase]) -> io::Result<()> {
    if purchases.is_empty() {
        return writeln!(out, "No purchases yet.");
    }
    for purchase in purchases {
        let date = purchase
            .purchased_at
            .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());
        writeln!(
            out,
            "#{:<6} {}  {} unit(s)  {:>10}",
            purchase.id,
            date,
            purchase.unit_count(),
            purchase.total.to_string()
        )?;
        for line in &purchase.lines {
            writeln!(
                out,
                "         product {:>5}  {:>3} x {}",
                line.product_id, line.quantity, line.unit_price
            )?;
        }
    }
    Ok(())
}
