//! Cart joined against the catalog, ready for display (cart page, navbar preview).

use serde::Serialize;

use storefront_catalog::{Catalog, Price};
use storefront_core::Sku;

use crate::cart::Cart;

/// One displayable cart row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub sku: Sku,
    pub name: String,
    pub image_downloads: String,
    pub unit_price: Price,
    pub currency: String,
    pub quantity: u32,
    pub line_total: f64,
}

/// Cart lines plus derived totals. Shipping is free, so `total == subtotal`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSummary {
    pub lines: Vec<CartLine>,
    pub total_quantity: u64,
    pub subtotal: f64,
    pub shipping: f64,
    pub total: f64,
}

impl CartSummary {
    /// Join `cart` against `catalog`.
    ///
    /// An item whose sku is missing from the catalog is left out of the summary
    /// (and logged) rather than failing the whole view.
    pub fn build(cart: &Cart, catalog: &Catalog) -> Self {
        let lines: Vec<CartLine> = cart
            .items()
            .iter()
            .filter_map(|item| {
                let Some(product) = catalog.get(&item.sku) else {
                    tracing::warn!(sku = %item.sku, "cart item references unknown sku; skipping");
                    return None;
                };
                Some(CartLine {
                    sku: item.sku.clone(),
                    name: product.name().to_string(),
                    image_downloads: product.image_downloads().to_string(),
                    unit_price: product.price(),
                    currency: product.currency().to_string(),
                    quantity: item.quantity,
                    line_total: product.price().times(item.quantity),
                })
            })
            .collect();

        let total_quantity = lines.iter().map(|l| u64::from(l.quantity)).sum();
        let subtotal: f64 = lines.iter().map(|l| l.line_total).sum();
        let shipping = 0.0;

        Self {
            lines,
            total_quantity,
            subtotal,
            shipping,
            total: subtotal + shipping,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total formatted with two decimals.
    pub fn formatted_total(&self) -> String {
        format!("{:.2}", self.total)
    }
}
