use chrono::{DateTime, Utc};
use serde::Serialize;

use storefront_cart::{CartLine, CartSummary};
use storefront_core::OrderId;

use crate::form::{CheckoutSubmission, ShippingAddress};

/// What the shopper sees after placing an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderConfirmation {
    pub order_id: OrderId,
    pub placed_at: DateTime<Utc>,
    pub customer_name: Option<String>,
    pub email: Option<String>,
    pub ship_to: Option<ShippingAddress>,
    pub lines: Vec<CartLine>,
    pub total_quantity: u64,
    pub total_price: f64,
}

impl OrderConfirmation {
    /// Confirmation for a validated checkout form.
    pub fn from_submission(submission: CheckoutSubmission, summary: CartSummary) -> Self {
        let mut confirmation = Self::from_cart(summary);
        confirmation.customer_name = Some(submission.full_name);
        confirmation.email = Some(submission.email);
        confirmation.ship_to = Some(submission.shipping);
        confirmation
    }

    /// Confirmation for the cart page's one-click checkout, which collects no details.
    pub fn from_cart(summary: CartSummary) -> Self {
        Self {
            order_id: OrderId::new(),
            placed_at: Utc::now(),
            customer_name: None,
            email: None,
            ship_to: None,
            lines: summary.lines,
            total_quantity: summary.total_quantity,
            total_price: summary.total,
        }
    }

    pub fn formatted_total(&self) -> String {
        format!("{:.2}", self.total_price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::tests::filled_form;
    use storefront_cart::Cart;
    use storefront_catalog::Catalog;
    use storefront_cart::CartCommand;
    use storefront_core::Aggregate;

    fn summary() -> CartSummary {
        let catalog = Catalog::bundled().unwrap().catalog;
        let sku = catalog.products()[0].sku().clone();
        let mut cart = Cart::default();
        cart.execute(&CartCommand::increase(sku.clone())).unwrap();
        cart.execute(&CartCommand::increase(sku)).unwrap();
        CartSummary::build(&cart, &catalog)
    }

    #[test]
    fn confirmation_carries_cart_totals_and_shipping() {
        let summary = summary();
        let expected_total = summary.total;
        let submission = filled_form().submit().unwrap();

        let confirmation = OrderConfirmation::from_submission(submission, summary);
        assert_eq!(confirmation.total_quantity, 2);
        assert_eq!(confirmation.total_price, expected_total);
        assert_eq!(confirmation.customer_name.as_deref(), Some("Ana Souza"));
        assert_eq!(confirmation.ship_to.unwrap().city, "São Paulo");
    }

    #[test]
    fn quick_confirmation_has_no_customer_details() {
        let confirmation = OrderConfirmation::from_cart(summary());
        assert!(confirmation.ship_to.is_none());
        assert_eq!(confirmation.lines.len(), 1);
        assert_ne!(confirmation.order_id, OrderId::new());
    }
}
