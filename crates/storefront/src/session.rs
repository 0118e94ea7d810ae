//! One shopper's session.

use std::sync::Arc;

use anyhow::Context;
use serde::Serialize;
use tokio::sync::Mutex;

use storefront_cart::{CartStore, CartSummary};
use storefront_catalog::{Catalog, CatalogLoad, Product, RejectedRecord};
use storefront_checkout::{
    AutofillOutcome, CheckoutError, CheckoutForm, Field, FieldError, OrderConfirmation, PostalLookup, ViaCepClient,
    autofill_address,
};
use storefront_core::Sku;
use storefront_search::FilterEngine;

use crate::config::StorefrontConfig;

/// A product card: the product plus what the session knows about it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductView {
    pub product: Product,
    pub image_path: String,
    pub display_price: String,
    /// Units of this product currently in the cart.
    pub quantity: u32,
}

/// Catalog, cart, filters and checkout form for one session.
///
/// The cart store is the only writer of cart state. The checkout form sits
/// behind an async mutex that is never held across a postal lookup.
pub struct Storefront {
    config: StorefrontConfig,
    catalog: Arc<Catalog>,
    rejected: Vec<RejectedRecord>,
    cart: CartStore,
    filters: FilterEngine,
    checkout: Mutex<CheckoutForm>,
    lookup: Arc<dyn PostalLookup>,
}

impl std::fmt::Debug for Storefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Storefront")
            .field("config", &self.config)
            .field("products", &self.catalog.len())
            .field("rejected", &self.rejected.len())
            .finish_non_exhaustive()
    }
}

impl Storefront {
    /// Load the catalog and build a fresh session around it.
    pub fn bootstrap(config: StorefrontConfig, lookup: Arc<dyn PostalLookup>) -> anyhow::Result<Self> {
        let CatalogLoad { catalog, rejected } = load_catalog(&config)?;
        tracing::info!(
            products = catalog.len(),
            rejected = rejected.len(),
            sections = ?catalog.sections(),
            "storefront ready"
        );

        let catalog = Arc::new(catalog);
        Ok(Self {
            cart: CartStore::new(Arc::clone(&catalog)),
            filters: FilterEngine::new(Arc::clone(&catalog), config.filter_debounce),
            checkout: Mutex::new(CheckoutForm::new(config.country.clone())),
            catalog,
            rejected,
            lookup,
            config,
        })
    }

    /// [`bootstrap`](Self::bootstrap) with the HTTP postal lookup from `config`.
    pub fn with_http_lookup(config: StorefrontConfig) -> anyhow::Result<Self> {
        let lookup = ViaCepClient::new(config.postal_lookup_url.clone(), config.postal_lookup_timeout)
            .context("failed to build postal lookup client")?;
        Self::bootstrap(config, Arc::new(lookup))
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Catalog records left out at load time.
    pub fn rejected(&self) -> &[RejectedRecord] {
        &self.rejected
    }

    pub fn cart(&self) -> &CartStore {
        &self.cart
    }

    pub fn filters(&self) -> &FilterEngine {
        &self.filters
    }

    pub fn cart_summary(&self) -> CartSummary {
        self.cart.summary()
    }

    pub fn product_view(&self, sku: &Sku) -> Option<ProductView> {
        let product = self.catalog.get(sku)?;
        Some(ProductView {
            image_path: product.image_path(&self.config.image_base),
            display_price: product.display_price(),
            quantity: self.cart.quantity_of(sku),
            product: product.clone(),
        })
    }

    /// Views for the products the filter engine currently shows.
    pub fn visible_products(&self) -> Vec<ProductView> {
        self.filters
            .current()
            .products
            .iter()
            .filter_map(|product| self.product_view(product.sku()))
            .collect()
    }

    /// Copy of the checkout form as it stands.
    pub async fn checkout_form(&self) -> CheckoutForm {
        self.checkout.lock().await.clone()
    }

    pub async fn set_checkout_field(&self, field: Field, input: &str) -> Result<(), FieldError> {
        self.checkout.lock().await.set_value(field, input)
    }

    /// Validate `field` on blur. Leaving a valid postal code also runs the address
    /// autofill, whose outcome is returned.
    pub async fn blur_checkout_field(&self, field: Field) -> Result<Option<AutofillOutcome>, FieldError> {
        self.checkout.lock().await.blur(field)?;
        if field != Field::PostalCode {
            return Ok(None);
        }
        Ok(Some(autofill_address(&self.checkout, self.lookup.as_ref()).await))
    }

    /// Validate the form, confirm the order and empty the cart.
    ///
    /// The cart is read once the form lock is held, and only that snapshot is
    /// cleared; a cart changed in between fails with `DomainError::Conflict`.
    pub async fn checkout(&self) -> Result<OrderConfirmation, CheckoutError> {
        let mut form = self.checkout.lock().await;

        let cart = self.cart.snapshot();
        let summary = CartSummary::build(&cart, &self.catalog);
        if summary.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let submission = form.submit()?;
        self.cart.clear_confirmed(&cart)?;
        let confirmation = OrderConfirmation::from_submission(submission, summary);
        *form = CheckoutForm::new(self.config.country.clone());

        tracing::info!(
            order_id = %confirmation.order_id,
            items = confirmation.total_quantity,
            total = confirmation.total_price,
            "order placed"
        );
        Ok(confirmation)
    }

    /// The cart page's checkout button: confirm the cart as is, without the form.
    pub fn quick_checkout(&self) -> Result<OrderConfirmation, CheckoutError> {
        let cart = self.cart.snapshot();
        let summary = CartSummary::build(&cart, &self.catalog);
        if summary.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        self.cart.clear_confirmed(&cart)?;
        let confirmation = OrderConfirmation::from_cart(summary);

        tracing::info!(
            order_id = %confirmation.order_id,
            items = confirmation.total_quantity,
            total = confirmation.total_price,
            "order placed from cart"
        );
        Ok(confirmation)
    }
}

fn load_catalog(config: &StorefrontConfig) -> anyhow::Result<CatalogLoad> {
    let Some(path) = &config.catalog_path else {
        return Catalog::bundled().context("bundled catalog is malformed");
    };

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog file {}", path.display()))?;
    Catalog::from_json(&json).with_context(|| format!("failed to parse catalog file {}", path.display()))
}
