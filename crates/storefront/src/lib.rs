//! `storefront`
//!
//! Wires one shopping session together: configuration, the catalog, the cart
//! store, the debounced filter engine and the checkout flow.

pub mod config;
pub mod session;

pub use config::StorefrontConfig;
pub use session::{ProductView, Storefront};
