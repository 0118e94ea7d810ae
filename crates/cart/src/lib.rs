//! Shopping cart module.
//!
//! The cart is an aggregate (commands in, events out) held by a single
//! [`CartStore`] that swaps immutable snapshots on every mutation. Totals are
//! always derived from the current snapshot joined against the catalog.

pub mod cart;
pub mod store;
pub mod summary;

pub use cart::{
    Cart, CartCleared, CartCommand, CartEvent, CartItem, ClearCart, DecreaseQuantity,
    IncreaseQuantity, ItemAdded, ItemRemoved, QuantityChanged, RemoveItem,
};
pub use store::CartStore;
pub use summary::{CartLine, CartSummary};
