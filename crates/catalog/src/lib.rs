//! Catalog module.
//!
//! Loads the static product list once, converts prices from text to numbers and
//! rejects records that would otherwise be displayed with a wrong price. Pure
//! domain logic: the only input is the raw record list (or its JSON text).

pub mod catalog;
pub mod product;

pub use catalog::{Catalog, CatalogError, CatalogLoad, RejectedRecord};
pub use product::{Price, Product, RawProductRecord};
