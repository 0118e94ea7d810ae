//! `storefront-core`: domain building blocks.
//!
//! This crate contains **pure domain** primitives shared by the catalog, cart,
//! search and checkout crates (no IO, no async, no rendering).

pub mod aggregate;
pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use aggregate::{Aggregate, AggregateRoot};
pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{OrderId, Sku};
pub use value_object::ValueObject;
