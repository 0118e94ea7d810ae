//! Catalog filtering.
//!
//! - [`FilterCriteria`]: free-text query plus optional terms/section filters.
//! - [`filter_products`]: the pure, order-preserving filter.
//! - [`Debouncer`]: a cancellable delayed task; only the last schedule in a quiet
//!   window runs.
//! - [`FilterEngine`]: criteria state + debouncer + a `watch` channel carrying the
//!   latest applied result.

pub mod criteria;
pub mod debounce;
pub mod engine;

pub use criteria::{FilterCriteria, filter_products};
pub use debounce::Debouncer;
pub use engine::{DEFAULT_DEBOUNCE, FilterEngine, FilterResult};
