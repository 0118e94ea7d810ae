//! The single cart provider for an application session.

use std::sync::{Arc, PoisonError, RwLock};

use storefront_catalog::Catalog;
use storefront_core::{Aggregate, AggregateRoot, DomainError, DomainResult, Sku};
use storefront_events::{EventBus, InMemoryEventBus, Subscription};

use crate::cart::{Cart, CartCommand, CartEvent, CartItem};
use crate::summary::CartSummary;

/// Cart store: every mutation goes through here.
///
/// State is an immutable `Arc<Cart>` snapshot. A mutation clones the latest
/// snapshot, applies the resulting events to the clone and swaps the pointer
/// while holding the write lock, so a reader holding an older snapshot never
/// observes a half-applied change. Each applied event is then published so views
/// can re-read.
#[derive(Debug)]
pub struct CartStore {
    catalog: Arc<Catalog>,
    state: RwLock<Arc<Cart>>,
    bus: Arc<InMemoryEventBus<CartEvent>>,
}

impl CartStore {
    /// Create an empty cart bound to `catalog`.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            state: RwLock::new(Arc::new(Cart::new())),
            bus: Arc::new(InMemoryEventBus::new()),
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Latest committed cart.
    pub fn snapshot(&self) -> Arc<Cart> {
        // Snapshots are swapped whole, so a poisoned lock still guards a consistent value.
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Subscribe to cart events (one message per applied event).
    pub fn subscribe(&self) -> Subscription<CartEvent> {
        self.bus.subscribe()
    }

    pub fn quantity_of(&self, sku: &Sku) -> u32 {
        self.snapshot().quantity_of(sku)
    }

    /// Add one unit. Skus absent from the catalog are rejected.
    pub fn increase(&self, sku: &Sku) -> DomainResult<()> {
        self.dispatch(CartCommand::increase(sku.clone()), None).map(|_| ())
    }

    /// Take one unit away; the item disappears at zero. No-op when absent.
    pub fn decrease(&self, sku: &Sku) -> DomainResult<()> {
        self.dispatch(CartCommand::decrease(sku.clone()), None).map(|_| ())
    }

    /// Drop the item whatever its quantity. No-op when absent.
    pub fn remove(&self, sku: &Sku) -> DomainResult<()> {
        self.dispatch(CartCommand::remove(sku.clone()), None).map(|_| ())
    }

    /// Empty the cart in one step.
    pub fn clear(&self) -> DomainResult<()> {
        self.dispatch(CartCommand::clear(), None).map(|_| ())
    }

    /// Empty the cart only if it is still exactly `confirmed`.
    ///
    /// Used after an order was built from `confirmed`: any mutation since then
    /// fails with `DomainError::Conflict` and leaves the cart as it is, so an
    /// item added meanwhile is never cleared without being ordered.
    pub fn clear_confirmed(&self, confirmed: &Cart) -> DomainResult<()> {
        self.dispatch(CartCommand::clear(), Some(confirmed.version())).map(|_| ())
    }

    pub fn total_quantity(&self) -> u64 {
        self.snapshot().total_quantity()
    }

    pub fn total_price(&self) -> f64 {
        self.snapshot().total_price(&self.catalog)
    }

    /// Items in insertion order.
    pub fn items(&self) -> Vec<CartItem> {
        self.snapshot().items().to_vec()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Current cart joined against the catalog.
    pub fn summary(&self) -> CartSummary {
        CartSummary::build(&self.snapshot(), &self.catalog)
    }

    /// Apply `command` to the latest snapshot and commit the result, optionally
    /// requiring the latest snapshot to be at `expected_version`.
    ///
    /// Returns the committed snapshot (unchanged when the command was a no-op).
    fn dispatch(&self, command: CartCommand, expected_version: Option<u64>) -> DomainResult<Arc<Cart>> {
        if let CartCommand::Increase(cmd) = &command {
            if !self.catalog.contains(&cmd.sku) {
                return Err(DomainError::unknown_sku(cmd.sku.clone()));
            }
        }

        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if expected_version.is_some_and(|expected| expected != guard.version()) {
            return Err(DomainError::conflict(format!(
                "cart changed during checkout (now at version {})",
                guard.version()
            )));
        }

        let mut next = Cart::clone(&guard);
        let events = next.execute(&command)?;
        if events.is_empty() {
            tracing::debug!(sku = ?command.sku(), "cart command was a no-op");
            return Ok(guard.clone());
        }

        let committed = Arc::new(next);
        *guard = committed.clone();
        drop(guard);

        tracing::debug!(
            sku = ?command.sku(),
            version = committed.version(),
            total_quantity = committed.total_quantity(),
            "cart updated"
        );

        for event in events {
            if let Err(err) = self.bus.publish(event) {
                tracing::warn!(?err, "failed to publish cart event");
            }
        }

        Ok(committed)
    }
}
