use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use storefront_catalog::Catalog;
use storefront_core::{Aggregate, AggregateRoot, DomainError, Sku};
use storefront_events::Event;

/// Cart line as stored: a sku reference and a positive quantity.
///
/// Product data stays in the catalog; the cart only refers to it by sku.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub sku: Sku,
    pub quantity: u32,
}

/// Aggregate root: Cart.
///
/// Items are kept in insertion order and are unique by sku. An item whose
/// quantity would reach zero is removed instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<CartItem>,
    version: u64,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Current quantity for `sku`, 0 when absent.
    pub fn quantity_of(&self, sku: &Sku) -> u32 {
        self.position(sku).map(|i| self.items[i].quantity).unwrap_or(0)
    }

    pub fn contains(&self, sku: &Sku) -> bool {
        self.position(sku).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct skus.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Sum of all item quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `price * quantity`, joined against `catalog`.
    ///
    /// Items whose sku is missing from the catalog contribute nothing.
    pub fn total_price(&self, catalog: &Catalog) -> f64 {
        self.items
            .iter()
            .filter_map(|item| catalog.get(&item.sku).map(|p| p.price().times(item.quantity)))
            .sum()
    }

    fn position(&self, sku: &Sku) -> Option<usize> {
        self.items.iter().position(|item| &item.sku == sku)
    }
}

impl AggregateRoot for Cart {
    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: add one unit of a sku.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncreaseQuantity {
    pub sku: Sku,
    pub occurred_at: DateTime<Utc>,
}

/// Command: take one unit of a sku away.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecreaseQuantity {
    pub sku: Sku,
    pub occurred_at: DateTime<Utc>,
}

/// Command: drop a sku regardless of quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub sku: Sku,
    pub occurred_at: DateTime<Utc>,
}

/// Command: empty the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearCart {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    Increase(IncreaseQuantity),
    Decrease(DecreaseQuantity),
    Remove(RemoveItem),
    Clear(ClearCart),
}

impl CartCommand {
    pub fn increase(sku: Sku) -> Self {
        Self::Increase(IncreaseQuantity {
            sku,
            occurred_at: Utc::now(),
        })
    }

    pub fn decrease(sku: Sku) -> Self {
        Self::Decrease(DecreaseQuantity {
            sku,
            occurred_at: Utc::now(),
        })
    }

    pub fn remove(sku: Sku) -> Self {
        Self::Remove(RemoveItem {
            sku,
            occurred_at: Utc::now(),
        })
    }

    pub fn clear() -> Self {
        Self::Clear(ClearCart {
            occurred_at: Utc::now(),
        })
    }

    /// The sku the command targets, if any.
    pub fn sku(&self) -> Option<&Sku> {
        match self {
            CartCommand::Increase(cmd) => Some(&cmd.sku),
            CartCommand::Decrease(cmd) => Some(&cmd.sku),
            CartCommand::Remove(cmd) => Some(&cmd.sku),
            CartCommand::Clear(_) => None,
        }
    }
}

/// Event: a sku entered the cart with quantity 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub sku: Sku,
    pub occurred_at: DateTime<Utc>,
}

/// Event: an item's quantity changed; `quantity` is the new value (always > 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub sku: Sku,
    pub quantity: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Event: a sku left the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub sku: Sku,
    pub occurred_at: DateTime<Utc>,
}

/// Event: every item left the cart at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCleared {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    ItemAdded(ItemAdded),
    QuantityIncreased(QuantityChanged),
    QuantityDecreased(QuantityChanged),
    ItemRemoved(ItemRemoved),
    CartCleared(CartCleared),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "cart.item.added",
            CartEvent::QuantityIncreased(_) => "cart.item.quantity_increased",
            CartEvent::QuantityDecreased(_) => "cart.item.quantity_decreased",
            CartEvent::ItemRemoved(_) => "cart.item.removed",
            CartEvent::CartCleared(_) => "cart.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::ItemAdded(e) => e.occurred_at,
            CartEvent::QuantityIncreased(e) => e.occurred_at,
            CartEvent::QuantityDecreased(e) => e.occurred_at,
            CartEvent::ItemRemoved(e) => e.occurred_at,
            CartEvent::CartCleared(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::ItemAdded(e) => {
                self.items.push(CartItem {
                    sku: e.sku.clone(),
                    quantity: 1,
                });
            }
            CartEvent::QuantityIncreased(e) | CartEvent::QuantityDecreased(e) => {
                if let Some(i) = self.position(&e.sku) {
                    self.items[i].quantity = e.quantity;
                }
            }
            CartEvent::ItemRemoved(e) => {
                self.items.retain(|item| item.sku != e.sku);
            }
            CartEvent::CartCleared(_) => {
                self.items.clear();
            }
        }

        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::Increase(cmd) => self.handle_increase(cmd),
            CartCommand::Decrease(cmd) => Ok(self.handle_decrease(cmd)),
            CartCommand::Remove(cmd) => Ok(self.handle_remove(cmd)),
            CartCommand::Clear(cmd) => Ok(self.handle_clear(cmd)),
        }
    }
}

impl Cart {
    fn handle_increase(&self, cmd: &IncreaseQuantity) -> Result<Vec<CartEvent>, DomainError> {
        if cmd.sku.is_empty() {
            return Err(DomainError::validation("sku cannot be empty"));
        }

        // No stock limit: the only ceiling is the counter itself.
        let event = match self.quantity_of(&cmd.sku) {
            0 => CartEvent::ItemAdded(ItemAdded {
                sku: cmd.sku.clone(),
                occurred_at: cmd.occurred_at,
            }),
            current => {
                let quantity = current
                    .checked_add(1)
                    .ok_or_else(|| DomainError::invariant("cart quantity overflow"))?;
                CartEvent::QuantityIncreased(QuantityChanged {
                    sku: cmd.sku.clone(),
                    quantity,
                    occurred_at: cmd.occurred_at,
                })
            }
        };

        Ok(vec![event])
    }

    fn handle_decrease(&self, cmd: &DecreaseQuantity) -> Vec<CartEvent> {
        match self.quantity_of(&cmd.sku) {
            0 => Vec::new(),
            1 => vec![CartEvent::ItemRemoved(ItemRemoved {
                sku: cmd.sku.clone(),
                occurred_at: cmd.occurred_at,
            })],
            current => vec![CartEvent::QuantityDecreased(QuantityChanged {
                sku: cmd.sku.clone(),
                quantity: current - 1,
                occurred_at: cmd.occurred_at,
            })],
        }
    }

    fn handle_remove(&self, cmd: &RemoveItem) -> Vec<CartEvent> {
        if !self.contains(&cmd.sku) {
            return Vec::new();
        }
        vec![CartEvent::ItemRemoved(ItemRemoved {
            sku: cmd.sku.clone(),
            occurred_at: cmd.occurred_at,
        })]
    }

    fn handle_clear(&self, cmd: &ClearCart) -> Vec<CartEvent> {
        if self.is_empty() {
            return Vec::new();
        }
        vec![CartEvent::CartCleared(CartCleared {
            occurred_at: cmd.occurred_at,
        })]
    }
}
