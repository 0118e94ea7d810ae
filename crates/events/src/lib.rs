//! Domain events and the pub/sub mechanics used to fan them out to views.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{DEFAULT_SUBSCRIBER_CAPACITY, InMemoryBusError, InMemoryEventBus};
