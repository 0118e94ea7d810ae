//! In-process bus with a bounded queue per subscriber.

use std::sync::mpsc::{self, SyncSender, TrySendError};
use std::sync::{Mutex, PoisonError};

use crate::bus::{EventBus, Subscription};

/// Messages a subscriber may leave unread before it is dropped.
pub const DEFAULT_SUBSCRIBER_CAPACITY: usize = 1024;

#[derive(Debug, thiserror::Error)]
pub enum InMemoryBusError {
    #[error("subscriber list lock poisoned")]
    Poisoned,
}

/// Broadcast to every live subscriber, synchronously.
///
/// Each subscriber gets its own queue of `capacity` messages. A subscriber is
/// forgotten on the next publish once its receiver is dropped or its queue is
/// full; a lagging one keeps what was already queued and then sees the bus as
/// disconnected. Messages only signal "re-read the store", so a dropped view
/// resubscribes and reads current state.
#[derive(Debug)]
pub struct InMemoryEventBus<M> {
    capacity: usize,
    subscribers: Mutex<Vec<SyncSender<M>>>,
}

impl<M> InMemoryEventBus<M> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_SUBSCRIBER_CAPACITY)
    }

    /// `capacity` is clamped to at least one message.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            subscribers: Mutex::new(Vec::new()),
        }
    }

    /// Subscribers still attached after the last publish.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl<M> Default for InMemoryEventBus<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M> EventBus<M> for InMemoryEventBus<M>
where
    M: Clone + Send + 'static,
{
    type Error = InMemoryBusError;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        let mut subscribers = self.subscribers.lock().map_err(|_| InMemoryBusError::Poisoned)?;
        subscribers.retain(|tx| match tx.try_send(message.clone()) {
            Ok(()) => true,
            Err(TrySendError::Full(_) | TrySendError::Disconnected(_)) => false,
        });
        Ok(())
    }

    fn subscribe(&self) -> Subscription<M> {
        let (tx, rx) = mpsc::sync_channel(self.capacity);
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner).push(tx);
        Subscription::new(rx)
    }
}
