use chrono::{DateTime, Utc};

/// Something that happened to session state, told to whoever listens.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Dotted name such as `cart.item.added`; stable across releases.
    fn event_type(&self) -> &'static str;

    /// Payload shape revision for `event_type`.
    fn version(&self) -> u32;

    fn occurred_at(&self) -> DateTime<Utc>;
}
