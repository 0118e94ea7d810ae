/// Compared by attributes only; a price or an address has no identity of its own.
/// Immutable: build a new value instead of changing one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
