/// Something tracked by identity rather than by its attributes (a product is
/// the same product after a price change).
pub trait Entity {
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;
}
