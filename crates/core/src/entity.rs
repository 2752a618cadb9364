//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Products, invoices and invoice lines are entities: two values with the same
/// identifier are the same record, even if a price or quantity changed.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
