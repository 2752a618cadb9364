//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects have **no identity**: two values with the same attributes are
/// equal. `Money` and `Quantity` are the value objects of this workspace.
///
/// To "modify" a value object, build a new one.
///
/// ```ignore
/// let a = Money::from_minor(250, 2);
/// let b: Money = "2.50".parse()?;
/// assert_eq!(a, b);
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
