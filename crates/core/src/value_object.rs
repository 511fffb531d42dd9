//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**. They are defined entirely by their
//! attribute values, so two value objects holding the same values are equal.

/// Marker trait for value objects.
///
/// In this crate both the item name and the quantity are value objects: an
/// inventory entry has no identity beyond its name, and a quantity is just a
/// number.
///
/// ## Usage Pattern
///
/// ```ignore
/// let a = ItemName::parse("apple")?;
/// let b = ItemName::parse("apple")?;
/// assert_eq!(a, b);  // Equal by value
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
