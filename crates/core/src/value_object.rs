//! Value object trait: equality by value, not identity.
//!
//! Value objects have **no identity**; they are defined entirely by their
//! attribute values. `Money` and the split/settlement records built on it are
//! value objects, while an `Expense` is an entity (see [`crate::Entity`]).

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one with the new values.
///
/// ```ignore
/// let a = Money::new(3000, 2); // 30.00
/// let b = Money::new(300, 1);  // 30.0
/// assert_eq!(a, b);            // equal by value, scale does not matter
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
