//! Records with a stable identity.

/// A record whose identity survives revisions.
///
/// Expenses are entities: an update replaces every attribute but keeps the
/// identifier, so two snapshots with the same id describe the same record.
pub trait Entity {
    /// Identifier, small enough to copy and ordered so stores can key by it.
    type Id: Copy + Ord + core::fmt::Display;

    fn id(&self) -> &Self::Id;

    /// Whether `other` is a (possibly older) snapshot of the same record.
    fn is_revision_of(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
