//! Entity trait: identity + continuity across state changes.

use crate::error::{DomainError, DomainResult};

/// Entity marker + minimal interface.
///
/// Identity is assigned by storage, so an entity that was never saved has no
/// identifier yet.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier, if one has been assigned.
    fn id(&self) -> Option<Self::Id>;
}

/// Identity comparison shared by every entity's `PartialEq`.
///
/// Two entities are the same when their identifiers are equal. Two unsaved
/// entities (no identifier on either side) compare equal, so an entity is
/// always equal to itself.
pub fn same_identity<E: Entity>(a: &E, b: &E) -> bool {
    a.id() == b.id()
}

/// Storage hook: record the identifier handed out on first save.
///
/// An identifier is assigned once; a second assignment is a conflict.
pub fn assign_once<I: Copy + core::fmt::Display>(
    slot: &mut Option<I>,
    id: I,
    what: &str,
) -> DomainResult<()> {
    if let Some(existing) = slot {
        return Err(DomainError::conflict(format!(
            "{what} already has identifier {existing}"
        )));
    }
    *slot = Some(id);
    Ok(())
}
