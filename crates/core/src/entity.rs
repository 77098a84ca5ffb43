//! Entity trait: identity + continuity across state changes.

use crate::id::EntityId;

/// Entity marker + minimal interface.
///
/// Entities are cloned out of their store on read, so reads never hand out
/// references into shared state.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Strongly-typed entity identifier.
    type Id: EntityId;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
