//! Entity handles.
//!
//! An [`Entity`] names one interactable (a button, a key, a teleport point)
//! and carries no data of its own; its capability and the scene node it
//! drives are attached as components. Feature setup creates every entity up
//! front, so handles stay valid for the lifetime of the world unless setup
//! itself rolls a half-built entity back.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity(pub u64);

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Hands out entity handles in creation order, starting at 1.
///
/// Handles of despawned entities are not reused, so a stale handle held by
/// a click or submit relation can never alias a newer entity. Query results
/// are sorted by handle, which makes them follow creation order.
#[derive(Debug)]
pub struct EntityAllocator {
    next: u64,
}

impl EntityAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self { next: 1 }
    }

    pub fn allocate(&mut self) -> Entity {
        let entity = Entity(self.next);
        self.next += 1;
        entity
    }
}

impl Default for EntityAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_follow_creation_order() {
        let mut allocator = EntityAllocator::new();
        let button = allocator.allocate();
        let key = allocator.allocate();
        assert_eq!(button, Entity(1));
        assert_eq!(key, Entity(2));
    }

    #[test]
    fn test_display_names_the_handle() {
        assert_eq!(Entity(7).to_string(), "Entity(7)");
    }
}
