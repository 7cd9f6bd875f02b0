//! Archetype definitions.
//!
//! An archetype is a unique combination of component types. Entities sharing
//! the same set of components are grouped into the same table so a query only
//! has to test each distinct component set once, not every entity.

use std::collections::BTreeSet;

use crate::component::ComponentTypeId;
use crate::entity::Entity;

/// A unique identifier for an archetype, computed from its sorted set of
/// [`ComponentTypeId`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArchetypeId(pub u64);

impl ArchetypeId {
    /// Compute the archetype ID from a set of component type IDs.
    ///
    /// The same set of types always produces the same archetype ID regardless
    /// of insertion order.
    #[must_use]
    pub fn from_component_types(types: &BTreeSet<ComponentTypeId>) -> Self {
        use std::hash::{Hash, Hasher};
        let mut hasher = std::collections::hash_map::DefaultHasher::new();
        for ty in types {
            ty.hash(&mut hasher);
        }
        Self(hasher.finish())
    }
}

/// The entities whose attached component set is exactly `component_types`.
#[derive(Debug, Clone)]
pub struct ArchetypeTable {
    /// The archetype identifier.
    pub id: ArchetypeId,
    /// Sorted set of component type IDs that define this archetype.
    pub component_types: BTreeSet<ComponentTypeId>,
    /// Member entities. Order is not meaningful; removal swaps.
    pub entities: Vec<Entity>,
}

impl ArchetypeTable {
    /// Create a new, empty archetype table.
    #[must_use]
    pub fn new(component_types: BTreeSet<ComponentTypeId>) -> Self {
        Self {
            id: ArchetypeId::from_component_types(&component_types),
            component_types,
            entities: Vec::new(),
        }
    }

    /// Returns the number of entities in this archetype table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if this table has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns `true` if this archetype contains the given component type.
    #[must_use]
    pub fn has_component(&self, type_id: ComponentTypeId) -> bool {
        self.component_types.contains(&type_id)
    }

    /// Find the row index for a given entity.
    #[must_use]
    pub fn entity_row(&self, entity: Entity) -> Option<usize> {
        self.entities.iter().position(|&e| e == entity)
    }

    /// Add an entity to this table.
    pub fn insert(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    /// Remove an entity from this table. Returns `true` if it was a member.
    pub fn remove(&mut self, entity: Entity) -> bool {
        match self.entity_row(entity) {
            Some(row) => {
                self.entities.swap_remove(row);
                true
            }
            None => false,
        }
    }
}
