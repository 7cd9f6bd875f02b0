//! World state storage.
//!
//! The [`World`] owns entity allocation, typed component storage and the
//! archetype index used to answer capability queries. Systems hold no
//! references into it between frames; they look entities up by ID.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::archetype::{ArchetypeId, ArchetypeTable};
use crate::component::{Component, ComponentTypeId};
use crate::entity::{Entity, EntityAllocator};
use crate::error::EcsError;
use crate::query::Query;
use crate::storage::{ErasedStorage, Storage};

/// Entity/component store.
///
/// Component lookups are O(1) amortized: one hash lookup for the storage and
/// one for the entity. Queries walk archetype tables, not entities.
#[derive(Debug, Default)]
pub struct World {
    /// Entity ID allocator.
    allocator: EntityAllocator,
    /// One storage per registered component type.
    storages: HashMap<ComponentTypeId, Box<dyn ErasedStorage>>,
    /// Component types that may not coexist on one entity with another
    /// member of the same group.
    exclusive_groups: HashMap<ComponentTypeId, &'static str>,
    /// All archetype tables, keyed by archetype ID.
    archetypes: HashMap<ArchetypeId, ArchetypeTable>,
    /// Maps each live entity to the archetype it belongs to.
    entity_archetype: HashMap<Entity, ArchetypeId>,
    /// Maps component type sets to archetype IDs, for fast lookup.
    type_set_to_archetype: HashMap<BTreeSet<ComponentTypeId>, ArchetypeId>,
}

impl World {
    /// Create a new empty world.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register component type `T`.
    ///
    /// Registering twice is a no-op. Returns `true` if `T` was newly
    /// registered.
    pub fn register_component<T: Component>(&mut self) -> bool {
        let type_id = T::component_type_id();
        if self.storages.contains_key(&type_id) {
            return false;
        }
        self.storages.insert(type_id, Box::new(Storage::<T>::new()));
        debug!(component = T::type_name(), "registered component");
        true
    }

    /// Register component type `T` as a member of an exclusive group: an
    /// entity may carry at most one component from each group.
    pub fn register_exclusive<T: Component>(&mut self, group: &'static str) -> bool {
        self.exclusive_groups.insert(T::component_type_id(), group);
        self.register_component::<T>()
    }

    /// Returns `true` if `T` has been registered.
    #[must_use]
    pub fn is_registered<T: Component>(&self) -> bool {
        self.storages.contains_key(&T::component_type_id())
    }

    /// Allocate a new entity without any components.
    pub fn create_entity(&mut self) -> Entity {
        let entity = self.allocator.allocate();
        let archetype_id = self.get_or_create_archetype(BTreeSet::new());
        if let Some(table) = self.archetypes.get_mut(&archetype_id) {
            table.insert(entity);
        }
        self.entity_archetype.insert(entity, archetype_id);
        entity
    }

    /// Returns `true` if the entity is alive.
    #[must_use]
    pub fn contains(&self, entity: Entity) -> bool {
        self.entity_archetype.contains_key(&entity)
    }

    /// Destroy an entity and drop all its components.
    ///
    /// Returns `true` if the entity existed and was removed.
    pub fn despawn(&mut self, entity: Entity) -> bool {
        let Some(archetype_id) = self.entity_archetype.remove(&entity) else {
            return false;
        };
        if let Some(table) = self.archetypes.get_mut(&archetype_id) {
            table.remove(entity);
            for ty in &table.component_types {
                if let Some(storage) = self.storages.get_mut(ty) {
                    storage.remove_entity(entity);
                }
            }
        }
        true
    }

    /// Attach `value` to `entity`, replacing a component of the same type.
    ///
    /// Unregistered component types are registered on first use.
    ///
    /// # Errors
    ///
    /// Returns [`EcsError::EntityNotFound`] for a dead entity and
    /// [`EcsError::ExclusiveConflict`] if the entity already carries another
    /// member of `T`'s exclusive group.
    pub fn attach<T: Component>(&mut self, entity: Entity, value: T) -> Result<(), EcsError> {
        let type_id = T::component_type_id();
        let types = self
            .signature(entity)
            .ok_or(EcsError::EntityNotFound(entity))?
            .clone();

        if let Some(&group) = self.exclusive_groups.get(&type_id) {
            for ty in types.iter().filter(|&&ty| ty != type_id) {
                if self.exclusive_groups.get(ty) == Some(&group) {
                    let existing = self
                        .storages
                        .get(ty)
                        .map_or("<unknown>", |storage| storage.type_name());
                    return Err(EcsError::ExclusiveConflict {
                        entity,
                        group,
                        existing,
                        incoming: T::type_name(),
                    });
                }
            }
        }

        self.register_component::<T>();
        if let Some(storage) = self.storage_mut::<T>() {
            storage.insert(entity, value);
        }

        if !types.contains(&type_id) {
            let mut next = types;
            next.insert(type_id);
            self.relocate(entity, next);
        }
        Ok(())
    }

    /// Detach and return component `T` from `entity`.
    pub fn detach<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let value = self.storage_mut::<T>()?.remove(entity)?;
        if let Some(types) = self.signature(entity) {
            let mut next = types.clone();
            next.remove(&T::component_type_id());
            self.relocate(entity, next);
        }
        Some(value)
    }

    /// Returns `true` if `entity` carries component `T`.
    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.has_type(entity, T::component_type_id())
    }

    /// Returns `true` if `entity` carries the component with `type_id`.
    #[must_use]
    pub fn has_type(&self, entity: Entity, type_id: ComponentTypeId) -> bool {
        self.signature(entity)
            .is_some_and(|types| types.contains(&type_id))
    }

    /// Immutable access to component `T` of `entity`.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.storages
            .get(&T::component_type_id())?
            .as_any()
            .downcast_ref::<Storage<T>>()?
            .get(entity)
    }

    /// Mutable access to component `T` of `entity`.
    #[must_use]
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.storage_mut::<T>()?.get_mut(entity)
    }

    /// The exact component set attached to `entity`.
    #[must_use]
    pub fn signature(&self, entity: Entity) -> Option<&BTreeSet<ComponentTypeId>> {
        let archetype_id = self.entity_archetype.get(&entity)?;
        self.archetypes
            .get(archetype_id)
            .map(|table| &table.component_types)
    }

    /// All entities matching `query`, sorted by ID.
    ///
    /// The result is a snapshot: systems may freely mutate components while
    /// iterating it. Querying unregistered capabilities yields an empty list.
    #[must_use]
    pub fn query(&self, query: &Query) -> Vec<Entity> {
        let mut entities: Vec<Entity> = self
            .archetypes
            .values()
            .filter(|table| query.matches(&table.component_types))
            .flat_map(|table| table.entities.iter().copied())
            .collect();
        entities.sort_unstable();
        entities
    }

    /// Shorthand for a query requiring only `T`.
    #[must_use]
    pub fn entities_with<T: Component>(&self) -> Vec<Entity> {
        self.query(&Query::new().with::<T>())
    }

    /// Returns the total number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entity_archetype.len()
    }

    /// Returns the number of non-empty archetypes.
    #[must_use]
    pub fn archetype_count(&self) -> usize {
        self.archetypes.values().filter(|t| !t.is_empty()).count()
    }

    fn storage_mut<T: Component>(&mut self) -> Option<&mut Storage<T>> {
        self.storages
            .get_mut(&T::component_type_id())?
            .as_any_mut()
            .downcast_mut::<Storage<T>>()
    }

    /// Move `entity` into the archetype for `types`.
    fn relocate(&mut self, entity: Entity, types: BTreeSet<ComponentTypeId>) {
        if let Some(old) = self.entity_archetype.get(&entity).copied()
            && let Some(table) = self.archetypes.get_mut(&old)
        {
            table.remove(entity);
        }
        let archetype_id = self.get_or_create_archetype(types);
        if let Some(table) = self.archetypes.get_mut(&archetype_id) {
            table.insert(entity);
        }
        self.entity_archetype.insert(entity, archetype_id);
    }

    /// Get or create an archetype for the given set of component types.
    fn get_or_create_archetype(
        &mut self,
        component_types: BTreeSet<ComponentTypeId>,
    ) -> ArchetypeId {
        if let Some(&id) = self.type_set_to_archetype.get(&component_types) {
            return id;
        }

        let table = ArchetypeTable::new(component_types.clone());
        let id = table.id;
        self.archetypes.insert(id, table);
        self.type_set_to_archetype.insert(component_types, id);
        id
    }
}
