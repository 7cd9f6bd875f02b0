//! Typed per-component storage behind a type-erased interface.

use std::any::Any;
use std::collections::HashMap;

use crate::component::Component;
use crate::entity::Entity;

/// Type-erased view of a [`Storage`] so the world can hold one map of
/// storages keyed by [`ComponentTypeId`](crate::ComponentTypeId).
pub trait ErasedStorage: std::fmt::Debug {
    /// The component's [`Component::type_name`].
    fn type_name(&self) -> &'static str;
    /// Drop the component attached to `entity`, if any.
    fn remove_entity(&mut self, entity: Entity) -> bool;
    /// Number of stored components.
    fn len(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Sparse storage of one component type, keyed by entity.
#[derive(Debug)]
pub struct Storage<T: Component> {
    items: HashMap<Entity, T>,
}

impl<T: Component> Storage<T> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: HashMap::new(),
        }
    }

    /// Insert or replace the component for `entity`, returning the old value.
    pub fn insert(&mut self, entity: Entity, value: T) -> Option<T> {
        self.items.insert(entity, value)
    }

    pub fn remove(&mut self, entity: Entity) -> Option<T> {
        self.items.remove(&entity)
    }

    #[must_use]
    pub fn get(&self, entity: Entity) -> Option<&T> {
        self.items.get(&entity)
    }

    #[must_use]
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut T> {
        self.items.get_mut(&entity)
    }
}

impl<T: Component> Default for Storage<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Component> ErasedStorage for Storage<T> {
    fn type_name(&self) -> &'static str {
        T::type_name()
    }

    fn remove_entity(&mut self, entity: Entity) -> bool {
        self.items.remove(&entity).is_some()
    }

    fn len(&self) -> usize {
        self.items.len()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
