//! Capability dispatch.
//!
//! The controller system does not branch on concrete component types.
//! Every capability implements [`Interactable`], and an
//! [`InteractableRegistry`] maps an entity to the one capability it carries.
//! Registration also places the capability in the world's exclusive
//! `"interactable"` group, so attaching a second capability to an entity
//! fails instead of silently shadowing the first.

use tracing::debug;

use xr_component::{Component, ComponentTypeId, Entity, Query, QueryFilter, World};
use xr_scene::{Gamepad, Handedness, RayHit, SceneGraph, SpatialId, XrSession};

use crate::components::{
    Button, Carousel, Draggable, FreeDefault, Keyboard, ReturnToOrigin, TeleportDefault,
    TeleportPoint,
};
use crate::config::{InteractionConfig, PulseConfig};

/// Exclusive group shared by all interactable capabilities.
pub const INTERACTABLE_GROUP: &str = "interactable";

/// Everything a capability may touch while reacting to a pointer.
pub struct InteractionCx<'a> {
    /// The entity being dispatched to.
    pub entity: Entity,
    pub scene: &'a mut SceneGraph,
    pub session: &'a mut dyn XrSession,
    pub config: &'a InteractionConfig,
    /// Hand of the input source driving this dispatch.
    pub handedness: Handedness,
    /// Scene node of the pointer.
    pub pointer: SpatialId,
    pub gamepad: Option<&'a Gamepad>,
    /// Nearest hit of the pointer ray on the entity.
    pub hit: RayHit,
}

impl InteractionCx<'_> {
    /// Fire a haptic pulse on the driving input source. Best effort.
    pub fn pulse(&mut self, pulse: PulseConfig) {
        if !self.session.pulse(self.handedness, pulse.intensity, pulse.duration_ms) {
            debug!(handedness = ?self.handedness, "no haptic actuator");
        }
    }

    /// Stick axis of the driving input source, `0.0` without a gamepad.
    #[must_use]
    pub fn axis(&self, index: usize) -> f32 {
        self.gamepad.map_or(0.0, |g| g.axis(index))
    }
}

/// Reactions of one capability to pointer events. All methods default to
/// doing nothing.
pub trait Interactable {
    /// The pointer ray rests on the entity this frame.
    fn on_hover(&mut self, _cx: &mut InteractionCx<'_>) {}

    /// The entity was not hovered by any pointer this frame.
    fn on_unhover(&mut self) {}

    /// Press edge of any button, before the button's own action.
    fn on_press(&mut self, _cx: &mut InteractionCx<'_>) {}

    /// Press edge of the trigger (button 0).
    fn on_select(&mut self, _cx: &mut InteractionCx<'_>) {}

    /// Press edge of the grip (button 1).
    fn on_snap(&mut self, _cx: &mut InteractionCx<'_>) {}

    /// Press edge of button 4.
    fn on_close(&mut self, _cx: &mut InteractionCx<'_>) {}

    /// Release edge of any button. Returns `true` when the pointer ray should
    /// go back to its neutral colour.
    fn on_release(&mut self) -> bool {
        false
    }
}

/// Resolves an entity to its capability as a trait object.
pub type Resolver = for<'w> fn(&'w mut World, Entity) -> Option<&'w mut dyn Interactable>;

fn resolve_as<T: Component + Interactable>(
    world: &mut World,
    entity: Entity,
) -> Option<&mut dyn Interactable> {
    world
        .get_mut::<T>(entity)
        .map(|component| component as &mut dyn Interactable)
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    type_id: ComponentTypeId,
    name: &'static str,
    resolve: Resolver,
}

/// The set of capabilities the controller system dispatches to.
#[derive(Debug, Clone, Default)]
pub struct InteractableRegistry {
    entries: Vec<Entry>,
}

impl InteractableRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in capability, registered in `world`.
    #[must_use]
    pub fn with_builtin(world: &mut World) -> Self {
        let mut registry = Self::new();
        registry.register::<Button>(world);
        registry.register::<Draggable<ReturnToOrigin>>(world);
        registry.register::<Draggable<FreeDefault>>(world);
        registry.register::<TeleportDefault>(world);
        registry.register::<TeleportPoint>(world);
        registry.register::<Keyboard>(world);
        registry.register::<Carousel>(world);
        registry
    }

    /// Register capability `T`. Registering twice is a no-op; returns `true`
    /// if `T` was new.
    pub fn register<T: Component + Interactable>(&mut self, world: &mut World) -> bool {
        world.register_exclusive::<T>(INTERACTABLE_GROUP);
        let type_id = T::component_type_id();
        if self.entries.iter().any(|e| e.type_id == type_id) {
            return false;
        }
        self.entries.push(Entry {
            type_id,
            name: T::type_name(),
            resolve: resolve_as::<T>,
        });
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the registered capabilities, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    /// Matches every entity carrying any registered capability.
    #[must_use]
    pub fn query(&self) -> Query {
        Query::new().filter(QueryFilter::AnyOf(
            self.entries.iter().map(|e| e.type_id).collect(),
        ))
    }

    /// The capability `entity` carries, if any.
    pub fn resolve<'w>(
        &self,
        world: &'w mut World,
        entity: Entity,
    ) -> Option<&'w mut dyn Interactable> {
        let types = world.signature(entity)?;
        let resolve = self
            .entries
            .iter()
            .find(|e| types.contains(&e.type_id))?
            .resolve;
        resolve(world, entity)
    }
}
