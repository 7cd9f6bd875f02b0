//! Mouse fallback pointer.
//!
//! Used when no immersive session is available. A single [`PointerCursor`]
//! entity casts a ray from its camera through the last known pointer
//! position. Hover is recomputed every frame; clicks are applied as soon as
//! they arrive through [`click`].

use tracing::{debug, info};

use xr_component::{Entity, Query, World};
use xr_math::Vec2;
use xr_scene::{SceneGraph, SpatialId};

use crate::components::{PointerCursor, SpatialHandle, TeleportPoint, TeleportPointState};
use crate::system::{System, SystemContext};

fn cursor(world: &World) -> Option<(Entity, PointerCursor)> {
    let entity = *world.entities_with::<PointerCursor>().first()?;
    world.get::<PointerCursor>(entity).map(|c| (entity, *c))
}

fn teleport_targets(world: &World) -> Vec<(Entity, SpatialId)> {
    world
        .query(&Query::new().with::<SpatialHandle>().with::<TeleportPoint>())
        .into_iter()
        .filter_map(|e| world.get::<SpatialHandle>(e).map(|h| (e, h.node)))
        .collect()
}

/// The teleport point entity under the cursor, if any.
#[must_use]
pub fn hovered_target(world: &World, scene: &SceneGraph) -> Option<Entity> {
    let (_, cursor) = cursor(world)?;
    let ray = scene.camera_ray(cursor.camera, cursor.pointer?)?;
    let targets = teleport_targets(world);
    let roots: Vec<SpatialId> = targets.iter().map(|&(_, node)| node).collect();
    let hit = scene.raycast_all(&roots, &ray).into_iter().next()?;
    targets
        .iter()
        .find(|&&(_, node)| scene.is_ancestor_or_self(node, hit.node))
        .map(|&(entity, _)| entity)
}

/// Record a pointer move in client pixels. Returns `false` if there is no
/// cursor entity.
pub fn pointer_move(world: &mut World, client: Vec2) -> bool {
    let Some((entity, _)) = cursor(world) else {
        return false;
    };
    match world.get_mut::<PointerCursor>(entity) {
        Some(cursor) => {
            cursor.pointer = Some(cursor.viewport.normalize(client));
            true
        }
        None => false,
    }
}

/// Teleport to the point under the cursor, immediately.
pub fn click(world: &mut World, scene: &SceneGraph) -> Option<Entity> {
    let target = hovered_target(world, scene)?;
    let point = world.get_mut::<TeleportPoint>(target)?;
    point.state = TeleportPointState::Teleport;
    info!(entity = %target, "teleport point clicked");
    Some(target)
}

#[derive(Debug, Default)]
pub struct MouseSystem;

impl MouseSystem {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl System for MouseSystem {
    fn name(&self) -> &'static str {
        "mouse"
    }

    fn execute(&mut self, ctx: &mut SystemContext<'_>) {
        if cursor(ctx.world).is_none() {
            return;
        }
        let hovered = hovered_target(ctx.world, &ctx.host.scene);
        for (entity, _) in teleport_targets(ctx.world) {
            let Some(point) = ctx.world.get_mut::<TeleportPoint>(entity) else {
                continue;
            };
            if hovered == Some(entity) {
                point.hover();
            } else {
                point.unhover();
            }
        }
        if let Some(entity) = hovered {
            debug!(entity = %entity, "cursor over teleport point");
        }
    }
}
