use tracing::{debug, info};

use xr_component::World;
use xr_scene::RigidTransform;

use crate::components::{TeleportDefault, TeleportState};
use crate::system::{System, SystemContext};

/// Commits staged free teleports by offsetting the session's reference
/// space.
#[derive(Debug, Default)]
pub struct TeleportDefaultSystem;

impl TeleportDefaultSystem {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl System for TeleportDefaultSystem {
    fn name(&self) -> &'static str {
        "teleport-default"
    }

    fn init(&mut self, world: &mut World) {
        world.register_component::<TeleportDefault>();
    }

    fn execute(&mut self, ctx: &mut SystemContext<'_>) {
        for entity in ctx.world.entities_with::<TeleportDefault>() {
            let Some(teleport) = ctx.world.get_mut::<TeleportDefault>(entity) else {
                continue;
            };
            if teleport.state != TeleportState::Teleport {
                continue;
            }
            teleport.state = TeleportState::None;

            let Some(base) = teleport.base_space else {
                debug!(entity = %entity, "no base reference space, teleport dropped");
                continue;
            };
            let space = base.offset(&RigidTransform::from_translation(-teleport.point));
            ctx.host.session.set_reference_space(space);
            info!(
                entity = %entity,
                point = ?teleport.point,
                tick_id = ctx.tick_id,
                "teleported"
            );
        }
    }
}
