//! Pick up, carry and drop [`Draggable`] props.

use std::marker::PhantomData;

use tracing::debug;

use xr_component::{Query, World};
use xr_math::Mat4;

use crate::components::{DragMode, DragState, Draggable, SpatialHandle};
use crate::system::{System, SystemContext};

/// Drives one [`DragMode`] variant. Register one instance per variant in
/// use.
#[derive(Debug)]
pub struct DraggableSystem<M: DragMode> {
    mode: PhantomData<M>,
}

impl<M: DragMode> DraggableSystem<M> {
    #[must_use]
    pub fn new() -> Self {
        Self { mode: PhantomData }
    }
}

impl<M: DragMode> Default for DraggableSystem<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: DragMode> System for DraggableSystem<M> {
    fn name(&self) -> &'static str {
        M::SYSTEM_NAME
    }

    fn init(&mut self, world: &mut World) {
        world.register_component::<Draggable<M>>();
    }

    fn execute(&mut self, ctx: &mut SystemContext<'_>) {
        let query = Query::new().with::<Draggable<M>>().with::<SpatialHandle>();
        for entity in ctx.world.query(&query) {
            let Some(node) = ctx.world.get::<SpatialHandle>(entity).map(|h| h.node) else {
                continue;
            };
            let Some(drag) = ctx.world.get_mut::<Draggable<M>>(entity) else {
                continue;
            };
            let scene = &mut ctx.host.scene;

            match drag.state {
                DragState::ToBeAttached | DragState::ToBeDraggable => {
                    let Some(pointer) = drag.attached_pointer.filter(|&p| scene.contains(p)) else {
                        drag.state = DragState::None;
                        continue;
                    };
                    if drag.origin.is_none() {
                        drag.origin = scene.local(node);
                    }
                    drag.offset = if drag.state == DragState::ToBeAttached {
                        scene.world_matrix(pointer).inverse() * scene.world_matrix(node)
                    } else {
                        Mat4::IDENTITY
                    };
                    drag.state = DragState::Attached;
                    debug!(entity = %entity, pointer = %pointer, "picked up");
                }
                DragState::Attached => match drag.attached_pointer.filter(|&p| scene.contains(p)) {
                    Some(pointer) => {
                        scene.set_world_matrix(node, scene.world_matrix(pointer) * drag.offset);
                    }
                    None => drag.state = DragState::ToBeDetached,
                },
                DragState::ToBeDetached => {
                    if M::RETURNS_TO_ORIGIN
                        && let Some(origin) = drag.origin
                    {
                        scene.set_local(node, origin);
                    }
                    drag.attached_pointer = None;
                    drag.state = DragState::None;
                    debug!(entity = %entity, "dropped");
                }
                DragState::None => {}
            }
        }
    }
}
