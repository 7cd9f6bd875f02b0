use tracing::debug;

use xr_component::World;

use crate::components::{Button, ButtonState, SpatialHandle};
use crate::system::{System, SystemContext};

/// Fires click handlers for released buttons.
#[derive(Debug, Default)]
pub struct ButtonSystem;

impl ButtonSystem {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl System for ButtonSystem {
    fn name(&self) -> &'static str {
        "button"
    }

    fn init(&mut self, world: &mut World) {
        world.register_component::<Button>();
    }

    fn execute(&mut self, ctx: &mut SystemContext<'_>) {
        for entity in ctx.world.entities_with::<Button>() {
            let node = ctx.world.get::<SpatialHandle>(entity).map(|h| h.node);
            let Some(button) = ctx.world.get_mut::<Button>(entity) else {
                continue;
            };
            if button.state != ButtonState::Released {
                continue;
            }
            button.state = ButtonState::None;
            let clicked = node.is_some_and(|n| ctx.host.handlers.click(n));
            debug!(entity = %entity, clicked, "button released");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use xr_scene::{Node, SceneGraph};

    use super::*;
    use crate::testing;

    #[test]
    fn test_release_fires_click_once() {
        let mut scene = SceneGraph::new();
        let node = scene.add(Node::new("start"));
        let mut world = World::new();
        let (mut host, _) = testing::host(scene, &mut world);
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        host.handlers
            .set_click(node, Box::new(move || counter.set(counter.get() + 1)));

        let entity = world.create_entity();
        world.attach(entity, SpatialHandle { node }).unwrap();
        world
            .attach(
                entity,
                Button {
                    state: ButtonState::Released,
                },
            )
            .unwrap();

        let mut system = ButtonSystem::new();
        testing::run(&mut system, &mut world, &mut host);
        testing::run(&mut system, &mut world, &mut host);

        assert_eq!(clicks.get(), 1);
        assert_eq!(
            world.get::<Button>(entity).unwrap().state,
            ButtonState::None
        );
    }

    #[test]
    fn test_pressed_does_not_click() {
        let mut scene = SceneGraph::new();
        let node = scene.add(Node::new("start"));
        let mut world = World::new();
        let (mut host, _) = testing::host(scene, &mut world);
        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        host.handlers
            .set_click(node, Box::new(move || counter.set(counter.get() + 1)));

        let entity = world.create_entity();
        world.attach(entity, SpatialHandle { node }).unwrap();
        world
            .attach(
                entity,
                Button {
                    state: ButtonState::Pressed,
                },
            )
            .unwrap();

        testing::run(&mut ButtonSystem::new(), &mut world, &mut host);
        assert_eq!(clicks.get(), 0);
        assert_eq!(
            world.get::<Button>(entity).unwrap().state,
            ButtonState::Pressed
        );
    }
}
